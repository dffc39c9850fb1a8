//! Typed access to filters and settings in a [`KeyValueStore`].

use chrono::Utc;
use log::{debug, info, warn};

use crate::filter_set::FilterSet;
use crate::settings::AppSettings;
use crate::store::{KeyValueStore, StoreResult};

/// Store key holding the filter list.
pub const FILTERS_KEY: &str = "filters";

/// Store key holding the application settings.
pub const SETTINGS_KEY: &str = "appSettings";

/// Loads and saves filters and settings through a key-value store.
#[derive(Debug)]
pub struct FilterRepository<S> {
    store: S,
}

impl<S: KeyValueStore> FilterRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the stored filters; an absent key is an empty set.
    ///
    /// Ids are checked on the way in. If any had to be repaired the set is
    /// saved back immediately.
    pub async fn load_filters(&self) -> StoreResult<FilterSet> {
        let Some(value) = self.store.get(FILTERS_KEY).await? else {
            debug!("no stored filters");
            return Ok(FilterSet::new());
        };

        let mut filters: FilterSet = serde_json::from_value(value)?;
        let repaired = filters.ensure_unique_ids();
        if !repaired.is_empty() {
            warn!("repaired {} filter id(s) on load", repaired.len());
            self.write_filters(&filters).await?;
        }
        debug!("loaded {} filter(s)", filters.len());
        Ok(filters)
    }

    /// Loads the stored filters, creating and saving one untitled filter if
    /// none exist.
    pub async fn load_or_init_filters(&self) -> StoreResult<FilterSet> {
        let mut filters = self.load_filters().await?;
        if filters.is_empty() {
            let id = filters.add_new();
            info!("no filters stored; created {}", id);
            self.write_filters(&filters).await?;
        }
        Ok(filters)
    }

    /// Saves the filters after repairing any missing or duplicate ids.
    pub async fn save_filters(&self, filters: &mut FilterSet) -> StoreResult<()> {
        let repaired = filters.ensure_unique_ids();
        if !repaired.is_empty() {
            warn!("repaired {} filter id(s) before saving", repaired.len());
        }
        self.write_filters(filters).await
    }

    async fn write_filters(&self, filters: &FilterSet) -> StoreResult<()> {
        let value = serde_json::to_value(filters)?;
        self.store.set(FILTERS_KEY, value).await?;
        debug!("saved {} filter(s)", filters.len());
        Ok(())
    }

    /// Loads the settings. Absent settings are created with defaults and saved.
    pub async fn load_settings(&self) -> StoreResult<AppSettings> {
        match self.store.get(SETTINGS_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => {
                let settings = AppSettings::default();
                self.store
                    .set(SETTINGS_KEY, serde_json::to_value(&settings)?)
                    .await?;
                debug!("initialized default settings");
                Ok(settings)
            }
        }
    }

    /// Saves the settings, stamping `last_updated` with the current time.
    pub async fn save_settings(&self, settings: &mut AppSettings) -> StoreResult<()> {
        settings.last_updated = Utc::now();
        self.store
            .set(SETTINGS_KEY, serde_json::to_value(&*settings)?)
            .await
    }
}
