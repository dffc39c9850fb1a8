//! Persisted application settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::ExportOptions;

/// Policy settings stored next to the filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Whether exported filters may carry an active delete action.
    #[serde(default)]
    pub enable_delete_action: bool,

    /// When the settings were last saved.
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            enable_delete_action: false,
            last_updated: Utc::now(),
        }
    }
}

impl AppSettings {
    /// Returns the export options these settings imply.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            delete_enabled: self.enable_delete_action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_disables_delete() {
        let settings = AppSettings::default();
        assert!(!settings.enable_delete_action);
        assert!(!settings.export_options().delete_enabled);
    }

    #[test]
    fn test_deserialize_stored_settings() {
        let json = r#"{"enableDeleteAction":true,"lastUpdated":"2024-05-01T12:00:00Z"}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();

        assert!(settings.enable_delete_action);
        assert_eq!(settings.last_updated.to_rfc3339(), "2024-05-01T12:00:00+00:00");
        assert!(settings.export_options().delete_enabled);
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let settings: AppSettings = serde_json::from_str("{}").unwrap();
        assert!(!settings.enable_delete_action);
    }
}
