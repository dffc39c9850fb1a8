//! Collision-free filter identifiers.

use std::collections::HashSet;
use std::fmt;

use chrono::Utc;
use log::debug;

type IdGenerator = Box<dyn FnMut(usize) -> String + Send>;

/// Allocates filter ids that are unique among every id it has seen.
///
/// Generated ids look like `<unix millis>_<index>_<8 hex chars>`. Entropy is
/// not trusted on its own: every candidate is checked against the set of
/// used ids and regenerated on collision.
pub struct IdAllocator {
    used: HashSet<String>,
    generator: IdGenerator,
}

impl fmt::Debug for IdAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdAllocator")
            .field("used", &self.used.len())
            .finish_non_exhaustive()
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Creates an allocator with no reserved ids.
    pub fn new() -> Self {
        Self {
            used: HashSet::new(),
            generator: Box::new(generate_id),
        }
    }

    /// Creates an allocator that treats `ids` as already taken.
    pub fn with_used<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allocator = Self::new();
        allocator.used.extend(ids.into_iter().map(Into::into));
        allocator
    }

    /// Replaces the candidate generator.
    ///
    /// The generator receives the positional index passed to
    /// [`allocate`](Self::allocate). Intended for deterministic tests.
    pub fn with_generator<F>(mut self, generator: F) -> Self
    where
        F: FnMut(usize) -> String + Send + 'static,
    {
        self.generator = Box::new(generator);
        self
    }

    /// Returns true if `id` has been reserved or allocated.
    pub fn is_used(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    /// Marks `id` as taken. Returns false if it already was.
    pub fn reserve(&mut self, id: impl Into<String>) -> bool {
        self.used.insert(id.into())
    }

    /// Returns a fresh id and marks it as taken.
    pub fn allocate(&mut self, index: usize) -> String {
        loop {
            let candidate = (self.generator)(index);
            if !candidate.is_empty() && self.used.insert(candidate.clone()) {
                return candidate;
            }
            debug!("id {:?} already in use, regenerating", candidate);
        }
    }
}

fn generate_id(index: usize) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        Utc::now().timestamp_millis(),
        index,
        &random[..8]
    )
}
