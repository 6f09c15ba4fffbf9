//! First-occurrence-wins deduplication by normalized name.

use std::collections::HashSet;

use crate::model::FoodRecord;

/// Anything carrying a display name that identifies it.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for FoodRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Lowercased, trimmed form used to compare names.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Output of [`dedup_by_name`].
#[derive(Debug, Clone, PartialEq)]
pub struct Dedup<T> {
    /// Survivors in original order.
    pub unique: Vec<T>,
    /// Names of discarded items, in encounter order.
    pub duplicates: Vec<String>,
}

/// Keep the first item for each normalized name.
///
/// Items whose name is blank are kept as they are and never count as
/// duplicates; validation reports each of them.
/// Applying it to its own `unique` output yields the same sequence.
pub fn dedup_by_name<T: Named>(items: impl IntoIterator<Item = T>) -> Dedup<T> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    let mut duplicates = Vec::new();

    for item in items {
        let key = normalize_name(item.name());
        if key.is_empty() || seen.insert(key) {
            unique.push(item);
        } else {
            duplicates.push(item.name().to_string());
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(duplicates = duplicates.len(), kept = unique.len(), "deduplicated");

    Dedup { unique, duplicates }
}
