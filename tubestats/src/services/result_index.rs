use serde_json::Value;
use std::collections::HashMap;

use crate::utils::get_or_default;

/// Id-keyed view over one statistics batch, built once and read for every search item.
#[derive(Debug, Default)]
pub struct ResultIndex {
    entries: HashMap<String, Value>,
}

impl ResultIndex {
    /// Indexes `batch` by the string found at `key_path` in each resource.
    ///
    /// Resources without a usable key are skipped; if an id occurs twice the first one wins.
    pub fn build(batch: Vec<Value>, key_path: &[&str]) -> Self {
        let mut entries = HashMap::with_capacity(batch.len());
        for resource in batch {
            let key = get_or_default(&resource, key_path, "");
            if key.is_empty() {
                continue;
            }
            entries.entry(key).or_insert(resource);
        }
        ResultIndex { entries }
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lookup(&self, id: &str) -> Option<&Value> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
