use std::collections::HashMap;

/// Requests routed per node through `handle_request`. Counters outlive the
/// node they belong to until explicitly cleared or forgotten.
#[derive(Debug, Default)]
pub struct LoadTable {
    counts: HashMap<String, u64>,
}

impl LoadTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a counter at zero. An existing counter is left untouched so
    /// re-adding a node keeps its history.
    pub fn ensure(&mut self, node_id: &str) {
        if !self.counts.contains_key(node_id) {
            self.counts.insert(node_id.to_string(), 0);
        }
    }

    pub fn increment(&mut self, node_id: &str) -> u64 {
        let count = self.counts.entry(node_id.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn get(&self, node_id: &str) -> Option<u64> {
        self.counts.get(node_id).copied()
    }

    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counts.clone()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Zeroes every counter whose node is still live and drops the rest.
    pub fn clear<F>(&mut self, is_live: F)
    where
        F: Fn(&str) -> bool,
    {
        self.counts.retain(|id, _| is_live(id));
        self.counts.values_mut().for_each(|count| *count = 0);
    }

    pub fn forget(&mut self, node_id: &str) -> Option<u64> {
        self.counts.remove(node_id)
    }
}
