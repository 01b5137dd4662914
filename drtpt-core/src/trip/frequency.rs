use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// counts occurrences of labels, remembering the order each label was first
/// seen so that ties can be broken deterministically.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct FrequencyTable(IndexMap<String, u64>);

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &str) {
        self.add_n(label, 1);
    }

    pub fn add_n(&mut self, label: &str, n: u64) {
        match self.0.get_mut(label) {
            Some(count) => *count += n,
            None => {
                let _ = self.0.insert(label.to_string(), n);
            }
        }
    }

    pub fn get(&self, label: &str) -> u64 {
        self.0.get(label).copied().unwrap_or_default()
    }

    /// sum of all counts
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// number of distinct labels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// labels sorted by count, highest first. the sort is stable, so labels
    /// with equal counts stay in first-seen order.
    pub fn sorted(&self) -> IndexMap<String, u64> {
        self.0
            .iter()
            .sorted_by(|(_, a), (_, b)| b.cmp(a))
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }
}
