//! Named stat blocks
//!
//! Players and pieces carry an open key/value stat map. Effects address stats
//! by name, so the engine never needs to know which stats a scenario uses.

use crate::core::StatKey;
use crate::{Result, RulesError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    values: FxHashMap<StatKey, i32>,
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<StatKey>, value: i32) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Get a stat, failing if the block does not define it
    pub fn get(&self, key: &StatKey) -> Result<i32> {
        self.values
            .get(key)
            .copied()
            .ok_or_else(|| RulesError::InvalidAction(format!("unknown stat '{key}'")))
    }

    /// Get a stat, treating a missing key as zero
    pub fn get_or_zero(&self, key: &StatKey) -> i32 {
        self.values.get(key).copied().unwrap_or(0)
    }

    pub fn set(&mut self, key: StatKey, value: i32) {
        self.values.insert(key, value);
    }

    /// Add `delta` to a stat (a missing key starts at zero)
    pub fn adjust(&mut self, key: &StatKey, delta: i32) {
        *self.values.entry(key.clone()).or_insert(0) += delta;
    }

    pub fn contains(&self, key: &StatKey) -> bool {
        self.values.contains_key(key)
    }
}

impl fmt::Display for StatBlock {
    // Sorted so log output is stable across runs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.values.iter().collect();
        entries.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        let parts: Vec<String> = entries.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
