//! Combination keys, per-combination amount records and the merge rules shared
//! by the propagator and the container orchestrator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::table::{ConditionBounds, ItemEntry, Quantity};

/// Comma-joined shortnames of items granted together by one spawn node.
pub type CombinationKey = String;

pub const COMBINATION_SEPARATOR: &str = ",";

/// Which bound families are recorded alongside percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    pub include_condition: bool,
    pub include_amount: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            include_condition: true,
            include_amount: true,
        }
    }
}

pub fn combination_key(items: &[ItemEntry]) -> CombinationKey {
    items
        .iter()
        .map(ItemEntry::shortname)
        .collect::<Vec<_>>()
        .join(COMBINATION_SEPARATOR)
}

pub fn split_combination(key: &str) -> impl Iterator<Item = &str> {
    key.split(COMBINATION_SEPARATOR)
}

/// Min/Max amounts and condition bounds for each item of one combination.
/// Maps stay empty for families disabled in [OutputOptions].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmountRecord {
    #[serde(rename = "Min")]
    pub min: IndexMap<String, Quantity>,
    #[serde(rename = "Max")]
    pub max: IndexMap<String, Quantity>,
    #[serde(rename = "Condition")]
    pub condition: IndexMap<String, ConditionBounds>,
}

impl AmountRecord {
    /// Build the key and record for a node's `Items` list.
    pub fn from_items(items: &[ItemEntry], options: OutputOptions) -> (CombinationKey, Self) {
        let mut record = Self::default();
        for item in items {
            let name = item.shortname();
            if options.include_amount {
                widen_min(&mut record.min, name, item.min_amount());
                widen_max(&mut record.max, name, item.max_amount());
            }
            if options.include_condition {
                record.condition.insert(name.to_string(), item.condition());
            }
        }
        (combination_key(items), record)
    }

    /// Fold another occurrence of the same combination into this one.
    /// Min/Max widen; a condition entry is replaced by the later occurrence.
    pub fn merge(&mut self, other: &AmountRecord) {
        for (name, &value) in &other.min {
            widen_min(&mut self.min, name, value);
        }
        for (name, &value) in &other.max {
            widen_max(&mut self.max, name, value);
        }
        for (name, bounds) in &other.condition {
            self.condition.insert(name.clone(), *bounds);
        }
    }
}

fn widen_min(map: &mut IndexMap<String, Quantity>, name: &str, value: Quantity) {
    map.entry(name.to_string())
        .and_modify(|current| {
            if value < *current {
                *current = value;
            }
        })
        .or_insert(value);
}

fn widen_max(map: &mut IndexMap<String, Quantity>, name: &str, value: Quantity) {
    map.entry(name.to_string())
        .and_modify(|current| {
            if value > *current {
                *current = value;
            }
        })
        .or_insert(value);
}

/// Percentages and amount records keyed by combination, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Propagation {
    pub percentages: IndexMap<CombinationKey, f64>,
    pub amounts: IndexMap<CombinationKey, AmountRecord>,
}

impl Propagation {
    pub fn is_empty(&self) -> bool {
        self.percentages.is_empty() && self.amounts.is_empty()
    }

    /// Add `percentage` to `key` and merge its amount record.
    pub fn record(&mut self, key: CombinationKey, percentage: f64, amounts: AmountRecord) {
        *self.percentages.entry(key.clone()).or_insert(0.0) += percentage;
        self.merge_amounts(key, amounts);
    }

    /// Fold a nested or per-slot result in; `scale` maps each incoming percentage
    /// (rounding, loop scaling) before it is added.
    pub fn absorb(&mut self, other: Propagation, scale: impl Fn(f64) -> f64) {
        for (key, percentage) in other.percentages {
            *self.percentages.entry(key).or_insert(0.0) += scale(percentage);
        }
        for (key, amounts) in other.amounts {
            self.merge_amounts(key, amounts);
        }
    }

    fn merge_amounts(&mut self, key: CombinationKey, amounts: AmountRecord) {
        match self.amounts.get_mut(&key) {
            Some(existing) => existing.merge(&amounts),
            None => {
                self.amounts.insert(key, amounts);
            }
        }
    }
}
