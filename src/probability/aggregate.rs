//! Flattens combination results into per-item totals.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::probability::amounts::{split_combination, OutputOptions};
use crate::probability::container::ContainerResult;
use crate::probability::rounding::{round2, PercentageTable};
use crate::table::{ConditionBounds, Quantity};

/// Widened amount bounds and first-seen condition bounds of one item.
/// Bounds that never received a value stay `None` (`null` in documents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemBounds {
    #[serde(rename = "Min")]
    pub min: Option<Quantity>,
    #[serde(rename = "Max")]
    pub max: Option<Quantity>,
    #[serde(rename = "MinCondition")]
    pub min_condition: Option<f64>,
    #[serde(rename = "MaxCondition")]
    pub max_condition: Option<f64>,
}

impl ItemBounds {
    pub fn widen(&mut self, min: Option<Quantity>, max: Option<Quantity>) {
        if let Some(min) = min {
            if self.min.map_or(true, |current| min < current) {
                self.min = Some(min);
            }
        }
        if let Some(max) = max {
            if self.max.map_or(true, |current| max > current) {
                self.max = Some(max);
            }
        }
    }

    /// First non-null value wins for each side independently.
    pub fn fill_condition(&mut self, condition: &ConditionBounds) {
        if self.min_condition.is_none() {
            self.min_condition = condition.min_condition;
        }
        if self.max_condition.is_none() {
            self.max_condition = condition.max_condition;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    #[serde(rename = "Probabilities")]
    pub probabilities: IndexMap<String, f64>,
    #[serde(rename = "Amounts")]
    pub amounts: IndexMap<String, ItemBounds>,
}

impl PercentageTable for AggregatedResult {
    fn percentages_mut(&mut self) -> &mut IndexMap<String, f64> {
        &mut self.probabilities
    }
}

pub fn aggregate(
    results: &IndexMap<String, ContainerResult>,
    options: OutputOptions,
) -> IndexMap<String, AggregatedResult> {
    results
        .iter()
        .map(|(name, result)| (name.clone(), aggregate_container(result, options)))
        .collect()
}

/// An item appearing in several combinations accumulates each of their percentages.
pub fn aggregate_container(result: &ContainerResult, options: OutputOptions) -> AggregatedResult {
    let mut aggregated = AggregatedResult::default();
    let track_bounds = options.include_amount || options.include_condition;

    for (combination, &percentage) in &result.probabilities {
        let record = result.amounts.get(combination);
        for item in split_combination(combination) {
            *aggregated.probabilities.entry(item.to_string()).or_insert(0.0) += percentage;

            if !track_bounds {
                continue;
            }
            let bounds = aggregated.amounts.entry(item.to_string()).or_default();
            let Some(record) = record else {
                continue;
            };
            if options.include_amount {
                bounds.widen(record.min.get(item).copied(), record.max.get(item).copied());
            }
            if options.include_condition {
                if let Some(condition) = record.condition.get(item) {
                    bounds.fill_condition(condition);
                }
            }
        }
    }

    for percentage in aggregated.probabilities.values_mut() {
        *percentage = round2(*percentage);
    }
    aggregated
}
