//! Per-container orchestration: propagate every slot, scale by `Loops`, merge.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::probability::amounts::{AmountRecord, CombinationKey, OutputOptions, Propagation};
use crate::probability::propagate::propagate;
use crate::probability::rounding::{round2, PercentageTable};
use crate::table::{ContainerDefinition, LootSlot, LootTableDocument, Quantity};

/// Scrap bounds copied from the container as written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapInfo {
    #[serde(rename = "MinScrap")]
    pub min_scrap: Quantity,
    #[serde(rename = "MaxScrap")]
    pub max_scrap: Quantity,
}

/// Combination percentages (additive over slots and loops, never capped) and
/// amount records for one container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerResult {
    #[serde(rename = "Probabilities")]
    pub probabilities: IndexMap<CombinationKey, f64>,
    #[serde(rename = "Amounts")]
    pub amounts: IndexMap<CombinationKey, AmountRecord>,
    #[serde(rename = "ScrapInfo")]
    pub scrap_info: ScrapInfo,
}

impl PercentageTable for ContainerResult {
    fn percentages_mut(&mut self) -> &mut IndexMap<String, f64> {
        &mut self.probabilities
    }
}

/// Results for every container of `loot_advanced`, in document order.
pub fn calculate_loot_probabilities(
    document: &LootTableDocument,
    options: OutputOptions,
) -> IndexMap<String, ContainerResult> {
    document
        .loot_advanced
        .iter()
        .map(|(name, container)| {
            let result = calculate_container(container, options);
            debug!(
                "{name}: {} slot(s), {} combination(s)",
                container.slots().len(),
                result.probabilities.len()
            );
            (name.clone(), result)
        })
        .collect()
}

pub fn calculate_container(container: &ContainerDefinition, options: OutputOptions) -> ContainerResult {
    let loops = container.loops();
    let mut totals = Propagation::default();

    for slot in container.slots() {
        totals.absorb(propagate_slot(slot, options), |percentage| {
            round2(percentage * loops)
        });
    }
    for percentage in totals.percentages.values_mut() {
        *percentage = round2(*percentage);
    }

    ContainerResult {
        probabilities: totals.percentages,
        amounts: totals.amounts,
        scrap_info: ScrapInfo {
            min_scrap: container.min_scrap(),
            max_scrap: container.max_scrap(),
        },
    }
}

/// One roll of a slot. A root with Items but no SubSpawn is a single combination
/// at the slot's probability; otherwise the root's SubSpawn list is propagated
/// and any root Items are ignored.
pub fn propagate_slot(slot: &LootSlot, options: OutputOptions) -> Propagation {
    let root = slot.definition();
    let sub_spawn = root.sub_spawn();
    let items = root.items();

    if sub_spawn.is_empty() && !items.is_empty() {
        let mut single = Propagation::default();
        let (key, amounts) = AmountRecord::from_items(items, options);
        single.record(key, round2(slot.probability() * 100.0), amounts);
        single
    } else {
        propagate(sub_spawn, slot.probability(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::parse_loot_table;

    fn container(json: &str) -> ContainerDefinition {
        let doc = parse_loot_table(&format!(r#"{{"loot_advanced":{{"c":{json}}}}}"#), false)
            .expect("parse");
        doc.loot_advanced["c"].clone()
    }

    #[test]
    fn direct_items_slot_uses_slot_probability() {
        let c = container(
            r#"{"LootSpawnSlots":[{"Probability":0.4,"LootDefinition":{"Items":[{"Shortname":"scrap","MinAmount":3,"MaxAmount":6}]}}]}"#,
        );
        let result = calculate_container(&c, OutputOptions::default());
        assert_eq!(result.probabilities["scrap"], 40.0);
        assert_eq!(result.amounts["scrap"].min["scrap"], Quantity::Int(3));
        assert_eq!(result.amounts["scrap"].max["scrap"], Quantity::Int(6));
    }

    #[test]
    fn root_items_are_ignored_when_sub_spawn_is_present() {
        let c = container(
            r#"{"LootSpawnSlots":[{"LootDefinition":{
                "Items":[{"Shortname":"ignored"}],
                "SubSpawn":[{"Weight":1,"Category":{"Items":[{"Shortname":"kept"}]}}]}}]}"#,
        );
        let result = calculate_container(&c, OutputOptions::default());
        assert_eq!(result.probabilities.len(), 1);
        assert_eq!(result.probabilities["kept"], 100.0);
    }

    #[test]
    fn slots_merge_additively_and_scale_by_loops() {
        let c = container(
            r#"{"Loops":3,"LootSpawnSlots":[
                {"Probability":0.1,"LootDefinition":{"Items":[{"Shortname":"gear","MaxAmount":2}]}},
                {"Probability":0.2,"LootDefinition":{"Items":[{"Shortname":"gear","MinAmount":0,"MaxAmount":1}]}}]}"#,
        );
        let result = calculate_container(&c, OutputOptions::default());
        assert!((result.probabilities["gear"] - 90.0).abs() < 1e-9);
        assert_eq!(result.amounts["gear"].min["gear"], Quantity::Int(0));
        assert_eq!(result.amounts["gear"].max["gear"], Quantity::Int(2));
    }

    #[test]
    fn scrap_info_is_passed_through_with_zero_defaults() {
        let with_scrap = container(r#"{"MinScrapAmount":2,"MaxScrapAmount":9}"#);
        assert_eq!(
            calculate_container(&with_scrap, OutputOptions::default()).scrap_info,
            ScrapInfo {
                min_scrap: Quantity::Int(2),
                max_scrap: Quantity::Int(9)
            }
        );
        let bare = container("{}");
        let result = calculate_container(&bare, OutputOptions::default());
        assert_eq!(result.scrap_info, ScrapInfo::default());
        assert!(result.probabilities.is_empty());
    }

    #[test]
    fn float_loops_scale_like_integers() {
        let slots = r#""LootSpawnSlots":[{"Probability":0.25,"LootDefinition":{"Items":[{"Shortname":"gear"}]}}]"#;
        let once = calculate_container(&container(&format!("{{{slots}}}")), OutputOptions::default());
        let twice = calculate_container(
            &container(&format!(r#"{{"Loops":2.0,{slots}}}"#)),
            OutputOptions::default(),
        );
        assert_eq!(once.probabilities["gear"], 25.0);
        assert_eq!(twice.probabilities["gear"], 50.0);
    }

    #[test]
    fn fractional_scrap_is_written_back_unchanged() {
        let c = container(r#"{"MinScrapAmount":1,"MaxScrapAmount":2.5}"#);
        let result = calculate_container(&c, OutputOptions::default());
        let value = serde_json::to_value(result.scrap_info).expect("serialize");
        assert_eq!(value["MinScrap"], 1);
        assert_eq!(value["MaxScrap"], 2.5);
    }

    #[test]
    fn empty_root_contributes_nothing() {
        let c = container(r#"{"LootSpawnSlots":[{"Probability":1.0},{"LootDefinition":{}}]}"#);
        assert!(calculate_container(&c, OutputOptions::default())
            .probabilities
            .is_empty());
    }
}
