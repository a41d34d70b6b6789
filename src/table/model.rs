//! Typed view of a loot-table document (`loot_advanced` layout).
//!
//! Every field the calculator reads is optional in real tables; absent values
//! and JSON `null` both fall back to the defaults below. Unknown fields are ignored.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Shortname used for items that carry none. All such items share one bucket.
pub const UNKNOWN_SHORTNAME: &str = "Unknown";

pub const DEFAULT_AMOUNT: Quantity = Quantity::Int(1);
pub const DEFAULT_LOOPS: Quantity = Quantity::Int(1);
pub const DEFAULT_SCRAP: Quantity = Quantity::Int(0);
pub const DEFAULT_SLOT_PROBABILITY: f64 = 1.0;

/// A count as written in the table. Integers stay integers; anything else
/// (`2.0`, `2.5`) is kept as the float it was written as and written back
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Int(i64),
    Float(f64),
}

impl Quantity {
    pub fn as_f64(self) -> f64 {
        match self {
            Quantity::Int(value) => value as f64,
            Quantity::Float(value) => value,
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        DEFAULT_SCRAP
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Quantity::Int(value)
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Quantity::Int(a), Quantity::Int(b)) => a.partial_cmp(b),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Int(value) => write!(f, "{value}"),
            Quantity::Float(value) => write!(f, "{value}"),
        }
    }
}

static EMPTY_CATEGORY: Category = Category {
    items: None,
    sub_spawn: None,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LootTableDocument {
    #[serde(default)]
    pub loot_advanced: IndexMap<String, ContainerDefinition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerDefinition {
    #[serde(rename = "Loops", default, skip_serializing_if = "Option::is_none")]
    pub loops: Option<Quantity>,
    #[serde(rename = "LootSpawnSlots", default, skip_serializing_if = "Option::is_none")]
    pub loot_spawn_slots: Option<Vec<LootSlot>>,
    #[serde(rename = "MinScrapAmount", default, skip_serializing_if = "Option::is_none")]
    pub min_scrap_amount: Option<Quantity>,
    #[serde(rename = "MaxScrapAmount", default, skip_serializing_if = "Option::is_none")]
    pub max_scrap_amount: Option<Quantity>,
}

impl ContainerDefinition {
    /// Loop multiplier applied to every slot percentage. Fractional values are used as written.
    pub fn loops(&self) -> f64 {
        self.loops.unwrap_or(DEFAULT_LOOPS).as_f64()
    }

    pub fn min_scrap(&self) -> Quantity {
        self.min_scrap_amount.unwrap_or(DEFAULT_SCRAP)
    }

    pub fn max_scrap(&self) -> Quantity {
        self.max_scrap_amount.unwrap_or(DEFAULT_SCRAP)
    }

    pub fn slots(&self) -> &[LootSlot] {
        self.loot_spawn_slots.as_deref().unwrap_or_default()
    }
}

/// One roll slot of a container: a root category rolled with `Probability`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LootSlot {
    #[serde(rename = "Probability", default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(rename = "LootDefinition", default, skip_serializing_if = "Option::is_none")]
    pub loot_definition: Option<Category>,
}

impl LootSlot {
    pub fn probability(&self) -> f64 {
        self.probability.unwrap_or(DEFAULT_SLOT_PROBABILITY)
    }

    pub fn definition(&self) -> &Category {
        self.loot_definition.as_ref().unwrap_or(&EMPTY_CATEGORY)
    }
}

/// Weighted (or explicitly probable) branch point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnNode {
    #[serde(rename = "Weight", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(rename = "Probability", default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(rename = "Category", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl SpawnNode {
    pub fn items(&self) -> &[ItemEntry] {
        self.category.as_ref().map(Category::items).unwrap_or_default()
    }

    pub fn sub_spawn(&self) -> &[SpawnNode] {
        self.category.as_ref().map(Category::sub_spawn).unwrap_or_default()
    }
}

/// Items granted together plus nested branch points. Both may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "Items", default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ItemEntry>>,
    #[serde(rename = "SubSpawn", default, skip_serializing_if = "Option::is_none")]
    pub sub_spawn: Option<Vec<SpawnNode>>,
}

impl Category {
    pub fn items(&self) -> &[ItemEntry] {
        self.items.as_deref().unwrap_or_default()
    }

    pub fn sub_spawn(&self) -> &[SpawnNode] {
        self.sub_spawn.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemEntry {
    #[serde(rename = "Shortname", default, skip_serializing_if = "Option::is_none")]
    pub shortname: Option<String>,
    #[serde(rename = "MinAmount", default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Quantity>,
    #[serde(rename = "MaxAmount", default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Quantity>,
    #[serde(rename = "Condition", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionBounds>,
}

impl ItemEntry {
    pub fn shortname(&self) -> &str {
        self.shortname.as_deref().unwrap_or(UNKNOWN_SHORTNAME)
    }

    pub fn min_amount(&self) -> Quantity {
        self.min_amount.unwrap_or(DEFAULT_AMOUNT)
    }

    pub fn max_amount(&self) -> Quantity {
        self.max_amount.unwrap_or(DEFAULT_AMOUNT)
    }

    pub fn condition(&self) -> ConditionBounds {
        self.condition.unwrap_or_default()
    }
}

/// Durability bounds. Serialized with explicit `null`s in result documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionBounds {
    #[serde(rename = "MinCondition", default)]
    pub min_condition: Option<f64>,
    #[serde(rename = "MaxCondition", default)]
    pub max_condition: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let doc: LootTableDocument = serde_json::from_str(
            r#"{"loot_advanced":{"crate":{"LootSpawnSlots":[{"LootDefinition":{"Items":[{}]}}]}}}"#,
        )
        .expect("parse");
        let container = &doc.loot_advanced["crate"];
        assert_eq!(container.loops(), 1.0);
        assert_eq!(container.min_scrap_amount, None);
        let slot = &container.slots()[0];
        assert_eq!(slot.probability(), 1.0);
        let item = &slot.definition().items()[0];
        assert_eq!(item.shortname(), "Unknown");
        assert_eq!(item.min_amount(), Quantity::Int(1));
        assert_eq!(item.max_amount(), Quantity::Int(1));
        assert_eq!(item.condition(), ConditionBounds::default());
    }

    #[test]
    fn null_lists_are_treated_as_absent() {
        let node: SpawnNode =
            serde_json::from_str(r#"{"Weight":2,"Category":{"Items":null,"SubSpawn":null}}"#)
                .expect("parse");
        assert_eq!(node.weight, Some(2.0));
        assert!(node.items().is_empty());
        assert!(node.sub_spawn().is_empty());
    }

    #[test]
    fn containers_keep_document_order() {
        let doc: LootTableDocument = serde_json::from_str(
            r#"{"loot_advanced":{"zeta":{},"alpha":{},"mid":{}}}"#,
        )
        .expect("parse");
        let names: Vec<&str> = doc.loot_advanced.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn float_counts_are_accepted_as_written() {
        let doc: LootTableDocument = serde_json::from_str(
            r#"{"loot_advanced":{"c":{"Loops":2.0,"MaxScrapAmount":2.5,"LootSpawnSlots":[
                {"LootDefinition":{"Items":[{"MinAmount":1.0,"MaxAmount":3}]}}]}}}"#,
        )
        .expect("parse");
        let container = &doc.loot_advanced["c"];
        assert_eq!(container.loops(), 2.0);
        assert_eq!(container.min_scrap(), Quantity::Int(0));
        assert_eq!(container.max_scrap(), Quantity::Float(2.5));
        let item = &container.slots()[0].definition().items()[0];
        assert_eq!(item.min_amount(), Quantity::Float(1.0));
        assert_eq!(item.max_amount(), Quantity::Int(3));
    }

    #[test]
    fn yaml_counts_keep_their_kind() {
        let container: ContainerDefinition =
            serde_yaml::from_str("Loops: 3\nMinScrapAmount: 1.5\n").expect("parse");
        assert_eq!(container.loops, Some(Quantity::Int(3)));
        assert_eq!(container.min_scrap(), Quantity::Float(1.5));
    }

    #[test]
    fn quantities_compare_across_kinds() {
        assert!(Quantity::Int(2) < Quantity::Float(2.5));
        assert!(Quantity::Float(1.5) < Quantity::Int(2));
        assert_eq!(Quantity::Float(2.5).to_string(), "2.5");
        assert_eq!(Quantity::Int(7).to_string(), "7");
    }
}
