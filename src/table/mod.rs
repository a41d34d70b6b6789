//! Loot-table documents: the typed model and the file loader.

pub mod loader;
pub mod model;

pub use loader::{load_loot_table, parse_loot_table, LoadError};
pub use model::{
    Category, ConditionBounds, ContainerDefinition, ItemEntry, LootSlot, LootTableDocument,
    Quantity, SpawnNode, UNKNOWN_SHORTNAME,
};
