//! Probability core: pure functions from a parsed loot table to combination
//! and per-item percentage reports. No I/O happens below this module.

pub mod aggregate;
pub mod amounts;
pub mod container;
pub mod propagate;
pub mod rounding;

pub use aggregate::{aggregate, aggregate_container, AggregatedResult, ItemBounds};
pub use amounts::{
    combination_key, split_combination, AmountRecord, CombinationKey, OutputOptions, Propagation,
    COMBINATION_SEPARATOR,
};
pub use container::{
    calculate_container, calculate_loot_probabilities, propagate_slot, ContainerResult, ScrapInfo,
};
pub use propagate::{
    effective_probability, propagate, total_weight, MAX_SPAWN_DEPTH, WEIGHT_DENOMINATOR_DEFAULT,
    WEIGHT_NUMERATOR_DEFAULT,
};
pub use rounding::{round2, round_to, snap_percentages, snap_to_half, PercentageTable};
