//! Drop-probability calculator for weighted, nested loot tables.
//!
//! [probability] holds the pure core: weights are propagated through the
//! SubSpawn tree into per-combination percentages, then flattened into per-item
//! totals. [config], [runner] and [output] are the file-level glue around it.

pub mod cli;
pub mod config;
pub mod output;
pub mod parallel;
pub mod probability;
pub mod runner;
pub mod table;
