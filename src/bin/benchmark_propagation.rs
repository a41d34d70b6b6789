//! Propagation throughput: full-container calculations per second on a synthetic table.
//!
//! Run: cargo run --release --bin benchmark_propagation [-- --log]
//! With --log, appends a line to benchmark_log.csv.

use std::fs::OpenOptions;
use std::io::Write;
use std::time::Instant;

use lootodds::probability::{calculate_container, OutputOptions};
use lootodds::table::{Category, ContainerDefinition, ItemEntry, LootSlot, Quantity, SpawnNode};

const FANOUT: usize = 6;
const DEPTH: usize = 4;

fn synthetic_tree(depth: usize, prefix: &str) -> Vec<SpawnNode> {
    (0..FANOUT)
        .map(|i| {
            let name = format!("{prefix}{i}");
            let sub_spawn = (depth > 0).then(|| synthetic_tree(depth - 1, &format!("{name}_")));
            SpawnNode {
                weight: Some((i + 1) as f64),
                probability: None,
                category: Some(Category {
                    items: Some(vec![ItemEntry {
                        shortname: Some(name),
                        min_amount: Some(Quantity::Int(1)),
                        max_amount: Some(Quantity::Int(i as i64 + 1)),
                        condition: None,
                    }]),
                    sub_spawn,
                }),
            }
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log = std::env::args().any(|arg| arg == "--log");

    let container = ContainerDefinition {
        loops: Some(Quantity::Int(2)),
        loot_spawn_slots: Some(vec![LootSlot {
            probability: Some(1.0),
            loot_definition: Some(Category {
                items: None,
                sub_spawn: Some(synthetic_tree(DEPTH, "item_")),
            }),
        }]),
        min_scrap_amount: None,
        max_scrap_amount: None,
    };
    let options = OutputOptions::default();
    let combinations = calculate_container(&container, options).probabilities.len();

    const MIN_DURATION_MS: u128 = 2000;
    const MIN_RUNS: u32 = 50;

    let start = Instant::now();
    let mut runs: u32 = 0;
    while start.elapsed().as_millis() < MIN_DURATION_MS || runs < MIN_RUNS {
        let _ = calculate_container(&container, options);
        runs += 1;
    }
    let elapsed_secs = start.elapsed().as_secs_f64();
    let runs_per_sec = runs as f64 / elapsed_secs;
    let combinations_per_sec = runs_per_sec * combinations as f64;

    println!("Propagation benchmark (fanout {FANOUT}, depth {DEPTH}):");
    println!("  Combinations: {}", combinations);
    println!("  Runs:         {}", runs);
    println!("  Duration:     {:.2} s", elapsed_secs);
    println!("  Runs/s:       {:.2}", runs_per_sec);
    println!("  Combos/s:     {:.2}", combinations_per_sec);

    if log {
        let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let line = format!(
            "{},{:.4},{:.4},{},{}\n",
            date, runs_per_sec, combinations_per_sec, combinations, DEPTH
        );
        let path = "benchmark_log.csv";
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
            file.write_all(b"date,runs_per_sec,combinations_per_sec,combinations,depth\n")?;
        }
        file.write_all(line.as_bytes())?;
        file.flush()?;
        println!("Appended to {}", path);
    }

    Ok(())
}
