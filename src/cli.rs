use std::fmt::Write as _;

use crate::config::{ConfigStatus, Settings, DEFAULT_CONFIG_PATH};
use crate::output::to_pretty_json;
use crate::runner::{analyze_document, process_loot_files, TableReport};
use crate::table::{load_loot_table, Quantity};

const USAGE: &str = "usage: lootodds <run|calc>";
const CALC_USAGE: &str =
    "usage: lootodds calc <loot-file> [--aggregated] [--table] [--round] [--no-condition] [--no-amount]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Run,
    Calc,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("run") => Some(Command::Run),
        Some("calc") => Some(Command::Calc),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Run) => handle_run(args),
        Some(Command::Calc) => handle_calc(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_run(args: &[String]) -> i32 {
    let config_path = args
        .get(2)
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_PATH);

    let settings = match Settings::load_or_create(config_path) {
        Ok(ConfigStatus::Loaded(settings)) => settings,
        Ok(ConfigStatus::Created(path)) => {
            eprintln!(
                "default config created at '{}'; review it and run again",
                path.display()
            );
            return 1;
        }
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };

    let summary = process_loot_files(&settings);
    println!(
        "run complete: written={}, skipped={}, failed={}",
        summary.written(),
        summary.skipped(),
        summary.failed()
    );
    if summary.has_failures() {
        1
    } else {
        0
    }
}

fn handle_calc(args: &[String]) -> i32 {
    let Some(path) = args.get(2).filter(|arg| !arg.starts_with("--")) else {
        eprintln!("{CALC_USAGE}");
        return 2;
    };
    let has_flag = |flag: &str| args.iter().skip(3).any(|arg| arg == flag);
    let aggregated = has_flag("--aggregated");

    let settings = Settings {
        output_min_max_condition: !has_flag("--no-condition"),
        output_min_max_amount: !has_flag("--no-amount"),
        round_percentages: has_flag("--round"),
        ..Settings::default()
    };

    let document = match load_loot_table(path) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("calc failed: {err}");
            return 1;
        }
    };
    let report = analyze_document(&document, &settings);

    if has_flag("--table") {
        print!("{}", format_table(&report, aggregated));
        return 0;
    }

    let payload = if aggregated {
        to_pretty_json(&report.aggregated)
    } else {
        to_pretty_json(&report.probabilities)
    };
    match payload {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize calc result: {err}");
            1
        }
    }
}

/// Tab-separated view: one line per container/combination, or per container/item
/// with amount bounds when `aggregated`.
pub fn format_table(report: &TableReport, aggregated: bool) -> String {
    let mut out = String::new();
    if aggregated {
        out.push_str("container\titem\tprobability\tmin\tmax\n");
        for (container, result) in &report.aggregated {
            for (item, probability) in &result.probabilities {
                let bounds = result.amounts.get(item).copied().unwrap_or_default();
                let _ = writeln!(
                    out,
                    "{container}\t{item}\t{probability:.2}\t{}\t{}",
                    cell(bounds.min),
                    cell(bounds.max)
                );
            }
        }
    } else {
        out.push_str("container\tcombination\tprobability\n");
        for (container, result) in &report.probabilities {
            for (combination, probability) in &result.probabilities {
                let _ = writeln!(out, "{container}\t{combination}\t{probability:.2}");
            }
        }
    }
    out
}

fn cell(value: Option<Quantity>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
