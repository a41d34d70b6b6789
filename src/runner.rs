//! Batch processing of the configured loot files.
//!
//! Every file is independent: it is loaded, run through the probability core
//! and written out on its own. Missing files are skipped; a file that fails to
//! parse or write does not stop the others. Report names come from the input
//! file stem, so a later input whose reports would overwrite an earlier one's
//! fails instead of being processed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{error, info, warn};
use thiserror::Error;

use crate::config::Settings;
use crate::output::{write_report, OutputError, OutputPaths};
use crate::parallel::WorkerPool;
use crate::probability::{
    aggregate, calculate_loot_probabilities, snap_percentages, AggregatedResult, ContainerResult,
};
use crate::table::{load_loot_table, LoadError, LootTableDocument};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error(
        "reports for '{}' would overwrite those of '{}' ('{}')",
        .path.display(),
        .first.display(),
        .output.display()
    )]
    DuplicateOutput {
        path: PathBuf,
        first: PathBuf,
        output: PathBuf,
    },
}

/// Both result documents for one loot table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableReport {
    pub probabilities: IndexMap<String, ContainerResult>,
    pub aggregated: IndexMap<String, AggregatedResult>,
}

/// Calculate, aggregate and (when `round_percentages` is set) snap one document.
/// Aggregation always sees the unsnapped combination percentages.
pub fn analyze_document(document: &LootTableDocument, settings: &Settings) -> TableReport {
    let options = settings.output_options();
    let mut probabilities = calculate_loot_probabilities(document, options);
    let mut aggregated = aggregate(&probabilities, options);
    if settings.round_percentages {
        snap_percentages(&mut probabilities);
        snap_percentages(&mut aggregated);
    }
    TableReport {
        probabilities,
        aggregated,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub input: PathBuf,
    pub containers: usize,
    pub outputs: Vec<PathBuf>,
}

#[derive(Debug)]
pub enum FileOutcome {
    Written(ProcessedFile),
    Skipped { path: PathBuf },
    Failed { path: PathBuf, error: ProcessError },
}

/// Outcomes in configuration order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Written(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

pub fn process_file(input: &Path, settings: &Settings) -> Result<ProcessedFile, ProcessError> {
    info!("processing {}", input.display());
    let document = load_loot_table(input)?;
    let report = analyze_document(&document, settings);
    let paths = OutputPaths::for_input(Path::new(&settings.output_dir), input, settings.output_csv);
    write_report(&report, &paths)?;

    let outputs = paths.all();
    for path in &outputs {
        info!("saved {}", path.display());
    }
    Ok(ProcessedFile {
        input: input.to_path_buf(),
        containers: report.probabilities.len(),
        outputs,
    })
}

/// For each configured file, the earlier existing file whose report path it shares.
fn output_collisions(settings: &Settings) -> Vec<Option<(PathBuf, PathBuf)>> {
    let output_dir = Path::new(&settings.output_dir);
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    settings
        .loot_files
        .iter()
        .map(|file| {
            let input = PathBuf::from(file);
            if !input.exists() {
                return None;
            }
            let output = OutputPaths::for_input(output_dir, &input, settings.output_csv).probability;
            match claimed.get(&output) {
                Some(first) => Some((first.clone(), output)),
                None => {
                    claimed.insert(output, input);
                    None
                }
            }
        })
        .collect()
}

pub fn process_loot_files(settings: &Settings) -> RunSummary {
    let pool = WorkerPool::with_workers(settings.workers);
    let jobs: Vec<(&String, Option<(PathBuf, PathBuf)>)> = settings
        .loot_files
        .iter()
        .zip(output_collisions(settings))
        .collect();
    let outcomes = pool.map(&jobs, |(file, collision)| {
        let path = PathBuf::from(file.as_str());
        if !path.exists() {
            warn!("loot file '{}' not found, skipping", path.display());
            return FileOutcome::Skipped { path };
        }
        let result = match collision {
            Some((first, output)) => Err(ProcessError::DuplicateOutput {
                path: path.clone(),
                first: first.clone(),
                output: output.clone(),
            }),
            None => process_file(&path, settings),
        };
        match result {
            Ok(processed) => FileOutcome::Written(processed),
            Err(err) => {
                error!("{err}");
                FileOutcome::Failed { path, error: err }
            }
        }
    });
    RunSummary { outcomes }
}
