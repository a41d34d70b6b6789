//! Result documents on disk: `<stem>_probability.json`,
//! `<stem>_aggregated_probability.json` and the optional aggregated CSV.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;

use crate::probability::AggregatedResult;
use crate::table::Quantity;
use crate::runner::TableReport;

const JSON_INDENT: &[u8] = b"    ";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create output directory '{}': {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to serialize '{}': {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to write CSV '{}': {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

/// Where the documents for one input file go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub probability: PathBuf,
    pub aggregated: PathBuf,
    pub csv: Option<PathBuf>,
}

impl OutputPaths {
    pub fn for_input(output_dir: &Path, input: &Path, with_csv: bool) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "loottable".to_string());
        Self {
            probability: output_dir.join(format!("{stem}_probability.json")),
            aggregated: output_dir.join(format!("{stem}_aggregated_probability.json")),
            csv: with_csv.then(|| output_dir.join(format!("{stem}_aggregated_probability.csv"))),
        }
    }

    pub fn all(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.probability.clone(), self.aggregated.clone()];
        paths.extend(self.csv.clone());
        paths
    }
}

/// Pretty JSON with 4-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), OutputError> {
    let payload = to_pretty_json(value).map_err(|source| OutputError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, payload).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write every document of `report`, creating parent directories as needed.
pub fn write_report(report: &TableReport, paths: &OutputPaths) -> Result<(), OutputError> {
    if let Some(dir) = paths.probability.parent() {
        fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    write_json(&paths.probability, &report.probabilities)?;
    write_json(&paths.aggregated, &report.aggregated)?;
    if let Some(csv_path) = &paths.csv {
        let csv_err = |source: csv::Error| OutputError::Csv {
            path: csv_path.clone(),
            source,
        };
        let file = fs::File::create(csv_path).map_err(|err| csv_err(err.into()))?;
        write_aggregated_csv(file, &report.aggregated).map_err(csv_err)?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct AggregatedRow<'a> {
    container: &'a str,
    item: &'a str,
    probability: f64,
    min_amount: Option<Quantity>,
    max_amount: Option<Quantity>,
    min_condition: Option<f64>,
    max_condition: Option<f64>,
}

/// One row per container/item, in document order.
pub fn write_aggregated_csv<W: io::Write>(
    writer: W,
    aggregated: &IndexMap<String, AggregatedResult>,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for (container, result) in aggregated {
        for (item, &probability) in &result.probabilities {
            let bounds = result.amounts.get(item).copied().unwrap_or_default();
            writer.serialize(AggregatedRow {
                container,
                item,
                probability,
                min_amount: bounds.min,
                max_amount: bounds.max,
                min_condition: bounds.min_condition,
                max_condition: bounds.max_condition,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}
