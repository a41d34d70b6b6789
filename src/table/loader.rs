//! Reads loot-table documents from disk. `.yaml`/`.yml` go through serde_yaml,
//! anything else is parsed as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::table::model::LootTableDocument;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read loot table '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse loot table JSON '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to parse loot table YAML '{}': {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

pub(crate) fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
        })
}

/// Parse a loot-table document from a string. `yaml` selects the YAML parser.
pub fn parse_loot_table(raw: &str, yaml: bool) -> Result<LootTableDocument, LoadError> {
    parse_at(Path::new("<inline>"), raw, yaml)
}

/// Load a loot-table document, picking the parser by file extension.
pub fn load_loot_table(path: impl AsRef<Path>) -> Result<LootTableDocument, LoadError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_at(path, &raw, is_yaml_path(path))
}

fn parse_at(path: &Path, raw: &str, yaml: bool) -> Result<LootTableDocument, LoadError> {
    if yaml {
        serde_yaml::from_str(raw).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(raw).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_extension_detection_is_case_insensitive() {
        assert!(is_yaml_path(Path::new("tables/heli.YAML")));
        assert!(is_yaml_path(Path::new("tables/heli.yml")));
        assert!(!is_yaml_path(Path::new("tables/heli.json")));
        assert!(!is_yaml_path(Path::new("tables/heli")));
    }

    #[test]
    fn yaml_and_json_documents_parse_to_the_same_shape() {
        let json = r#"{"loot_advanced":{"crate":{"Loops":2,"LootSpawnSlots":[]}}}"#;
        let yaml = "loot_advanced:\n  crate:\n    Loops: 2\n    LootSpawnSlots: []\n";
        let from_json = parse_loot_table(json, false).expect("json");
        let from_yaml = parse_loot_table(yaml, true).expect("yaml");
        assert_eq!(from_json.loot_advanced["crate"].loops(), 2.0);
        assert_eq!(from_yaml.loot_advanced["crate"].loops(), 2.0);
    }

    #[test]
    fn malformed_json_reports_a_parse_error() {
        let err = parse_loot_table("{\"loot_advanced\": ", false).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
        assert!(err.to_string().contains("failed to parse loot table JSON"));
    }

    #[test]
    fn missing_file_reports_a_read_error() {
        let err = load_loot_table("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }
}
