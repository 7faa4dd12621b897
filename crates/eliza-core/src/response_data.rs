//! Loading of the data ELIZA answers with.
//!
//! Two JSON files are read once at startup:
//! - the verb table, an object mapping first-person singular forms
//!   (`"suis"`) to second-person plural forms (`"êtes"`), kept in file order;
//! - the filler pool, a non-empty array of strings used when no rule has
//!   anything clever to say.
//!
//! Either file missing or malformed is a fatal startup error.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::DataConfig;
use crate::error::{ElizaError, Result};

/// Conjugation of one verb, from "je ..." to "vous ...".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbForms {
    pub first_singular: String,
    pub second_plural: String,
}

/// Verb table and filler pool, as loaded from disk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseData {
    pub verbs: Vec<VerbForms>,
    pub fillers: Vec<String>,
}

impl ResponseData {
    /// Load both files named by the `[data]` config section.
    pub fn load(config: &DataConfig) -> Result<Self> {
        Self::load_files(&config.verbs_path(), &config.fillers_path())
    }

    pub fn load_files(verbs_path: &Path, fillers_path: &Path) -> Result<Self> {
        let verbs = parse_verbs(&read_data_file(verbs_path)?)?;
        let fillers = parse_fillers(&read_data_file(fillers_path)?)?;
        info!(
            verbs = verbs.len(),
            fillers = fillers.len(),
            "Response data loaded"
        );
        Ok(Self { verbs, fillers })
    }
}

fn read_data_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        ElizaError::ResponseData(format!("could not read {}: {}", path.display(), e))
    })
}

/// Parse the verb table. Entries keep the order they have in the file.
pub fn parse_verbs(json: &str) -> Result<Vec<VerbForms>> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
    object
        .into_iter()
        .map(|(first_singular, value)| match value {
            serde_json::Value::String(second_plural) => Ok(VerbForms {
                first_singular,
                second_plural,
            }),
            other => Err(ElizaError::ResponseData(format!(
                "verb '{}' maps to {} instead of a string",
                first_singular, other
            ))),
        })
        .collect()
}

/// Parse the filler pool. An empty pool is rejected.
pub fn parse_fillers(json: &str) -> Result<Vec<String>> {
    let fillers: Vec<String> = serde_json::from_str(json)?;
    if fillers.is_empty() {
        return Err(ElizaError::ResponseData(
            "filler response list is empty".to_string(),
        ));
    }
    Ok(fillers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_verbs_keeps_file_order() {
        let verbs = parse_verbs(r#"{"suis": "êtes", "dis": "dites", "vais": "allez"}"#).unwrap();
        let firsts: Vec<&str> = verbs.iter().map(|v| v.first_singular.as_str()).collect();
        assert_eq!(firsts, vec!["suis", "dis", "vais"]);
        assert_eq!(verbs[0].second_plural, "êtes");
    }

    #[test]
    fn test_parse_verbs_empty_object_is_allowed() {
        assert!(parse_verbs("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_verbs_rejects_non_string_value() {
        let err = parse_verbs(r#"{"suis": 3}"#).unwrap_err();
        assert!(matches!(err, ElizaError::ResponseData(_)));
        assert!(err.to_string().contains("suis"));
    }

    #[test]
    fn test_parse_verbs_rejects_array() {
        let err = parse_verbs(r#"["suis"]"#).unwrap_err();
        assert!(matches!(err, ElizaError::Serialization(_)));
    }

    #[test]
    fn test_parse_fillers() {
        let fillers = parse_fillers(r#"["Il fait beau.", "Et alors ?"]"#).unwrap();
        assert_eq!(fillers, vec!["Il fait beau.", "Et alors ?"]);
    }

    #[test]
    fn test_parse_fillers_rejects_empty() {
        let err = parse_fillers("[]").unwrap_err();
        assert!(matches!(err, ElizaError::ResponseData(_)));
    }

    #[test]
    fn test_parse_fillers_rejects_malformed() {
        assert!(parse_fillers(r#"{"a": "b"}"#).is_err());
        assert!(parse_fillers("[1, 2]").is_err());
    }

    #[test]
    fn test_load_from_data_config() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "verbs.json", r#"{"suis": "êtes"}"#);
        write_file(dir.path(), "random.json", r#"["Je vois."]"#);

        let config = DataConfig {
            data_dir: dir.path().to_string_lossy().to_string(),
            ..DataConfig::default()
        };
        let data = ResponseData::load(&config).unwrap();
        assert_eq!(data.verbs.len(), 1);
        assert_eq!(data.fillers, vec!["Je vois."]);
    }

    #[test]
    fn test_load_missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let verbs = write_file(dir.path(), "verbs.json", "{}");
        let missing = dir.path().join("random.json");

        let err = ResponseData::load_files(&verbs, &missing).unwrap_err();
        assert!(matches!(err, ElizaError::ResponseData(_)));
        assert!(err.to_string().contains("random.json"));
    }

    #[test]
    fn test_bundled_data_files_parse() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
        let data = ResponseData::load_files(&root.join("verbs.json"), &root.join("random.json"))
            .unwrap();
        assert!(data.verbs.iter().any(|v| v.first_singular == "suis"));
        assert!(!data.fillers.is_empty());
    }
}
