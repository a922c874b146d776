use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::model::{Variable, PCA_VARIABLES};

/// Environment variable that overrides [`StoryConfig::data_path`].
pub const DATA_PATH_ENV: &str = "GRADE_LENS_DATA";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for one data-story session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoryConfig {
    /// The student file, read once at startup.
    pub data_path: PathBuf,
    /// Below this many filtered records the PCA view reports insufficient data.
    pub min_pca_records: usize,
    /// Variables projected by PCA, in loading order.
    pub pca_variables: Vec<Variable>,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/student-mat.csv"),
            min_pca_records: 10,
            pca_variables: PCA_VARIABLES.to_vec(),
        }
    }
}

impl StoryConfig {
    /// Parse a JSON config; absent fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Apply [`DATA_PATH_ENV`] if it is set and non-empty.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = std::env::var_os(DATA_PATH_ENV).filter(|p| !p.is_empty()) {
            log::debug!("Data path overridden by {DATA_PATH_ENV}");
            self.data_path = PathBuf::from(path);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_story() {
        let config = StoryConfig::default();
        assert_eq!(config.min_pca_records, 10);
        assert_eq!(config.pca_variables.len(), 12);
        assert!(!config.pca_variables.contains(&Variable::G3));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = StoryConfig::from_json(r#"{ "min_pca_records": 25 }"#).unwrap();
        assert_eq!(config.min_pca_records, 25);
        assert_eq!(config.data_path, StoryConfig::default().data_path);
    }

    #[test]
    fn variables_are_named_by_column() {
        let config =
            StoryConfig::from_json(r#"{ "pca_variables": ["goout", "Dalc", "Walc"] }"#).unwrap();
        assert_eq!(
            config.pca_variables,
            vec![
                Variable::GoingOut,
                Variable::WeekdayAlcohol,
                Variable::WeekendAlcohol
            ]
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            StoryConfig::from_json(r#"{ "iterations": 5 }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.json");
        std::fs::write(&path, r#"{ "data_path": "elsewhere.csv" }"#).unwrap();
        let config = StoryConfig::from_json_file(&path).unwrap();
        assert_eq!(config.data_path, PathBuf::from("elsewhere.csv"));
    }
}
