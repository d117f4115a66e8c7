//! Run configuration.
//!
//! A TOML file describes where the flat files live and how to read them.
//! Every section is optional; missing keys take the defaults below. Relative
//! paths resolve against `paths.data_dir`, and a relative `data_dir` against
//! the directory holding the config file.
//!
//! ```toml
//! [paths]
//! data_dir = "_data"
//! corrections = "corrections.tsv"
//!
//! [reconcile]
//! duplicates = "keep"
//!
//! [lookup]
//! min_interval_ms = 250
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dcr_core::{DEFAULT_KEPT_TRIAL_TYPE, ReconcileOptions};
use dcr_ingest::{MergedOptions, RosterOptions, TrialSourceOptions};
use dcr_lookup::LookupConfig;
use dcr_normalization::DEFAULT_NON_DRUG_PREFIXES;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {message}")]
    Invalid { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub trials: PathBuf,
    pub roster: PathBuf,
    pub ignored: PathBuf,
    pub missing: PathBuf,
    pub merged: PathBuf,
    /// Extra spelling corrections (`From`, `To`).
    pub corrections: Option<PathBuf>,
    /// Machine-readable run report.
    pub report: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("_data"),
            trials: PathBuf::from("ReDO_covid19db.txt"),
            roster: PathBuf::from("master.csv"),
            ignored: PathBuf::from("ignored_compounds.tsv"),
            missing: PathBuf::from("missing_compounds.tsv"),
            merged: PathBuf::from("drug_candidates.tsv"),
            corrections: None,
            report: None,
        }
    }
}

impl PathsConfig {
    /// Resolves a configured path against the data directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    pub fn trials_path(&self) -> PathBuf {
        self.resolve(&self.trials)
    }

    pub fn roster_path(&self) -> PathBuf {
        self.resolve(&self.roster)
    }

    pub fn ignored_path(&self) -> PathBuf {
        self.resolve(&self.ignored)
    }

    pub fn missing_path(&self) -> PathBuf {
        self.resolve(&self.missing)
    }

    pub fn merged_path(&self) -> PathBuf {
        self.resolve(&self.merged)
    }

    pub fn corrections_path(&self) -> Option<PathBuf> {
        self.corrections.as_deref().map(|path| self.resolve(path))
    }

    pub fn report_path(&self) -> Option<PathBuf> {
        self.report.as_deref().map(|path| self.resolve(path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Tokens starting with one of these are not drugs.
    pub non_drug_prefixes: Vec<String>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            non_drug_prefixes: DEFAULT_NON_DRUG_PREFIXES
                .iter()
                .map(|prefix| (*prefix).to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationConfig {
    /// Trial type never proposed for the ignore-list.
    pub kept_trial_type: String,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            kept_trial_type: DEFAULT_KEPT_TRIAL_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub paths: PathsConfig,
    pub trials: TrialSourceOptions,
    pub roster: RosterOptions,
    pub merged: MergedOptions,
    pub normalization: NormalizationConfig,
    pub reconcile: ReconcileOptions,
    pub lookup: LookupConfig,
    pub curation: CurationConfig,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        if config.paths.data_dir.is_relative()
            && let Some(parent) = path.parent()
        {
            config.paths.data_dir = parent.join(&config.paths.data_dir);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reconcile.sentinel.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "reconcile.sentinel must not be empty".to_string(),
            });
        }
        if self.reconcile.sentinel.contains(',') {
            return Err(ConfigError::Invalid {
                message: "reconcile.sentinel must not contain a comma".to_string(),
            });
        }
        if self.lookup.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "lookup.timeout_secs must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use dcr_core::DuplicateTrials;
    use dcr_model::TrialDisplay;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = RunConfig::from_toml("").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.reconcile.sentinel, "Covid trial");
        assert_eq!(config.lookup.min_interval_ms, 200);
        assert_eq!(config.trials.encoding, "windows-1252");
    }

    #[test]
    fn sections_override_defaults() {
        let config = RunConfig::from_toml(
            r#"
            [paths]
            data_dir = "/srv/data"
            corrections = "corrections.tsv"

            [reconcile]
            duplicates = "keep"
            display = "id"
            strict_synonyms = true

            [lookup]
            max_retries = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.reconcile.duplicates, DuplicateTrials::Keep);
        assert_eq!(config.reconcile.display, TrialDisplay::Id);
        assert!(config.reconcile.strict_synonyms);
        assert_eq!(config.lookup.max_retries, 5);
        assert_eq!(config.lookup.min_interval_ms, 200);
        assert_eq!(
            config.paths.corrections_path(),
            Some(PathBuf::from("/srv/data/corrections.tsv"))
        );
        assert_eq!(
            config.paths.trials_path(),
            PathBuf::from("/srv/data/ReDO_covid19db.txt")
        );
    }

    #[test]
    fn relative_data_dir_follows_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "[paths]\ndata_dir = \"data\"\n").unwrap();
        let config = RunConfig::load(&path).unwrap();
        assert_eq!(config.paths.data_dir, dir.path().join("data"));
    }

    #[test]
    fn blank_sentinel_is_rejected() {
        let mut config = RunConfig::default();
        config.reconcile.sentinel = " ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
