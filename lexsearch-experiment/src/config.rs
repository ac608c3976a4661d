use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Words the participant must find, shuffled per participant.
    pub target_words: Vec<String>,
    /// Time a word must stay under the cursor before it is sampled.
    pub dwell_threshold_ms: u64,
    /// Pause after a found word before the next target is shown.
    pub inter_trial_interval_ms: u64,
    pub results_dir: PathBuf,
    /// CSV whose first column is the dictionary; built-in list when unset.
    pub word_list: Option<PathBuf>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            target_words: [
                "abandon", "abeille", "acheter", "amour", "article", "acteur", "accident",
                "appeler", "analyser", "allumer", "aimer", "abricot",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            dwell_threshold_ms: 1000,
            inter_trial_interval_ms: 1000,
            results_dir: PathBuf::from("results"),
            word_list: None,
        }
    }
}

impl ExperimentConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_words.is_empty() {
            return Err(Error::Config("target_words must not be empty".to_string()));
        }
        if let Some(blank) = self.target_words.iter().position(|w| w.trim().is_empty()) {
            return Err(Error::Config(format!(
                "target_words[{blank}] must not be blank"
            )));
        }
        if self.dwell_threshold_ms == 0 {
            return Err(Error::Config("dwell_threshold_ms must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn dwell_threshold(&self) -> Duration {
        Duration::from_millis(self.dwell_threshold_ms)
    }

    pub fn inter_trial_interval(&self) -> Duration {
        Duration::from_millis(self.inter_trial_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_is_valid() {
        let config = ExperimentConfig::default();
        assert_eq!(config.target_words.len(), 12);
        assert_eq!(config.dwell_threshold(), Duration::from_secs(1));
        config.validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "target_words = [\"amour\", \"aimer\"]").unwrap();
        writeln!(file, "inter_trial_interval_ms = 250").unwrap();

        let config = ExperimentConfig::load(file.path()).unwrap();
        assert_eq!(config.target_words, vec!["amour", "aimer"]);
        assert_eq!(config.inter_trial_interval_ms, 250);
        assert_eq!(config.dwell_threshold_ms, 1000);
        assert_eq!(config.results_dir, PathBuf::from("results"));
    }

    #[test]
    fn rejects_empty_targets_and_zero_dwell() {
        let config = ExperimentConfig {
            target_words: vec![],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = ExperimentConfig {
            target_words: vec!["amour".into(), "  ".into()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = ExperimentConfig {
            dwell_threshold_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "dwell_threshold_ms = \"soon\"").unwrap();
        assert!(matches!(
            ExperimentConfig::load(file.path()),
            Err(Error::ConfigParse(_))
        ));
    }
}
