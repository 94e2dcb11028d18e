//! Driver configuration
//!
//! A YAML file with optional sections. Every field has a default, so an
//! absent file (or an empty one) is a valid configuration and CLI flags
//! only override where a flag exists.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "choicegraph.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub generation: GenerationConfig,
    pub kb: KbConfig,
    pub logger: LoggerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Question corpus (JSON array of records).
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/webquestions.examples.train.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Mentions kept per question when seeding the initial graph.
    pub max_entities: usize,
    /// Retrieval F1 at which a pool entry counts as generated.
    pub f1_threshold: f64,
    /// Also expand by trimming multi-token mention spans.
    pub use_trimming: bool,
    /// Where the choice/chosen graph JSON lands.
    pub save_choice_to: PathBuf,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_entities: 1,
            f1_threshold: 0.5,
            use_trimming: false,
            save_choice_to: PathBuf::from("out/choice_graphs.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KbConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub cache_capacity: usize,
    pub result_limit: usize,
}

impl Default for KbConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://query.wikidata.org/sparql".to_string(),
            timeout_secs: 30,
            cache_capacity: 4096,
            result_limit: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Load the explicit config if given, otherwise `choicegraph.yaml` when it
/// exists, otherwise built-in defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<AppConfig> {
    match explicit {
        Some(path) => load(path),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_PATH);
            if fallback.exists() {
                load(fallback)
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}

fn load(path: &Path) -> Result<AppConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read config file {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_yaml::from_str(&text)
        .with_context(|| format!("could not parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_partial_section_keeps_the_other_defaults() {
        let config: AppConfig = serde_yaml::from_str("generation:\n  max_entities: 2\n").unwrap();

        assert_eq!(config.generation.max_entities, 2);
        assert_eq!(config.generation.f1_threshold, 0.5);
        assert!(!config.generation.use_trimming);
        assert_eq!(config.kb.endpoint, "https://query.wikidata.org/sparql");
        assert_eq!(config.logger.level, "info");
    }

    #[test]
    fn every_section_is_overridable() {
        let text = "\
dataset:
  path: data/webquestions.examples.train.json
generation:
  max_entities: 1
  f1_threshold: 0.5
  use_trimming: true
  save_choice_to: out/choice_graphs.json
kb:
  endpoint: http://localhost:9999/sparql
  timeout_secs: 5
  cache_capacity: 16
  result_limit: 100
logger:
  level: debug
";
        let config: AppConfig = serde_yaml::from_str(text).unwrap();

        assert!(config.generation.use_trimming);
        assert_eq!(config.kb.endpoint, "http://localhost:9999/sparql");
        assert_eq!(config.kb.timeout_secs, 5);
        assert_eq!(config.kb.result_limit, 100);
        assert_eq!(config.logger.level, "debug");
    }

    #[test]
    fn a_missing_default_file_falls_back_to_defaults() {
        // No choicegraph.yaml in the test working directory.
        let config = load_or_default(None).unwrap();

        assert_eq!(config.generation.max_entities, 1);
        assert_eq!(config.kb.cache_capacity, 4096);
    }

    #[test]
    fn an_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let error = load_or_default(Some(&dir.path().join("nope.yaml"))).unwrap_err();

        assert!(error.to_string().contains("could not read config file"));
    }

    #[test]
    fn an_empty_file_is_the_default_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.yaml");
        fs::write(&path, "\n").unwrap();

        let config = load_or_default(Some(&path)).unwrap();

        assert_eq!(config.generation.f1_threshold, 0.5);
    }
}
