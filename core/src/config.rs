//! Configuration management for sautibench.
//!
//! Handles loading, saving, and providing defaults for the benchmark
//! configuration: target languages, registry query settings, dataset
//! location, and output paths.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "sautibench.toml";

/// Default GGML weights file inside a hub model repository.
pub const DEFAULT_MODEL_FILE: &str = "ggml-model.bin";

/// Main configuration struct for a benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target languages and their registry language codes.
    #[serde(default = "default_languages")]
    pub languages: Vec<Language>,
    pub scrape: ScrapeConfig,
    pub dataset: DatasetConfig,
    pub eval: EvalConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// A target language with the ISO-639 codes the registry knows it by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    /// Display name, used as the matrix row label (e.g. "Yoruba").
    pub name: String,
    /// Registry language codes, usually the two- and three-letter ISO forms.
    pub codes: Vec<String>,
}

impl Language {
    pub fn new(name: impl Into<String>, codes: &[&str]) -> Self {
        Self {
            name: name.into(),
            codes: codes.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// Registry query configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Base URL of the model hub API.
    pub api_base: String,
    /// Pipeline task tag to filter models by.
    pub task: String,
    /// Maximum number of models fetched per language-code query.
    pub limit: u32,
}

/// Dataset location configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Root directory containing `<language-code>/<split>/` subdirectories.
    pub root: PathBuf,
    /// Split name to evaluate (e.g. "test", "dev").
    pub split: String,
}

/// Evaluation loop configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Cap on utterances per split. None evaluates the whole split.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_samples: Option<usize>,
    /// Hub model id → weights file name, for repositories that don't use
    /// the default `ggml-model.bin`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub model_files: BTreeMap<String, String>,
}

impl EvalConfig {
    /// Weights file name for a hub model id.
    pub fn model_file<'a>(&'a self, model_id: &str) -> &'a str {
        self.model_files
            .get(model_id)
            .map_or(DEFAULT_MODEL_FILE, String::as_str)
    }
}

/// Output file configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Support matrix CSV path.
    pub matrix_path: PathBuf,
    /// Results table CSV path.
    pub results_path: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: LogLevel,
}

/// Log verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to a tracing filter directive string for the core crate.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "sautibench_core=error",
            LogLevel::Warn => "sautibench_core=warn",
            LogLevel::Info => "sautibench_core=info",
            LogLevel::Debug => "sautibench_core=debug",
            LogLevel::Trace => "sautibench_core=trace",
        }
    }
}

/// The target language set of the benchmark, with the registry codes each
/// language is tagged under.
fn default_languages() -> Vec<Language> {
    vec![
        Language::new("Zulu", &["zu", "zul"]),
        Language::new("Luo", &["luo"]),
        Language::new("Kikuyu", &["ki", "kik"]),
        Language::new("Yoruba", &["yo", "yor"]),
        Language::new("Igbo", &["ig", "ibo"]),
        Language::new("Hausa", &["ha", "hau"]),
        Language::new("Amharic", &["am", "amh"]),
        Language::new("Tigrinya", &["ti", "tir"]),
        Language::new("Sidamo", &["sid"]),
        Language::new("Oromo", &["om"]),
        Language::new("Wolaytta", &["wal"]),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            scrape: ScrapeConfig::default(),
            dataset: DatasetConfig::default(),
            eval: EvalConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            api_base: "https://huggingface.co/api".to_string(),
            task: "automatic-speech-recognition".to_string(),
            limit: 50,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            split: "test".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            matrix_path: PathBuf::from("asr_language_support_matrix.csv"),
            results_path: PathBuf::from("asr_eval_results.csv"),
        }
    }
}

impl Config {
    /// Load configuration from the default path in the working directory.
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file as TOML")
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Union of all language codes across configured languages.
    pub fn all_language_codes(&self) -> BTreeSet<String> {
        self.languages
            .iter()
            .flat_map(|l| l.codes.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
