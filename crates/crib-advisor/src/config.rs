use crib_core::analysis::{AnalyzerConfig, CutMode};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

use crate::report::ReportFormat;

const DEFAULT_RUN_ID: &str = "adhoc";
const TELEMETRY_FILE: &str = "telemetry.jsonl";
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root advisor configuration, loaded from YAML or assembled from command-line flags.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AdvisorConfig {
    #[serde(default = "default_run_id")]
    pub run_id: String,
    #[serde(default)]
    pub hands: Vec<String>,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            run_id: default_run_id(),
            hands: Vec::new(),
            analysis: AnalysisConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: AdvisorConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate_fields().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Full validation, run once command-line overrides have been applied.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.validate_fields()?;
        if self.hands.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "hands".to_string(),
                message: "at least one hand must be given".to_string(),
            });
        }
        Ok(())
    }

    /// Checks that do not depend on the hand list, which the command line may still extend.
    fn validate_fields(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        validate_hands(&self.hands)?;
        self.output.validate()?;
        self.logging.normalize();
        Ok(())
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            cut_mode: self.analysis.cut_mode,
            parallel: self.analysis.parallel,
        }
    }

    /// Resolve output templates (`{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        let report = self
            .output
            .path
            .as_deref()
            .map(|template| resolve_template(&self.run_id, template));
        let plots_dir = self
            .output
            .plots_dir
            .as_deref()
            .map(|template| resolve_template(&self.run_id, template));
        let telemetry = report
            .as_ref()
            .and_then(|path| path.parent())
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(TELEMETRY_FILE);
        ResolvedOutputs {
            report,
            plots_dir,
            telemetry,
        }
    }
}

fn default_run_id() -> String {
    DEFAULT_RUN_ID.to_string()
}

/// How discards are evaluated.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub cut_mode: CutMode,
    #[serde(default)]
    pub parallel: bool,
}

/// Report destination. Without a path the report goes to stdout.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: ReportFormat,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub plots_dir: Option<String>,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        for (label, value) in [
            ("output.path", &self.path),
            ("output.plots_dir", &self.plots_dir),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_hands(hands: &[String]) -> Result<(), ValidationError> {
    for (index, hand) in hands.iter().enumerate() {
        if hand.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: format!("hands[{index}]"),
                message: "hand must not be empty".to_string(),
            });
        }
    }
    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub report: Option<PathBuf>,
    pub plots_dir: Option<PathBuf>,
    pub telemetry: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
