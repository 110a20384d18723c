use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

use crate::convention::Mode;
use crate::error::ConfigError;

/// Config file consulted when `--config` is not given. May be absent.
pub const DEFAULT_CONFIG_FILE: &str = "aggregate.toml";

/// Every method the benchmark trains. Default whitelist for `--methods`.
pub const ALL_METHODS: &[&str] = &[
    "LogReg",
    "SVM",
    "LabelProp",
    "MLP",
    "SGC",
    "GCN",
    "GIN",
    "GAT",
    "GatedGCN",
    "SAGE",
    "GraphSAGE",
    "N2V",
    "LINE1",
    "LINE2",
    "HOPE",
    "LapEigMap",
    "Walklets",
    "ADJ",
];

/// Top-level configuration loaded from aggregate.toml.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AggregateConfig {
    pub paths: PathsConfig,
    pub methods: MethodsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub main_results: PathBuf,
    pub hp_tune_results: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MethodsConfig {
    pub roster: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            main_results: PathBuf::from("results"),
            hp_tune_results: PathBuf::from("hp_tune_results"),
            output: PathBuf::from("aggregated_results"),
        }
    }
}

impl Default for MethodsConfig {
    fn default() -> Self {
        Self {
            roster: ALL_METHODS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl AggregateConfig {
    /// Load `path`. When the file is missing and was not asked for
    /// explicitly, built-in defaults are used.
    pub fn load(path: &Path, explicit: bool) -> Result<Self, ConfigError> {
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Input root used when `--results_path` is `auto`.
    pub fn default_results_path(&self, mode: Mode) -> &Path {
        match mode {
            Mode::Main => &self.paths.main_results,
            Mode::HpTune => &self.paths.hp_tune_results,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone)]
pub struct Overrides {
    pub mode: Mode,
    /// A path, or `auto` to use the mode's configured root.
    pub results_path: String,
    pub output_path: Option<PathBuf>,
    pub methods: Option<Vec<String>>,
    pub dry_run: bool,
    pub log_level: String,
}

/// Fully resolved settings for one aggregation run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: Mode,
    pub results_path: PathBuf,
    pub output_path: PathBuf,
    pub methods: Vec<String>,
    pub dry_run: bool,
    pub log_level: LevelFilter,
}

impl Settings {
    /// Merge CLI overrides onto the config and validate the result.
    pub fn resolve(overrides: Overrides, config: &AggregateConfig) -> Result<Self, ConfigError> {
        let log_level = parse_log_level(&overrides.log_level)?;

        let results_path = if overrides.results_path == "auto" {
            config.default_results_path(overrides.mode).to_path_buf()
        } else {
            PathBuf::from(&overrides.results_path)
        };
        if results_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("results path"));
        }

        let output_path = overrides
            .output_path
            .unwrap_or_else(|| config.paths.output.clone());
        if output_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("output path"));
        }

        let methods = overrides
            .methods
            .unwrap_or_else(|| config.methods.roster.clone());
        if methods.is_empty() {
            return Err(ConfigError::NoMethods);
        }
        if methods.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::BlankMethod);
        }

        Ok(Self {
            mode: overrides.mode,
            results_path,
            output_path,
            methods,
            dry_run: overrides.dry_run,
            log_level,
        })
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Settings:")?;
        writeln!(f, "  mode:         {}", self.mode)?;
        writeln!(f, "  results_path: {}", self.results_path.display())?;
        writeln!(f, "  output_path:  {}", self.output_path.display())?;
        writeln!(f, "  dry_run:      {}", self.dry_run)?;
        writeln!(f, "  log_level:    {}", self.log_level)?;
        write!(f, "  methods:      {}", self.methods.join(", "))
    }
}

/// Parse a level name, accepting the spellings of common logging setups
/// (`WARNING`, `CRITICAL`) in any case.
pub fn parse_log_level(level: &str) -> Result<LevelFilter, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "error" | "critical" | "fatal" => Ok(LevelFilter::ERROR),
        "off" => Ok(LevelFilter::OFF),
        _ => Err(ConfigError::LogLevel(level.to_string())),
    }
}
