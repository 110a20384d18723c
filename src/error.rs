//! Error taxonomy for result aggregation.
//!
//! Every variant here is fatal for the run. Rejected methods are not errors;
//! they are reported through the [`Reporter`](crate::report::Reporter).

use std::path::PathBuf;
use thiserror::Error;

use crate::convention::Mode;

/// Problems detected while resolving settings, before any scanning begins.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid log level '{0}' (expected TRACE, DEBUG, INFO, WARNING, ERROR or CRITICAL)")]
    LogLevel(String),

    #[error("method names must not be blank")]
    BlankMethod,

    #[error("no methods to aggregate: the method list is empty")]
    NoMethods,

    #[error("{0} must not be empty")]
    EmptyPath(&'static str),
}

/// Failures of one aggregation run, from scanning through writing.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("nothing to aggregate: no admitted result artifacts under {} (mode: {mode})", .root.display())]
    NothingToAggregate { mode: Mode, root: PathBuf },

    #[error(
        "malformed result file name {}: expected <network>_<label>_<method>_<runid>.json, got {segments} segment(s)",
        .path.display()
    )]
    MalformedName { path: PathBuf, segments: usize },

    #[error(
        "malformed result layout {}: expected <method>/<settings>/<dataset>/<runid>/score.json",
        .path.display()
    )]
    MalformedLayout { path: PathBuf },

    #[error("failed to scan {}: {reason}", .root.display())]
    Scan { root: PathBuf, reason: String },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed result artifact {}: {reason}", .path.display())]
    MalformedArtifact { path: PathBuf, reason: String },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode CSV for {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

pub type Result<T> = std::result::Result<T, AggregateError>;
