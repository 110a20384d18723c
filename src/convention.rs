//! The two result layouts and how run metadata is recovered from them.
//!
//! * `main`: flat directory of `<network>_<label>_<method>_<runid>.json`.
//! * `hp_tune`: `<method>/<settings>/<dataset>/<runid>/score.json`, anywhere
//!   under the root.

use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path};

use crate::error::{AggregateError, Result};
use crate::report::Reporter;
use crate::scan::{self, Candidates};

/// Fixed artifact file name for hyperparameter-tuning runs.
pub const HP_TUNE_ARTIFACT: &str = "score.json";

/// Extension of main-mode result files.
pub const MAIN_EXTENSION: &str = "json";

/// Which experiment layout to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    #[value(name = "main")]
    Main,
    #[value(name = "hp_tune")]
    HpTune,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Main => "main",
            Mode::HpTune => "hp_tune",
        }
    }

    /// Output file name for this mode, e.g. `main_results.csv`.
    pub fn output_file_name(&self) -> String {
        format!("{}_results.csv", self.as_str())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata recovered from an artifact's location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMetadata {
    Main {
        network: String,
        label: String,
        method: String,
        runid: String,
    },
    HpTune {
        method: String,
        settings: String,
        dataset: String,
        runid: String,
    },
}

impl RunMetadata {
    pub fn method(&self) -> &str {
        match self {
            RunMetadata::Main { method, .. } | RunMetadata::HpTune { method, .. } => method,
        }
    }

    /// Metadata as (column, value) pairs, in column order.
    pub fn columns(&self) -> [(&'static str, &str); 4] {
        match self {
            RunMetadata::Main {
                network,
                label,
                method,
                runid,
            } => [
                ("network", network.as_str()),
                ("label", label.as_str()),
                ("method", method.as_str()),
                ("runid", runid.as_str()),
            ],
            RunMetadata::HpTune {
                method,
                settings,
                dataset,
                runid,
            } => [
                ("method", method.as_str()),
                ("settings", settings.as_str()),
                ("dataset", dataset.as_str()),
                ("runid", runid.as_str()),
            ],
        }
    }
}

/// Accepted method names.
///
/// Keeps both the names as given and their lower-cased forms, so each
/// convention can apply its own comparison.
#[derive(Debug, Clone)]
pub struct MethodFilter {
    exact: HashSet<String>,
    lowered: HashSet<String>,
}

impl MethodFilter {
    pub fn new<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let exact: HashSet<String> = methods.into_iter().map(Into::into).collect();
        let lowered = exact.iter().map(|m| m.to_lowercase()).collect();
        Self { exact, lowered }
    }

    pub fn contains_exact(&self, method: &str) -> bool {
        self.exact.contains(method)
    }

    pub fn contains_ignore_case(&self, method: &str) -> bool {
        self.lowered.contains(&method.to_lowercase())
    }
}

/// Scan, decode and admission rules for one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    Main,
    HpTune,
}

impl Convention {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Main => Convention::Main,
            Mode::HpTune => Convention::HpTune,
        }
    }

    /// Candidate artifacts under `root`. A missing root yields nothing.
    pub fn scan(&self, root: &Path) -> Result<Candidates> {
        match self {
            Convention::Main => scan::flat(root, MAIN_EXTENSION),
            Convention::HpTune => Ok(scan::recursive(root, HP_TUNE_ARTIFACT)),
        }
    }

    /// Recover run metadata from an artifact path found under `root`.
    pub fn decode(&self, root: &Path, path: &Path) -> Result<RunMetadata> {
        match self {
            Convention::Main => decode_main(path),
            Convention::HpTune => decode_hp_tune(root, path),
        }
    }

    /// Whether the decoded method is accepted. `main` ignores case,
    /// `hp_tune` compares exactly.
    pub fn admit(&self, meta: &RunMetadata, filter: &MethodFilter) -> bool {
        match self {
            Convention::Main => filter.contains_ignore_case(meta.method()),
            Convention::HpTune => filter.contains_exact(meta.method()),
        }
    }

    /// Report a rejected artifact: warn for `main`, debug for `hp_tune`.
    pub fn report_rejection(&self, reporter: &dyn Reporter, meta: &RunMetadata, path: &Path) {
        let msg = format!("Skipping {}: {}", meta.method(), path.display());
        match self {
            Convention::Main => reporter.warn(&msg),
            Convention::HpTune => reporter.debug(&msg),
        }
    }
}

fn decode_main(path: &Path) -> Result<RunMetadata> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let terms: Vec<&str> = stem.split('_').collect();
    match terms.as_slice() {
        [network, label, method, runid] => Ok(RunMetadata::Main {
            network: network.to_string(),
            label: label.to_string(),
            method: method.to_string(),
            runid: runid.to_string(),
        }),
        _ => Err(AggregateError::MalformedName {
            path: path.to_path_buf(),
            segments: terms.len(),
        }),
    }
}

/// Only directories below `root` count, so the outcome does not depend on
/// how the root itself is spelled.
fn decode_hp_tune(root: &Path, path: &Path) -> Result<RunMetadata> {
    let malformed = || AggregateError::MalformedLayout {
        path: path.to_path_buf(),
    };
    let relative = path.strip_prefix(root).unwrap_or(path);
    let dir = relative.parent().ok_or_else(malformed)?;
    let segments: Vec<String> = dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if segments.len() < 4 {
        return Err(malformed());
    }

    let [method, settings, dataset, runid]: [String; 4] = segments[segments.len() - 4..]
        .to_vec()
        .try_into()
        .map_err(|_| malformed())?;
    Ok(RunMetadata::HpTune {
        method,
        settings,
        dataset,
        runid,
    })
}

/// Path an artifact with this metadata would have under `root`.
#[cfg(test)]
pub fn artifact_path(root: &Path, meta: &RunMetadata) -> std::path::PathBuf {
    match meta {
        RunMetadata::Main {
            network,
            label,
            method,
            runid,
        } => root.join(format!("{network}_{label}_{method}_{runid}.{MAIN_EXTENSION}")),
        RunMetadata::HpTune {
            method,
            settings,
            dataset,
            runid,
        } => root
            .join(method)
            .join(settings)
            .join(dataset)
            .join(runid)
            .join(HP_TUNE_ARTIFACT),
    }
}
