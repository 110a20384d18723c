//! Candidate artifact discovery.
//!
//! Both scanners are lazy; nothing beyond directory listings is read here.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Paths};
use walkdir::WalkDir;

use crate::error::{AggregateError, Result};

/// Lazily yields candidate artifact paths for one scan.
pub enum Candidates {
    Empty,
    Flat {
        root: PathBuf,
        paths: Paths,
    },
    Walk {
        root: PathBuf,
        target: &'static str,
        entries: walkdir::IntoIter,
    },
}

/// Regular files directly under `root` ending in `.{extension}`.
///
/// Hidden files are not matched. Results come in glob's sorted order.
pub fn flat(root: &Path, extension: &str) -> Result<Candidates> {
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        extension
    );
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let paths = glob::glob_with(&pattern, options).map_err(|e| AggregateError::Scan {
        root: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(Candidates::Flat {
        root: root.to_path_buf(),
        paths,
    })
}

/// Every file named `target` anywhere under `root`.
///
/// Directory entries are visited sorted by file name so repeated scans of
/// the same tree agree.
pub fn recursive(root: &Path, target: &'static str) -> Candidates {
    if !root.exists() {
        return Candidates::Empty;
    }
    Candidates::Walk {
        root: root.to_path_buf(),
        target,
        entries: WalkDir::new(root).sort_by_file_name().into_iter(),
    }
}

impl Iterator for Candidates {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Candidates::Empty => None,
            Candidates::Flat { root, paths } => loop {
                match paths.next()? {
                    Ok(path) if path.is_file() => return Some(Ok(path)),
                    Ok(_) => continue,
                    Err(e) => {
                        return Some(Err(AggregateError::Scan {
                            root: root.clone(),
                            reason: format!("{}: {}", e.path().display(), e.error()),
                        }))
                    }
                }
            },
            Candidates::Walk {
                root,
                target,
                entries,
            } => loop {
                match entries.next()? {
                    Ok(entry) => {
                        if entry.file_name() == *target && !entry.file_type().is_dir() {
                            return Some(Ok(entry.into_path()));
                        }
                    }
                    Err(e) => {
                        return Some(Err(AggregateError::Scan {
                            root: root.clone(),
                            reason: e.to_string(),
                        }))
                    }
                }
            },
        }
    }
}
