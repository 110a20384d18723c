//! Scan, decode, filter and load result artifacts into one table.

use std::path::Path;

use crate::convention::{Convention, MethodFilter, Mode};
use crate::error::{AggregateError, Result};
use crate::loader;
use crate::report::Reporter;
use crate::table::{self, Frame};

/// Collect every admitted artifact under `root` into one table.
///
/// Candidates are processed strictly in scan order. A malformed name,
/// layout or artifact aborts the run; a rejected method only skips that
/// artifact. Fails with [`AggregateError::NothingToAggregate`] when no
/// artifact was admitted.
pub fn aggregate(
    mode: Mode,
    root: &Path,
    filter: &MethodFilter,
    reporter: &dyn Reporter,
) -> Result<Frame> {
    let convention = Convention::for_mode(mode);
    let mut frames: Vec<Frame> = Vec::new();
    let mut seen = 0usize;
    let mut rejected = 0usize;

    for candidate in convention.scan(root)? {
        let path = candidate?;
        seen += 1;

        let meta = convention.decode(root, &path)?;
        if convention.admit(&meta, filter) {
            frames.push(loader::load(&path, &meta)?);
        } else {
            convention.report_rejection(reporter, &meta, &path);
            rejected += 1;
        }
        reporter.debug(&format!("[{seen}] {}", path.display()));
    }

    let admitted = frames.len();
    let rows: usize = frames.iter().map(Frame::num_rows).sum();
    reporter.info(&format!(
        "Scanned {seen} candidate(s) under {}: {admitted} admitted, {rejected} rejected, {rows} row(s)",
        root.display()
    ));

    table::concat(frames).ok_or_else(|| AggregateError::NothingToAggregate {
        mode,
        root: root.to_path_buf(),
    })
}
