//! Write the aggregated table as CSV, or only report the target on a dry run.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::convention::Mode;
use crate::error::{AggregateError, Result};
use crate::report::Reporter;
use crate::table::Frame;

/// Persist the aggregated table as `<output_root>/<mode>_results.csv`.
///
/// With `dry_run` only the target path is reported and the filesystem is
/// left alone. Otherwise numeric columns are narrowed to single precision
/// and the CSV (header, no index column) is written to a temporary file in
/// `output_root`, then renamed over the target. Returns the target path.
pub fn write(
    mut frame: Frame,
    output_root: &Path,
    mode: Mode,
    dry_run: bool,
    reporter: &dyn Reporter,
) -> Result<PathBuf> {
    let target = output_root.join(mode.output_file_name());
    if dry_run {
        reporter.info(&format!("Results will be saved to {}", target.display()));
        return Ok(target);
    }

    std::fs::create_dir_all(output_root).map_err(|source| AggregateError::Write {
        path: output_root.to_path_buf(),
        source,
    })?;

    let narrowed = frame.narrow_numeric();
    reporter.debug(&format!(
        "Narrowed {} column(s) to single precision: {}",
        narrowed.len(),
        narrowed.join(", ")
    ));

    let mut tmp = NamedTempFile::new_in(output_root).map_err(|source| AggregateError::Write {
        path: output_root.to_path_buf(),
        source,
    })?;
    write_csv(&frame, tmp.as_file_mut()).map_err(|source| AggregateError::Csv {
        path: target.clone(),
        source,
    })?;
    tmp.as_file().sync_all().map_err(|source| AggregateError::Write {
        path: target.clone(),
        source,
    })?;
    tmp.persist(&target).map_err(|e| AggregateError::Write {
        path: target.clone(),
        source: e.error,
    })?;

    reporter.info(&format!("Results saved to {}", target.display()));
    Ok(target)
}

fn write_csv<W: Write>(frame: &Frame, out: W) -> std::result::Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(frame.columns())?;
    for row in frame.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
