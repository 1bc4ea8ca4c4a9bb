// JSON report export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use estab_matcher::MatchReport;
use log::info;

use crate::error::TableError;

/// Write the full report (meta, summary, rows) as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &MatchReport) -> Result<(), TableError> {
    let file = File::create(path).map_err(|e| TableError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report).map_err(|e| TableError::write(path, e))?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| TableError::write(path, e))?;

    info!("wrote JSON report to {}", path.display());
    Ok(())
}
