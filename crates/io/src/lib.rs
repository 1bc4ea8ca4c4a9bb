//! `estab-io`: loads source and registry tables and writes match results.
//!
//! Readers produce [`estab_matcher::Dataset`]s; writers take a finished
//! [`estab_matcher::MatchReport`].

pub mod csv;
pub mod error;
pub mod json;
pub mod results;
pub mod xlsx;

use std::path::Path;

use estab_matcher::Dataset;

pub use error::TableError;

/// Workbook extensions read through calamine.
const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// How a dataset file is read, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Delimited,
    Workbook,
}

impl TableFormat {
    /// Anything that is not a known workbook extension is delimited text.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext {
            Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) => Self::Workbook,
            _ => Self::Delimited,
        }
    }
}

/// Load a dataset, dispatching on the file extension. `delimiter` only
/// applies to delimited text and `sheet` only to workbooks.
pub fn load_dataset(
    path: &Path,
    name: &str,
    delimiter: Option<u8>,
    sheet: Option<&str>,
) -> Result<Dataset, TableError> {
    match TableFormat::from_path(path) {
        TableFormat::Workbook => xlsx::load_workbook(path, name, sheet),
        TableFormat::Delimited => csv::load_csv(path, name, delimiter),
    }
}
