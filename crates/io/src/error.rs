use std::fmt;
use std::path::{Path, PathBuf};

/// Failure to read a dataset or write a results file.
#[derive(Debug)]
pub enum TableError {
    /// The file could not be opened, read or created.
    Io { path: PathBuf, message: String },
    /// Delimited text that the CSV reader rejected.
    Csv { path: PathBuf, message: String },
    /// A workbook calamine could not open or read.
    Workbook { path: PathBuf, message: String },
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: Vec<String>,
    },
    /// No header row.
    Empty { path: PathBuf },
    /// A results writer failed after the file was opened.
    Write { path: PathBuf, message: String },
}

impl TableError {
    pub(crate) fn io(path: &Path, err: impl fmt::Display) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(path: &Path, err: impl fmt::Display) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
            Self::Csv { path, message } => {
                write!(f, "{}: CSV parse error: {message}", path.display())
            }
            Self::Workbook { path, message } => {
                write!(f, "{}: failed to read workbook: {message}", path.display())
            }
            Self::SheetNotFound {
                path,
                sheet,
                available,
            } => write!(
                f,
                "{}: sheet '{sheet}' not found (available: {})",
                path.display(),
                available.join(", ")
            ),
            Self::Empty { path } => write!(f, "{}: file has no header row", path.display()),
            Self::Write { path, message } => {
                write!(f, "{}: write error: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for TableError {}
