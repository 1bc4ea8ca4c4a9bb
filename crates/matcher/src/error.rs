use std::fmt;

/// Fatal errors. Row-level failures never surface here; they are carried
/// per row as [`crate::model::MatchFailure`].
#[derive(Debug)]
pub enum MatchError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, empty address list, etc.).
    ConfigValidation(String),
    /// A configured column is not present in a dataset's header.
    MissingColumn {
        dataset: String,
        column: String,
        available: Vec<String>,
    },
    /// The dedicated worker pool could not be started.
    ThreadPool(String),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { dataset, column, available } => {
                write!(
                    f,
                    "{dataset} data: missing column '{column}' (available: {})",
                    available.join(", ")
                )
            }
            Self::ThreadPool(msg) => write!(f, "cannot start worker pool: {msg}"),
        }
    }
}

impl std::error::Error for MatchError {}
