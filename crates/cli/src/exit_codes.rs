//! CLI Exit Code Registry
//!
//! Single source of truth for `estab` exit codes. Scripts and schedulers
//! rely on them, so existing values never change meaning.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | Usage error (bad arguments; emitted by clap)             |
//! | 3    | Invalid config (parse, validation, missing column)       |
//! | 4    | Runtime failure (unreadable input, failed output write)  |
//! | 5    | Unmatched rows present and `--fail-on-unmatched` was set |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config could not be parsed, failed validation, or names a column the
/// loaded data does not have.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Reading an input or writing an output failed.
pub const EXIT_RUNTIME: u8 = 4;

/// The run completed but some source rows have no establishment unit.
pub const EXIT_UNMATCHED: u8 = 5;

use estab_matcher::MatchError;

/// Map an engine error to its exit code.
pub fn match_exit_code(err: &MatchError) -> u8 {
    match err {
        MatchError::ConfigParse(_)
        | MatchError::ConfigValidation(_)
        | MatchError::MissingColumn { .. } => EXIT_INVALID_CONFIG,
        MatchError::ThreadPool(_) => EXIT_RUNTIME,
    }
}
