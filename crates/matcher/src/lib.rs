//! `estab-matcher`: finds KBO establishment units by address similarity.
//!
//! Pure engine crate: receives pre-loaded datasets, returns one outcome per
//! source row plus summary statistics. No CLI or IO dependencies.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod index;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod similarity;
pub mod summary;

pub use config::MatchConfig;
pub use dataset::{Dataset, Row, Value};
pub use engine::run;
pub use error::MatchError;
pub use matcher::{match_row, select_best, MatchFields};
pub use model::{AddressMatch, MatchFailure, MatchOutcome, MatchReport, ResultRow};
pub use normalize::normalize;
pub use similarity::{bigrams, score, BigramSet};
