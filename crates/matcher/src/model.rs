use std::borrow::Cow;

use serde::ser::Serializer;
use serde::Serialize;

use crate::dataset::{Row, Value};
use crate::summary::MatchSummary;

// ---------------------------------------------------------------------------
// Row outcome
// ---------------------------------------------------------------------------

/// Result of matching one source row. Exactly one variant per row.
#[derive(Debug, Clone)]
pub enum MatchOutcome<'a> {
    Matched(AddressMatch<'a>),
    Unmatched(MatchFailure),
}

impl<'a> MatchOutcome<'a> {
    pub fn matched(&self) -> Option<&AddressMatch<'a>> {
        match self {
            Self::Matched(m) => Some(m),
            Self::Unmatched(_) => None,
        }
    }

    pub fn failure(&self) -> Option<MatchFailure> {
        match self {
            Self::Matched(_) => None,
            Self::Unmatched(failure) => Some(*failure),
        }
    }
}

/// The winning registry row and the address field that produced the score.
#[derive(Debug, Clone)]
pub struct AddressMatch<'a> {
    pub row: Row<'a>,
    pub field: &'a str,
    /// Raw (un-normalized) address text of the winning field.
    pub address: Cow<'a, str>,
    pub score: f64,
    /// Establishment unit number of the winning row, if the cell is filled.
    pub unit: Option<Cow<'a, str>>,
}

/// Why a source row produced no match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFailure {
    /// The source row has no usable enterprise number.
    MissingIdentifier,
    /// No registry row shares the enterprise number.
    NoCandidates,
    /// Candidates existed but none could be scored (no address fields configured).
    NoMatchFound,
}

impl MatchFailure {
    pub const ALL: [MatchFailure; 3] = [
        Self::MissingIdentifier,
        Self::NoCandidates,
        Self::NoMatchFound,
    ];

    /// Human-readable reason for the results file.
    pub fn message(&self, identifier: Option<&str>) -> String {
        match self {
            Self::MissingIdentifier => "No enterprise number found in source row".into(),
            Self::NoCandidates => format!(
                "No KBO data found for enterprise number: {}",
                identifier.unwrap_or("")
            ),
            Self::NoMatchFound => "No matching address found".into(),
        }
    }
}

impl std::fmt::Display for MatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingIdentifier => write!(f, "missing_identifier"),
            Self::NoCandidates => write!(f, "no_candidates"),
            Self::NoMatchFound => write!(f, "no_match_found"),
        }
    }
}

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// Label of a successful match relative to the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Low,
}

impl Confidence {
    pub fn for_score(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Low => write!(f, "low"),
        }
    }
}

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

/// One line of the results file, owned and detached from the datasets.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub source_row_index: usize,
    pub enterprise_number: Option<String>,
    pub source_address: Option<String>,
    pub best_match_address: Option<String>,
    pub best_match_address_column: Option<String>,
    pub dice_score: f64,
    pub establishment_unit_number: Option<String>,
    pub success: bool,
    pub confidence: Option<Confidence>,
    pub error_kind: Option<MatchFailure>,
    pub error: Option<String>,
    /// Copied source columns, in source column order.
    #[serde(serialize_with = "serialize_fields")]
    pub source_fields: Vec<(String, Value)>,
}

impl ResultRow {
    /// Flatten an outcome into an output row.
    pub fn from_outcome(
        source: Row<'_>,
        identifier: Option<String>,
        source_address: Option<String>,
        outcome: &MatchOutcome<'_>,
        source_fields: Vec<(String, Value)>,
        threshold: f64,
    ) -> Self {
        let mut row = ResultRow {
            source_row_index: source.index(),
            enterprise_number: identifier,
            source_address,
            best_match_address: None,
            best_match_address_column: None,
            dice_score: 0.0,
            establishment_unit_number: None,
            success: false,
            confidence: None,
            error_kind: None,
            error: None,
            source_fields,
        };

        match outcome {
            MatchOutcome::Matched(m) => {
                row.best_match_address = Some(m.address.to_string());
                row.best_match_address_column = Some(m.field.to_string());
                row.dice_score = m.score;
                row.establishment_unit_number = m.unit.as_ref().map(|u| u.to_string());
                row.success = true;
                row.confidence = Some(Confidence::for_score(m.score, threshold));
            }
            MatchOutcome::Unmatched(failure) => {
                row.error = Some(failure.message(row.enterprise_number.as_deref()));
                row.error_kind = Some(*failure);
            }
        }

        row
    }
}

fn serialize_fields<S: Serializer>(fields: &[(String, Value)], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(fields.iter().map(|(k, v)| (k, v)))
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub meta: ReportMeta,
    pub summary: MatchSummary,
    pub rows: Vec<ResultRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub threshold: f64,
    pub source_rows: usize,
    pub registry_rows: usize,
    pub registry_identifiers: usize,
    /// Source columns copied into every result row, in output order.
    pub copy_columns: Vec<String>,
}
