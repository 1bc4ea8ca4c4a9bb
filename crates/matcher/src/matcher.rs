use std::borrow::Cow;

use crate::dataset::Row;
use crate::model::{AddressMatch, MatchFailure, MatchOutcome};
use crate::similarity::BigramSet;

/// One `(row, address field, raw address)` tuple offered to the selector.
#[derive(Debug, Clone)]
pub struct Candidate<'a, R> {
    pub row: R,
    pub field: &'a str,
    pub text: Cow<'a, str>,
}

/// Best-scoring candidate.
#[derive(Debug, Clone)]
pub struct BestMatch<'a, R> {
    pub row: R,
    pub field: &'a str,
    pub text: Cow<'a, str>,
    pub score: f64,
}

/// Column names the row matcher reads.
#[derive(Debug, Clone)]
pub struct MatchFields {
    /// Address column of the source dataset.
    pub source_address: String,
    /// Registry address columns, in priority order.
    pub registry_addresses: Vec<String>,
    /// Registry column holding the establishment unit number.
    pub registry_unit: String,
}

/// Score every candidate against `source_address` and keep the best.
///
/// Candidates are scanned in order and only a strictly greater score
/// replaces the current best, so on ties the first candidate wins. The
/// first candidate always seeds the result: a non-empty input never
/// yields `None`, even when every score is 0.0.
pub fn select_best<'a, R, I>(source_address: &str, candidates: I) -> Option<BestMatch<'a, R>>
where
    I: IntoIterator<Item = Candidate<'a, R>>,
{
    let source = BigramSet::of(source_address);
    let mut best: Option<BestMatch<'a, R>> = None;

    for candidate in candidates {
        let score = source.dice(&BigramSet::of(&candidate.text));
        let improves = match &best {
            None => true,
            Some(current) => score > current.score,
        };
        if improves {
            best = Some(BestMatch {
                row: candidate.row,
                field: candidate.field,
                text: candidate.text,
                score,
            });
        }
    }

    best
}

/// Pick the registry row whose address best matches the source row's.
///
/// `candidates` must already be restricted to the source row's enterprise
/// number, in registry order. Each row offers every configured address
/// field (row order outer, field order inner); a field the row lacks
/// counts as an empty address.
pub fn match_row<'a>(
    source: Row<'_>,
    candidates: &[Row<'a>],
    fields: &'a MatchFields,
) -> MatchOutcome<'a> {
    let source_address = source.text(&fields.source_address).unwrap_or_default();

    if candidates.is_empty() {
        return MatchOutcome::Unmatched(MatchFailure::NoCandidates);
    }

    let offered = candidates.iter().flat_map(|row| {
        fields.registry_addresses.iter().map(move |field| Candidate {
            row: *row,
            field: field.as_str(),
            text: row.text(field).unwrap_or_default(),
        })
    });

    match select_best(&source_address, offered) {
        Some(best) => {
            log::debug!(
                "source row {}: registry row {} via '{}' scored {:.3}",
                source.index(),
                best.row.index(),
                best.field,
                best.score
            );
            MatchOutcome::Matched(AddressMatch {
                unit: best.row.text(&fields.registry_unit),
                row: best.row,
                field: best.field,
                address: best.text,
                score: best.score,
            })
        }
        None => MatchOutcome::Unmatched(MatchFailure::NoMatchFound),
    }
}
