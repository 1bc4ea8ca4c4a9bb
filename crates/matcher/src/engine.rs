use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::MatchConfig;
use crate::dataset::{Dataset, Row, Value};
use crate::error::MatchError;
use crate::index::{extract_identifier, RegistryIndex};
use crate::matcher::{match_row, MatchFields};
use crate::model::{MatchFailure, MatchOutcome, MatchReport, ReportMeta, ResultRow};
use crate::summary::compute_summary;

/// Check that every configured column exists in its dataset.
pub fn validate_columns(
    config: &MatchConfig,
    source: &Dataset,
    registry: &Dataset,
) -> Result<(), MatchError> {
    let require = |dataset: &Dataset, column: &str| -> Result<(), MatchError> {
        if dataset.has_column(column) {
            Ok(())
        } else {
            Err(MatchError::MissingColumn {
                dataset: dataset.name.clone(),
                column: column.into(),
                available: dataset.columns.clone(),
            })
        }
    };

    require(source, &config.source.identifier)?;
    require(source, &config.source.address)?;
    if let Some(ref columns) = config.source.copy_columns {
        for column in columns {
            require(source, column)?;
        }
    }

    require(registry, &config.registry.identifier)?;
    require(registry, &config.registry.unit)?;
    for column in &config.registry.addresses {
        require(registry, column)?;
    }

    Ok(())
}

/// Match one source row: extract its enterprise number, look up the
/// registry rows sharing it, and pick the best address among them.
///
/// Returns the extracted identifier alongside the outcome.
pub fn match_source_row<'a>(
    source: Row<'_>,
    identifier_field: &str,
    registry: &'a Dataset,
    index: &RegistryIndex,
    fields: &'a MatchFields,
) -> (Option<String>, MatchOutcome<'a>) {
    let Some(identifier) = extract_identifier(source, identifier_field) else {
        debug!("source row {}: no enterprise number", source.index());
        return (None, MatchOutcome::Unmatched(MatchFailure::MissingIdentifier));
    };

    let candidates = index.candidates(registry, &identifier);
    if candidates.is_empty() {
        debug!("source row {}: no registry rows for {identifier}", source.index());
    }

    let outcome = match_row(source, &candidates, fields);
    (Some(identifier), outcome)
}

/// Run the matcher over every source row. Returns one result row per
/// source row, in source order, plus summary statistics.
///
/// Row data never makes this fail; only configuration and missing
/// columns do.
pub fn run(
    config: &MatchConfig,
    source: &Dataset,
    registry: &Dataset,
) -> Result<MatchReport, MatchError> {
    validate_columns(config, source, registry)?;

    let fields = config.match_fields();
    let index = RegistryIndex::build(registry, &config.registry.identifier);
    if index.is_empty() {
        warn!("{} data has no enterprise numbers; every row will be unmatched", registry.name);
    }

    let threshold = config.scoring.min_score;
    let copy_columns = copy_columns(config, source);

    let process = |row: Row<'_>| -> ResultRow {
        let (identifier, outcome) =
            match_source_row(row, &config.source.identifier, registry, &index, &fields);
        let source_address = row.text(&config.source.address).map(|s| s.into_owned());
        let copied = copy_columns
            .iter()
            .map(|column| {
                let value = row.get(column).cloned().unwrap_or(Value::Empty);
                (column.to_string(), value)
            })
            .collect();
        ResultRow::from_outcome(row, identifier, source_address, &outcome, copied, threshold)
    };

    info!(
        "matching {} {} rows against {} {} rows",
        source.len(),
        source.name,
        registry.len(),
        registry.name
    );

    let rows: Vec<ResultRow> = if !config.run.parallel {
        source.iter().map(process).collect()
    } else if let Some(threads) = config.run.threads {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| MatchError::ThreadPool(e.to_string()))?;
        pool.install(|| source.par_iter().map(process).collect())
    } else {
        source.par_iter().map(process).collect()
    };

    let summary = compute_summary(&rows, threshold);
    info!(
        "matched {} of {} rows ({} high confidence)",
        summary.successful_matches, summary.total_rows, summary.high_confidence_matches
    );

    Ok(MatchReport {
        meta: ReportMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            threshold,
            source_rows: source.len(),
            registry_rows: registry.len(),
            registry_identifiers: index.len(),
            copy_columns: copy_columns.iter().map(|c| c.to_string()).collect(),
        },
        summary,
        rows,
    })
}

/// Source columns echoed into the output: the configured list, or all.
fn copy_columns<'a>(config: &'a MatchConfig, source: &'a Dataset) -> Vec<&'a str> {
    match config.source.copy_columns {
        Some(ref columns) => columns.iter().map(String::as_str).collect(),
        None => source.columns.iter().map(String::as_str).collect(),
    }
}
