//! `estab run` and `estab validate`: config-driven establishment matching.

use std::path::{Path, PathBuf};

use estab_io::{json, load_dataset, TableError};
use estab_matcher::engine::validate_columns;
use estab_matcher::index::RegistryIndex;
use estab_matcher::{Dataset, MatchConfig, MatchError, MatchReport};
use log::info;

use crate::exit_codes::{match_exit_code, EXIT_UNMATCHED};
use crate::CliError;

pub struct RunArgs {
    pub config: PathBuf,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub threads: Option<usize>,
    pub fail_on_unmatched: bool,
}

fn match_err(err: MatchError) -> CliError {
    let cli_err = CliError::new(match_exit_code(&err), err.to_string());
    match err {
        MatchError::MissingColumn { available, .. } => {
            cli_err.with_hint(format!("available columns: {}", available.join(", ")))
        }
        _ => cli_err,
    }
}

fn table_err(err: TableError) -> CliError {
    CliError::runtime(err.to_string())
}

/// Read, parse and validate the config. Relative paths inside it resolve
/// against the returned base directory.
fn load_config(config_path: &Path) -> Result<(MatchConfig, PathBuf), CliError> {
    if !config_path.is_file() {
        return Err(CliError::usage(format!(
            "config file not found: {}",
            config_path.display()
        )));
    }
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| CliError::runtime(format!("cannot read config: {e}")))?;
    let config = MatchConfig::from_toml(&config_str).map_err(match_err)?;

    let base_dir = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok((config, base_dir))
}

fn load_datasets(config: &MatchConfig, base_dir: &Path) -> Result<(Dataset, Dataset), CliError> {
    let source = load_dataset(
        &base_dir.join(&config.source.file),
        "source",
        config.source_delimiter(),
        config.source.sheet.as_deref(),
    )
    .map_err(table_err)?;
    let registry = load_dataset(
        &base_dir.join(&config.registry.file),
        "KBO",
        config.registry_delimiter(),
        config.registry.sheet.as_deref(),
    )
    .map_err(table_err)?;
    Ok((source, registry))
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let (mut config, base_dir) = load_config(&args.config)?;
    if let Some(threads) = args.threads {
        config.run.parallel = true;
        config.run.threads = Some(threads);
    }

    let (source, registry) = load_datasets(&config, &base_dir)?;
    let report = estab_matcher::run(&config, &source, &registry).map_err(match_err)?;

    write_outputs(&config, &base_dir, &report, &source)?;

    if args.json || args.output.is_some() {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        if let Some(ref path) = args.output {
            std::fs::write(path, format!("{json_str}\n"))
                .map_err(|e| CliError::runtime(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if args.json {
            println!("{json_str}");
        }
    }

    print_summary(&report);

    let unmatched = report.summary.unmatched();
    if args.fail_on_unmatched && unmatched > 0 {
        return Err(CliError::new(
            EXIT_UNMATCHED,
            format!("{unmatched} source row(s) without an establishment unit"),
        ));
    }
    Ok(())
}

/// Write every output file the config names.
fn write_outputs(
    config: &MatchConfig,
    base_dir: &Path,
    report: &MatchReport,
    source: &Dataset,
) -> Result<(), CliError> {
    let output = &config.output;
    if output.csv.is_none() && output.xlsx.is_none() && output.json.is_none() {
        info!("no output files configured");
    }

    if let Some(ref file) = output.csv {
        let path = base_dir.join(file);
        estab_io::csv::write_results_csv(&path, report, config.output_delimiter())
            .map_err(table_err)?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(ref file) = output.xlsx {
        let path = base_dir.join(file);
        estab_io::xlsx::write_results_xlsx(&path, report, source, output.source_sample_rows)
            .map_err(table_err)?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(ref file) = output.json {
        let path = base_dir.join(file);
        json::write_report_json(&path, report).map_err(table_err)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

/// Human summary to stderr.
fn print_summary(report: &MatchReport) {
    let s = &report.summary;
    eprintln!(
        "'{}': {} of {} rows matched ({:.1}%), {} high confidence (score >= {})",
        report.meta.config_name,
        s.successful_matches,
        s.total_rows,
        s.success_rate,
        s.high_confidence_matches,
        s.threshold,
    );
    if let Some(avg) = s.average_score {
        eprintln!("average score: {avg:.3}");
    }

    let failures: Vec<String> = s
        .failure_counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(kind, count)| format!("{count} {kind}"))
        .collect();
    if !failures.is_empty() {
        eprintln!("unmatched: {}", failures.join(", "));
    }

    for band in s.score_bands.iter().filter(|b| b.count > 0) {
        eprintln!("  {:<22} {}", band.band.label(), band.count);
    }
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let (config, base_dir) = load_config(&config_path)?;
    let (source, registry) = load_datasets(&config, &base_dir)?;
    validate_columns(&config, &source, &registry).map_err(match_err)?;

    let index = RegistryIndex::build(&registry, &config.registry.identifier);
    eprintln!(
        "valid: '{}' with {} source row(s), {} registry row(s) ({} enterprise number(s)), {} address column(s)",
        config.name,
        source.len(),
        registry.len(),
        index.len(),
        config.registry.addresses.len(),
    );
    Ok(())
}
