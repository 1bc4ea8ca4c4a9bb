// estab CLI - match source rows to KBO establishment units by address

mod exit_codes;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use env_logger::Env;

use exit_codes::{EXIT_ERROR, EXIT_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "estab")]
#[command(about = "Find the KBO establishment unit behind each address")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match every source row against the registry from a TOML config
    #[command(after_help = "\
Examples:
  estab run match.toml
  estab run match.toml --json > report.json
  estab run match.toml --output report.json --threads 4
  estab run match.toml --fail-on-unmatched")]
    Run {
        /// Path to the match config (.toml)
        config: PathBuf,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Also write the JSON report to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Worker threads (overrides [run] in the config)
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        threads: Option<u16>,

        /// Exit with code 5 when any source row is unmatched
        #[arg(long)]
        fail_on_unmatched: bool,
    },

    /// Check a config and the columns of both datasets without matching
    #[command(after_help = "\
Examples:
  estab validate match.toml")]
    Validate {
        /// Path to the match config (.toml)
        config: PathBuf,
    },

    /// Score two addresses against each other
    #[command(after_help = "\
Examples:
  estab score \"Rue de la Paix 123, 1000 Brussels\" \"Rue de la Paix 123, 1000 Bruxelles\"")]
    Score {
        a: String,
        b: String,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("GIT_COMMIT_HASH"),
        ")",
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            config,
            json,
            output,
            threads,
            fail_on_unmatched,
        } => run::cmd_run(run::RunArgs {
            config,
            json,
            output,
            threads: threads.map(usize::from),
            fail_on_unmatched,
        }),
        Commands::Validate { config } => run::cmd_validate(config),
        Commands::Score { a, b } => cmd_score(&a, &b),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn cmd_score(a: &str, b: &str) -> Result<(), CliError> {
    let (norm_a, norm_b) = (estab_matcher::normalize(Some(a)), estab_matcher::normalize(Some(b)));
    println!("a:     {norm_a:?}");
    println!("b:     {norm_b:?}");
    println!("score: {:.4}", estab_matcher::score(a, b));
    Ok(())
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, msg)
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
