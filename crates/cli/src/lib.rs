//! CLI for the mig3 regression service.
//!
//! Run after `py.test --json=.report.json` to validate the test outcome:
//! the report is converted, tagged with the HEAD commit and submitted to
//! mig3, and the exit code tells CI whether the run regressed.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod attempt;
pub mod exit_codes;
pub mod logging;

use attempt::{log_attempt, StepFailed};
use clap::builder::BoolishValueParser;
use clap::Parser;
use mig3_core::{
    convert, read_report, write_dry_run, GitRevisionSource, HttpClient, ReportSource,
    ReqwestClient, RevisionSource, SubmissionBuilder, Submitter, DEFAULT_REPORT,
};
use std::io::{self, IsTerminal, Write};
use std::panic::{self, AssertUnwindSafe};
use tracing::level_filters::LevelFilter;
use tracing::debug;

/// Validate test results with the mig3 service.
///
/// Every option can also be set through its `MIG3_*` environment variable
/// or a `.env` file.
#[derive(Parser, Debug)]
#[command(name = "mig3")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project ID (from mig3 service).
    #[arg(short, long, env = "MIG3_PROJECT")]
    pub project: String,

    /// Configuration ID (from mig3 service).
    #[arg(short, long, env = "MIG3_CONFIGURATION")]
    pub configuration: String,

    /// mig3 job submission endpoint.
    #[arg(long, env = "MIG3_ENDPOINT")]
    pub endpoint: String,

    /// mig3 builder authorization token.
    #[arg(long, env = "MIG3_TOKEN", hide_env_values = true)]
    pub token: String,

    /// pytest-json report filename, or `-` for stdin.
    #[arg(long, env = "MIG3_REPORT", default_value = DEFAULT_REPORT)]
    pub report: ReportSource,

    /// Show the submission on stdout instead of sending it.
    #[arg(short = 'n', long, env = "MIG3_DRY_RUN", value_parser = BoolishValueParser::new())]
    pub dry_run: bool,

    /// Diagnostic log level, overridden by RUST_LOG.
    #[arg(long, env = "MIG3_LOG_LEVEL", default_value = "warn")]
    pub log_level: LevelFilter,
}

/// Parse the command line, run the pipeline and return the exit code.
pub fn run() -> i32 {
    if let Err(code) = load_dotenv(dotenvy::dotenv().map(|_| ())) {
        return code;
    }
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                exit_codes::USAGE
            } else {
                exit_codes::SUCCESS
            };
        }
    };
    if let Some(colorize) = attempt::progress_color(color_env_set(), io::stderr().is_terminal()) {
        colored::control::set_override(colorize);
    }

    if let Err(e) = logging::init_logging(cli.log_level) {
        eprintln!("Error: {:#}", e);
        return exit_codes::FAILURE;
    }

    let http = match ReqwestClient::new() {
        Ok(http) => http,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::FAILURE;
        }
    };
    let revisions = GitRevisionSource::new(".");

    execute(
        &cli,
        &revisions,
        &http,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
}

/// Report a `.env` that exists but cannot be loaded.
///
/// Its variables would otherwise be dropped silently and clap would blame a
/// missing flag instead.
fn load_dotenv(result: Result<(), dotenvy::Error>) -> Result<(), i32> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => {
            eprintln!("Error: failed to load .env: {}", e);
            Err(exit_codes::FAILURE)
        }
    }
}

/// Whether the user picked a colour mode through the environment.
fn color_env_set() -> bool {
    std::env::var_os("NO_COLOR").is_some() || std::env::var_os("CLICOLOR_FORCE").is_some()
}

/// Run the pipeline for parsed arguments against the given collaborators.
///
/// Progress goes to `stderr`; the dry-run document goes to `stdout`. A step
/// that panics still gets its FAIL marker and maps to the generic failure
/// code.
pub fn execute(
    cli: &Cli,
    revisions: &dyn RevisionSource,
    http: &dyn HttpClient,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> i32 {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pipeline(cli, revisions, http, stdout, stderr)
    }));

    match outcome {
        Ok(Ok(())) => exit_codes::SUCCESS,
        Ok(Err(failed)) => {
            debug!(kind = failed.error.kind(), code = failed.exit_code, "Run failed");
            failed.exit_code
        }
        Err(_) => {
            debug!(code = exit_codes::FAILURE, "Run panicked");
            exit_codes::FAILURE
        }
    }
}

fn pipeline(
    cli: &Cli,
    revisions: &dyn RevisionSource,
    http: &dyn HttpClient,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<(), StepFailed> {
    debug!(report = %cli.report, dry_run = cli.dry_run, "Starting run");

    let report = log_attempt(stderr, "Reading report", || read_report(&cli.report))?;

    let tests = log_attempt(stderr, "Converting test data", || convert(&report))?;

    let submission = log_attempt(stderr, "Building submission", || {
        SubmissionBuilder::new(&cli.project, &cli.configuration, &tests).build(revisions)
    })?;

    if cli.dry_run {
        if let Err(e) = write_dry_run(&submission, stdout) {
            let _ = writeln!(stderr, "Error: {}", e);
            return Err(e.into());
        }
    } else {
        log_attempt(stderr, "Sending submission", || {
            Submitter::new(&cli.endpoint, &cli.token).submit(http, &submission)
        })?;
    }

    Ok(())
}
