use std::process::ExitCode;

use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;

use repofmt::adapters::{self, FormatContext};
use repofmt::cli;
use repofmt::ignore::IgnoreSet;
use repofmt::logging::{self, Verbosity};
use repofmt::orchestrator;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = cli::Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: cli::Args) -> Result<bool> {
    // The single place ambient process state is read; everything downstream
    // receives it as an explicit parameter.
    let start_dir = std::env::current_dir().context("cannot determine working directory")?;

    let ctx = FormatContext {
        ignore: IgnoreSet::load(&start_dir),
        start_dir,
        check: args.check,
    };

    let adapters = adapters::default_adapters();
    let reports = orchestrator::run_all(&adapters, &ctx).await;
    let failures = orchestrator::failure_lines(&reports);

    if failures.is_empty() {
        return Ok(true);
    }
    eprintln!("Formatting problems:");
    for line in &failures {
        eprintln!("  - {line}");
    }
    Ok(false)
}
