//! `cssmerge` command-line front end.

mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cssmerge::config::CompilerConfig;
use cssmerge::{Compiler, Error};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CompilerConfig::from_file(path)?,
        None => CompilerConfig::default(),
    };
    let compiler = Compiler::new(cli.apply(config));

    let compilation = compiler
        .compile_file(&cli.input)
        .with_context(|| format!("Failed to compile '{}'", cli.input.display()))?;

    let output = compilation.output();
    match &cli.output {
        Some(path) => std::fs::write(path, &output)
            .with_context(|| format!("Failed to write '{}'", path.display()))?,
        None => print!("{output}"),
    }

    let report = compilation.size_report();
    tracing::info!("Uncompressed size: {}", report.original);
    tracing::info!("Compressed size: {}", report.compressed);
    tracing::info!("Total compressed: -{:.1}%", report.saved_percent());
    tracing::info!("Total merged: {}", compilation.stats.total_merged);

    if !compilation.is_consistent() {
        tracing::warn!(
            "{} integrity violations found",
            compilation.integrity_errors.len()
        );
    }
    Ok(())
}

fn report(err: &anyhow::Error) {
    let scan = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .and_then(Error::as_scan);

    match scan {
        Some(scan) => {
            tracing::error!("{}:", scan.reason());
            for line in scan.excerpt.lines() {
                tracing::error!("  {line}");
            }
        }
        None => tracing::error!("{err:#}"),
    }
}
