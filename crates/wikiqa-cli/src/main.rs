//! WikiQA CLI - Command-line interface
//!
//! Answers questions from Wikipedia with an extractive question-answering model.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod output;
mod output_types;
mod progress;

use clap::Parser;
use cli::Cli;
use output::OutputWriter;
use wikiqa_core::WikiqaError;

/// Exit status when the pipeline ran but Wikipedia had nothing to answer from
const EXIT_NO_RESULT: i32 = 3;

fn main() {
    // Logs go to stderr so answers on stdout stay pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    if let Err(error) = commands::execute(cli) {
        let code = exit_code(&error);
        OutputWriter::new(json).failure(&errors::from_anyhow(error));
        std::process::exit(code);
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<WikiqaError>() {
        Some(e) if e.is_no_result() => EXIT_NO_RESULT,
        _ => 1,
    }
}
