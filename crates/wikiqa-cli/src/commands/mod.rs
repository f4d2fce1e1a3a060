//! Command implementations

mod ask;
mod config;
mod fetch;
mod search;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;
use wikiqa_core::config::LayeredConfig;
use wikiqa_model::{reader_from_config, QuestionAnswerer};
use wikiqa_retrieval::QaPipeline;
use wikiqa_wiki::WikimediaClient;

/// Pipeline wired to live Wikimedia and the configured reader
pub type LivePipeline = QaPipeline<WikimediaClient, WikimediaClient, Box<dyn QuestionAnswerer>>;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(cli.config.as_deref(), cli.overrides())?;

    match cli.command {
        Commands::Ask(args) => ask::execute(args, &config, &output, cli.explain),
        Commands::Search(args) => search::execute(args, &config, &output),
        Commands::Fetch(args) => fetch::execute(args, &config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}

/// Build the pipeline from resolved configuration
pub fn build_pipeline(config: &LayeredConfig) -> Result<LivePipeline> {
    let wiki = WikimediaClient::from_config(config)?;
    let reader = reader_from_config(config)?;
    Ok(QaPipeline::new(wiki.clone(), wiki, reader).with_language(config.language.value.clone()))
}
