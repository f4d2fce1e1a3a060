use crate::cli::SearchArgs;
use crate::commands::build_pipeline;
use crate::output::OutputWriter;
use crate::output_types::SearchOutput;
use crate::progress::{finish_error, finish_success, spinner_for};
use anyhow::Result;
use wikiqa_core::config::LayeredConfig;
use wikiqa_retrieval::SourceReference;

pub fn execute(args: SearchArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let query = args.text();
    let pipeline = build_pipeline(config)?;

    let spinner = spinner_for(output.is_json(), "Searching Wikipedia...");
    let hit = pipeline.top_result(&query).inspect_err(|_| finish_error(&spinner, "Search failed"))?;
    finish_success(&spinner, "Found a page");

    let result = SearchOutput {
        query: query.trim().to_string(),
        result: SourceReference::from_search_result(&hit, &config.language.value),
    };

    if output.is_json() {
        return output.result(result);
    }

    output.section("Top Result");
    output.kv("Title", &result.result.title);
    output.kv("Key", &result.result.key);
    output.kv(
        "Description",
        result.result.description.as_deref().unwrap_or("(none)"),
    );
    output.kv("URL", &result.result.url);

    Ok(())
}
