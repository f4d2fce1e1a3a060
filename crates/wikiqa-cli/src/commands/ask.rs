use crate::cli::AskArgs;
use crate::commands::build_pipeline;
use crate::output::OutputWriter;
use crate::output_types::AskOutput;
use crate::progress::{finish_error, spinner_for};
use anyhow::Result;
use wikiqa_core::config::LayeredConfig;

pub fn execute(
    args: AskArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
    explain: bool,
) -> Result<()> {
    let question = args.text();
    let pipeline = build_pipeline(config)?;

    let spinner = spinner_for(output.is_json(), "Searching Wikipedia and reading the top page...");
    let report = match pipeline.ask(&question) {
        Ok(report) => {
            spinner.finish_and_clear();
            report
        }
        Err(e) => {
            finish_error(&spinner, "No answer");
            return Err(e.into());
        }
    };

    if report.answer.is_empty() {
        output.warning(format!("The model found no answer span in '{}'", report.source.title));
    }

    let result = AskOutput::from_report(report, explain);
    if output.is_json() {
        return output.result(result);
    }

    output.text(&result.answer);

    if let Some(explanation) = &result.explanation {
        output.section("Explanation");
        output.kv("Source", &explanation.source.title);
        output.kv("URL", &explanation.source.url);
        if let Some(description) = &explanation.source.description {
            output.kv("Description", description);
        }
        output.kv("Score", format!("{:.4}", explanation.score));
        output.kv(
            "Span",
            format!(
                "characters {}..{} of {}",
                explanation.start, explanation.end, explanation.context_chars
            ),
        );
        output.kv("Model", &result.model);
    }

    Ok(())
}
