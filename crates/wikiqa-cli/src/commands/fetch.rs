use crate::cli::FetchArgs;
use crate::output::OutputWriter;
use crate::output_types::FetchOutput;
use crate::progress::{finish_error, finish_success, spinner_for};
use anyhow::{bail, Result};
use wikiqa_core::config::LayeredConfig;
use wikiqa_wiki::{PageFetcher, WikimediaClient};

pub fn execute(args: FetchArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let title = args.text();
    let title = title.trim();
    if title.is_empty() {
        bail!("Page title must not be empty");
    }

    let wiki = WikimediaClient::from_config(config)?;

    let spinner = spinner_for(output.is_json(), &format!("Fetching '{}'...", title));
    let page = wiki
        .get_page_content(title)
        .inspect_err(|_| finish_error(&spinner, "Fetch failed"))?;
    finish_success(&spinner, &format!("Fetched {} characters", page.char_count()));

    let char_count = page.char_count();
    let (text, truncated) = truncate_chars(&page.text, args.max_chars);

    let result = FetchOutput {
        title: page.title.clone(),
        page_id: page.page_id,
        char_count,
        truncated,
        text: text.to_string(),
    };

    if output.is_json() {
        return output.result(result);
    }

    output.section(&result.title);
    output.text(&result.text);
    if truncated {
        output.info(format!(
            "Showing {} of {} characters",
            result.text.chars().count(),
            char_count
        ));
    }

    Ok(())
}

/// Cut `text` to at most `max_chars` characters on a char boundary
fn truncate_chars(text: &str, max_chars: Option<usize>) -> (&str, bool) {
    match max_chars.and_then(|max| text.char_indices().nth(max)) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}
