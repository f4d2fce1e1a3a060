use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wikiqa_core::config::CliConfigOverrides;

/// WikiQA - Answer questions from Wikipedia
#[derive(Parser, Debug)]
#[command(name = "wikiqa")]
#[command(about = "Answer questions from Wikipedia with an extractive QA model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Show the source page, score and span behind an answer
    #[arg(long, global = true)]
    pub explain: bool,

    /// Configuration file (defaults to ./wikiqa.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Wikipedia language edition (e.g., en, de, fr)
    #[arg(long, global = true)]
    pub language: Option<String>,

    /// User-Agent sent to Wikimedia
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Question-answering model (e.g., "huggingface:deepset/tinyroberta-squad2" or
    /// "local:deepset/bert-base-cased-squad2")
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration values given on the command line
    pub fn overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            language: self.language.clone(),
            user_agent: self.user_agent.clone(),
            model: self.model.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a question from the top Wikipedia page
    Ask(AskArgs),

    /// Show the top Wikipedia search result for a query
    Search(SearchArgs),

    /// Print the plain-text extract of a Wikipedia page
    Fetch(FetchArgs),

    /// Show the layered configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

impl AskArgs {
    pub fn text(&self) -> String {
        self.question.join(" ")
    }
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search terms
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl SearchArgs {
    pub fn text(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Exact page title
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,

    /// Truncate the printed extract to this many characters
    #[arg(long, value_name = "N")]
    pub max_chars: Option<usize>,
}

impl FetchArgs {
    pub fn text(&self) -> String {
        self.title.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_question_words_are_joined() {
        let cli =
            Cli::parse_from(["wikiqa", "ask", "What", "is", "the", "capital", "of", "France?"]);
        match cli.command {
            Commands::Ask(args) => assert_eq!(args.text(), "What is the capital of France?"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "wikiqa",
            "fetch",
            "Eiffel Tower",
            "--max-chars",
            "200",
            "--language",
            "fr",
            "--json",
        ]);
        assert!(cli.json);
        let overrides = cli.overrides();
        assert_eq!(overrides.language.as_deref(), Some("fr"));
        assert!(overrides.model.is_none());
        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.text(), "Eiffel Tower");
                assert_eq!(args.max_chars, Some(200));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_ask_requires_a_question() {
        assert!(Cli::try_parse_from(["wikiqa", "ask"]).is_err());
    }
}
