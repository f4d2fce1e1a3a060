//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use wikiqa_core::config::{CliConfigOverrides, LayeredConfig};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "wikiqa.toml";

/// Resolve which config file to read, if any
///
/// An explicit path must exist; the implicit `./wikiqa.toml` is optional.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
            implicit.is_file().then_some(implicit)
        }
    }
}

/// Load layered configuration: defaults, file, environment, then CLI
pub fn load_config(
    explicit: Option<&Path>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path(explicit) {
        tracing::debug!(path = %path.display(), "Loading configuration file");
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wikiqa_core::config::ConfigSource;

    #[test]
    fn test_explicit_path_is_used_verbatim() {
        let path = Path::new("/nonexistent/wikiqa.toml");
        assert_eq!(config_path(Some(path)), Some(path.to_path_buf()));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = load_config(
            Some(Path::new("/nonexistent/wikiqa.toml")),
            CliConfigOverrides::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "model = \"huggingface:deepset/roberta-base-squad2\"").unwrap();
        writeln!(file, "timeout_secs = 5").unwrap();

        let overrides = CliConfigOverrides {
            timeout_secs: Some(30),
            ..Default::default()
        };
        let config = load_config(Some(file.path()), overrides).unwrap();

        assert_eq!(config.timeout_secs.value, Some(30));
        assert_eq!(config.timeout_secs.source, ConfigSource::Cli);
        if std::env::var("WIKIQA_MODEL").is_err() {
            assert_eq!(config.model.value, "huggingface:deepset/roberta-base-squad2");
            assert_eq!(config.model.source, ConfigSource::File);
        }
    }

    #[test]
    fn test_invalid_cli_override_is_rejected() {
        let overrides = CliConfigOverrides {
            model: Some("openai:gpt-4".to_string()),
            ..Default::default()
        };
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "language = \"en\"").unwrap();
        assert!(load_config(Some(file.path()), overrides).is_err());
    }
}
