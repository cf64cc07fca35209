//! Configuration file handling for sourdough-cli

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

pub const DEFAULT_SERVER: &str = "http://localhost:3001/api";

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Default gateway base URL
    pub server: Option<String>,
    /// Default output format
    pub output: Option<OutputFormat>,
    /// Disable colored output
    pub no_color: Option<bool>,
    /// Default site origin for `sitemap`
    pub base_url: Option<String>,
}

impl Config {
    /// Load configuration from the default config file, if there is one
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// `~/.config/sourdough-cli/config.toml` on Linux
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("sourdough-cli");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(
        &self,
        server: Option<&str>,
        output: Option<OutputFormat>,
        no_color: bool,
    ) -> MergedConfig {
        MergedConfig {
            server: server
                .map(String::from)
                .or_else(|| self.server.clone())
                .unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            output: output.or(self.output).unwrap_or_default(),
            no_color: no_color || self.no_color.unwrap_or(false),
        }
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub server: String,
    pub output: OutputFormat,
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_args_win_over_file() {
        let config = Config {
            server: Some("http://gateway:3001/api".to_string()),
            output: Some(OutputFormat::Json),
            no_color: Some(true),
            base_url: None,
        };

        let merged = config.merge_with_args(Some("http://other/api"), None, false);
        assert_eq!(
            merged,
            MergedConfig {
                server: "http://other/api".to_string(),
                output: OutputFormat::Json,
                no_color: true,
            }
        );

        let merged = Config::default().merge_with_args(None, None, false);
        assert_eq!(merged.server, DEFAULT_SERVER);
        assert_eq!(merged.output, OutputFormat::Table);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "server = \"http://gateway:3001/api\"\noutput = \"json\"\nbase_url = \"https://bakery.example\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.as_deref(), Some("http://gateway:3001/api"));
        assert_eq!(config.output, Some(OutputFormat::Json));
        assert_eq!(config.base_url.as_deref(), Some("https://bakery.example"));

        std::fs::write(&path, "output = \"yaml\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
