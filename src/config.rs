//! User configuration loaded from `config.toml`.

use crate::models::{SnippetLanguage, StorageManager};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// What to do when the clipboard cannot be reached at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardProbePolicy {
    /// Keep running with yank and paste disabled
    Degrade,
    /// Refuse to start
    Fatal,
}

impl Default for ClipboardProbePolicy {
    fn default() -> Self {
        ClipboardProbePolicy::Degrade
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_file: Option<PathBuf>,
    pub syntax_theme: String,
    pub default_language: String,
    pub clipboard_probe: ClipboardProbePolicy,
    pub highlight: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            syntax_theme: String::from("base16-mocha.dark"),
            default_language: String::from("text"),
            clipboard_probe: ClipboardProbePolicy::default(),
            highlight: true,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("snipbox").join("config.toml"))
    }

    /// Reads the config file. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn language(&self) -> SnippetLanguage {
        SnippetLanguage::from_tag(&self.default_language)
    }

    pub fn resolve_data_file(&self) -> Result<PathBuf> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => StorageManager::default_data_file()
                .context("Failed to determine the snippet file location"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.clipboard_probe, ClipboardProbePolicy::Degrade);
        assert_eq!(config.language(), SnippetLanguage::Text);
    }

    #[test]
    fn test_parse_overrides() {
        let config = Config::parse(
            r#"
            data_file = "/tmp/snips.json"
            default_language = "go"
            clipboard_probe = "fatal"
            highlight = false
            "#,
        )
        .unwrap();

        assert_eq!(config.data_file, Some(PathBuf::from("/tmp/snips.json")));
        assert_eq!(config.language(), SnippetLanguage::Go);
        assert_eq!(config.clipboard_probe, ClipboardProbePolicy::Fatal);
        assert!(!config.highlight);
        assert_eq!(config.syntax_theme, "base16-mocha.dark");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::parse("colour = \"red\"").is_err());
        assert!(Config::parse("clipboard_probe = \"sometimes\"").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_explicit_data_file_wins() {
        let config = Config {
            data_file: Some(PathBuf::from("here.json")),
            ..Config::default()
        };
        assert_eq!(config.resolve_data_file().unwrap(), PathBuf::from("here.json"));
    }
}
