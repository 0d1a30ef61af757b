use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::NormalizeError;

pub const DEFAULT_URL: &str = "https://example.com";

/// Engine settings. Built-in defaults, then an optional TOML file, then
/// `LISTING_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Placeholder used when no URL candidate survives scoring.
    pub default_url: String,
    /// Inputs shorter than this (in chars) yield an empty record.
    pub min_text_chars: usize,
    /// Appended to the built-in navigation blocklist.
    pub extra_noise_keywords: Vec<String>,
    /// Currency assumed for a bare `$` amount.
    pub default_currency: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        NormalizerConfig {
            default_url: DEFAULT_URL.to_string(),
            min_text_chars: 50,
            extra_noise_keywords: Vec::new(),
            default_currency: "USD".to_string(),
        }
    }
}

impl NormalizerConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, NormalizeError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix("LISTING")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("extra_noise_keywords"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = NormalizerConfig::default();
        assert_eq!(cfg.default_url, "https://example.com");
        assert_eq!(cfg.min_text_chars, 50);
        assert!(cfg.extra_noise_keywords.is_empty());
    }

    #[test]
    fn load_from_file_overrides_defaults() {
        let dir = std::env::temp_dir().join("listing_normalizer_cfg_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("normalizer.toml");
        std::fs::write(
            &path,
            "default_url = \"https://listings.test\"\nextra_noise_keywords = [\"Cookie Policy\"]\n",
        )
        .unwrap();
        let cfg = NormalizerConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.default_url, "https://listings.test");
        assert_eq!(cfg.extra_noise_keywords, vec!["Cookie Policy".to_string()]);
        assert_eq!(cfg.min_text_chars, 50);
    }
}
