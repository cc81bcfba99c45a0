use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_THEME: &str = "awesomish";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_CHROMIUM_PATH: &str = "/usr/bin/chromium";

/// Application configuration loaded from environment variables.
/// Nothing is required; CLI flags take precedence over every value here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub theme: String,
    pub data_dir: PathBuf,
    pub resume_cli: Option<String>,
    pub cover_letter_cli: Option<String>,
    pub chromium_path: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests need not touch
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = PathBuf::from(
            non_empty("SYSTEMATIC_CV_DATA").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );
        let rust_log = non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string());
        EnvFilter::try_new(&rust_log)
            .with_context(|| format!("RUST_LOG '{rust_log}' is not a valid log filter"))?;

        Ok(Config {
            theme: non_empty("SYSTEMATIC_CV_THEME").unwrap_or_else(|| DEFAULT_THEME.to_string()),
            data_dir,
            resume_cli: non_empty("RESUME_CLI"),
            cover_letter_cli: non_empty("COVER_LETTER_CLI"),
            chromium_path: non_empty("PUPPETEER_EXECUTABLE_PATH")
                .unwrap_or_else(|| DEFAULT_CHROMIUM_PATH.to_string()),
            rust_log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.theme, "awesomish");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.chromium_path, "/usr/bin/chromium");
        assert_eq!(config.rust_log, "info");
        assert!(config.resume_cli.is_none());
        assert!(config.cover_letter_cli.is_none());
    }

    #[test]
    fn test_values_from_environment() {
        let config = config(&[
            ("SYSTEMATIC_CV_THEME", "elegant"),
            ("SYSTEMATIC_CV_DATA", "/srv/cv"),
            ("RESUME_CLI", "resume"),
            ("PUPPETEER_EXECUTABLE_PATH", "/opt/chrome"),
        ]);
        assert_eq!(config.theme, "elegant");
        assert_eq!(config.data_dir, PathBuf::from("/srv/cv"));
        assert_eq!(config.resume_cli.as_deref(), Some("resume"));
        assert_eq!(config.chromium_path, "/opt/chrome");
    }

    #[test]
    fn test_invalid_log_filter_rejected() {
        let result =
            Config::from_lookup(|key| (key == "RUST_LOG").then(|| "systematic_cv=loud".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = config(&[("RESUME_CLI", "  "), ("SYSTEMATIC_CV_THEME", "")]);
        assert!(config.resume_cli.is_none());
        assert_eq!(config.theme, "awesomish");
    }
}
