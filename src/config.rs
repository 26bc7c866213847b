//! Environment-driven settings (a `.env` file is honoured by the binaries).
//!
//! - `FEEDBACK_API_URL`   backend base URL, default `http://localhost:8080/api`
//! - `FEEDBACK_API_TOKEN` optional bearer token, passed through untouched
//! - `LEXICON_PATH`       JSON lexicon; the bundled café lexicon otherwise
//! - `KEYWORDS_TOP_N`     entries kept per sentiment bucket, default 10
//! - `KEYWORDS_PERIOD`    `week`, `month` or `year`, default `week`

use std::path::PathBuf;

use crate::error::{ConfigError, LexiconError};
use crate::keywords::{Period, DEFAULT_TOP_N};
use crate::lexicon::Lexicon;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub lexicon_path: Option<PathBuf>,
    pub top_n: usize,
    pub period: Period,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            lexicon_path: None,
            top_n: DEFAULT_TOP_N,
            period: Period::Week,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let top_n = match get("KEYWORDS_TOP_N") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "KEYWORDS_TOP_N",
                value: raw.clone(),
            })?,
            None => defaults.top_n,
        };

        let period = match get("KEYWORDS_PERIOD") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "KEYWORDS_PERIOD",
                value: raw.clone(),
            })?,
            None => defaults.period,
        };

        Ok(Self {
            api_url: get("FEEDBACK_API_URL").unwrap_or(defaults.api_url),
            api_token: get("FEEDBACK_API_TOKEN"),
            lexicon_path: get("LEXICON_PATH").map(PathBuf::from),
            top_n,
            period,
        })
    }

    pub fn load_lexicon(&self) -> Result<Lexicon, LexiconError> {
        match &self.lexicon_path {
            Some(path) => Lexicon::from_path(path),
            None => Ok(Lexicon::bundled().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("FEEDBACK_API_URL", "https://cafe.example/api"),
            ("FEEDBACK_API_TOKEN", "abc.def"),
            ("KEYWORDS_TOP_N", "5"),
            ("KEYWORDS_PERIOD", "month"),
            ("LEXICON_PATH", "  "),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://cafe.example/api");
        assert_eq!(config.api_token.as_deref(), Some("abc.def"));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.period, Period::Month);
        assert_eq!(config.lexicon_path, None);
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[("KEYWORDS_TOP_N", "ten")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "KEYWORDS_TOP_N", .. }));

        let err = Config::from_lookup(lookup(&[("KEYWORDS_PERIOD", "day")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "KEYWORDS_PERIOD", .. }));
    }

    #[test]
    fn test_load_bundled_lexicon() {
        let lexicon = Config::default().load_lexicon().unwrap();
        assert!(lexicon.is_positive("délicieux"));
    }
}
