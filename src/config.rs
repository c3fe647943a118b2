//! Client configuration.
//!
//! A [`Config`] is created once at start-up and then shared read-only (as an
//! `Arc<Config>`) by every [`Client`](crate::Client) built during the
//! session.  Nothing in the library mutates it after construction.
//!
//! The viewer binary reads an optional TOML file into a `Config` and then
//! overlays command-line flags on top; the library itself never touches the
//! filesystem or the environment.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Feed root used when nothing else is configured.
pub const DEFAULT_ROOT: &str = "http://www.abc.net.au/news/feed";

/// `User-Agent` sent when nothing else is configured.
pub const DEFAULT_AGENT: &str = "ABCNews-Ubuntu-Scope";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Where to fetch feeds from and how to identify ourselves.
///
/// All fields use `#[serde(default)]`, so a config file may set any subset
/// of keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL every request target is built from
    /// (e.g. `http://www.abc.net.au/news/feed`).
    pub root: String,

    /// Value of the outbound `User-Agent` header.
    pub agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            agent: DEFAULT_AGENT.to_string(),
        }
    }
}

impl Config {
    pub fn new(root: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            agent: agent.into(),
        }
    }

    /// Parse a config from TOML text.  Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_abc_feed() {
        let config = Config::default();
        assert_eq!(config.root, "http://www.abc.net.au/news/feed");
        assert_eq!(config.agent, "ABCNews-Ubuntu-Scope");
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let config = Config::from_toml_str(r#"agent = "test-agent/1.0""#).unwrap();
        assert_eq!(config.root, DEFAULT_ROOT);
        assert_eq!(config.agent, "test-agent/1.0");
    }

    #[test]
    fn empty_toml_yields_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::from_toml_str("root = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
