//! Configuration schema (schemadoc.toml)

use serde::{Deserialize, Serialize};

/// What to do when a rule matches nothing
///
/// The rule set contains deliberately-overlapping defensive rules, so a
/// zero-match rule is often legitimate; it can also mean a rule has gone
/// stale against the current document shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoMatchPolicy {
    /// Proceed silently
    Ignore,

    /// Print each zero-match rule to stderr, then proceed
    Warn,

    /// Abort the run before writing anything
    Fail,
}

impl Default for NoMatchPolicy {
    fn default() -> Self {
        Self::Warn
    }
}

impl std::fmt::Display for NoMatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ignore => write!(f, "ignore"),
            Self::Warn => write!(f, "warn"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Zero-match rule policy
    #[serde(default)]
    pub no_match: NoMatchPolicy,

    /// Keep a `.bak` copy of the original document before overwriting
    #[serde(default)]
    pub backup: bool,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.no_match, NoMatchPolicy::Warn);
        assert!(!config.backup);
    }

    #[test]
    fn parse_policy_from_toml() {
        let config = Config::from_toml("no_match = \"fail\"\nbackup = true\n").unwrap();
        assert_eq!(config.no_match, NoMatchPolicy::Fail);
        assert!(config.backup);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::from_toml("no_match = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
