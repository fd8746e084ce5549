//! App configuration - passed into the controller, never global
//!
//! Loaded from the environment (optionally seeded from a `.env` file):
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `BEECONNECT_PROJECT_ID` | `project_id` | `""` |
//! | `BEECONNECT_CHAIN` | `default_chain` | `eip155:1001` |
//! | `BEECONNECT_TEST_ACCOUNT` | `test_recipient` | `""` |

use crate::core::chain::{eip155, env, wallets};
use crate::provider::ClientConfig;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Opaque credential for the provider
    pub project_id: String,
    pub default_chain: String,
    /// Address used to populate sample transaction fields
    pub test_recipient: String,
    pub recommended_wallet_ids: Vec<String>,
    pub exclude_other_wallets: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            default_chain: eip155::DEFAULT_CHAIN.into(),
            test_recipient: String::new(),
            recommended_wallet_ids: vec![wallets::RECOMMENDED.into()],
            exclude_other_wallets: true,
        }
    }
}

impl AppConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self { project_id: project_id.into(), ..Default::default() }
    }
    pub fn with_chain(mut self, chain: impl Into<String>) -> Self { self.default_chain = chain.into(); self }
    pub fn with_test_recipient(mut self, address: impl Into<String>) -> Self { self.test_recipient = address.into(); self }
    pub fn with_recommended_wallets(mut self, ids: Vec<String>) -> Self { self.recommended_wallet_ids = ids; self }
    pub fn with_all_wallets(mut self) -> Self { self.exclude_other_wallets = false; self }

    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let config = Self {
            project_id: lookup(env::PROJECT_ID).unwrap_or_default(),
            default_chain: lookup(env::CHAIN).filter(|c| !c.trim().is_empty()).unwrap_or(defaults.default_chain),
            test_recipient: lookup(env::TEST_ACCOUNT).unwrap_or_default(),
            ..Self::default()
        };
        if config.project_id.is_empty() {
            tracing::warn!("{} is not set; provider initialization may be refused", env::PROJECT_ID);
        }
        config
    }

    /// Load `KEY=VALUE` lines from a dotenv file into the process environment.
    /// Variables already set win. A missing file loads nothing.
    pub fn load_dotenv(path: impl AsRef<Path>) -> Result<usize, ConfigError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(source) => return Err(ConfigError::Io { path: path.display().to_string(), source }),
        };
        let mut loaded = 0;
        for (key, value) in parse_dotenv(&contents) {
            if std::env::var(&key).is_err() {
                std::env::set_var(&key, value);
                loaded += 1;
            }
        }
        tracing::debug!(path = %path.display(), loaded, "dotenv loaded");
        Ok(loaded)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig { project_id: self.project_id.clone() }
    }
}

/// Parse dotenv contents. Blank lines, `#` comments and empty values are skipped.
pub fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().trim_matches('"').to_string()))
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parse_dotenv_skips_comments_and_strips_quotes() {
        let parsed = parse_dotenv("# comment\n\nBEECONNECT_PROJECT_ID=\"abc123\"\n EMPTY=\nBEECONNECT_TEST_ACCOUNT = 0xdead\nnot a pair\n");
        assert_eq!(
            parsed,
            vec![
                ("BEECONNECT_PROJECT_ID".to_string(), "abc123".to_string()),
                ("BEECONNECT_TEST_ACCOUNT".to_string(), "0xdead".to_string()),
            ]
        );
    }

    #[test]
    fn lookup_fills_fields_and_keeps_defaults() {
        let vars: HashMap<&str, &str> = [(env::PROJECT_ID, "pid"), (env::TEST_ACCOUNT, "0xbeef")].into_iter().collect();
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.project_id, "pid");
        assert_eq!(config.test_recipient, "0xbeef");
        assert_eq!(config.default_chain, "eip155:1001");
        assert!(config.exclude_other_wallets);
        assert_eq!(config.client_config().project_id, "pid");
    }

    #[test]
    fn blank_chain_falls_back_to_default() {
        let config = AppConfig::from_lookup(|k| (k == env::CHAIN).then(|| "  ".to_string()));
        assert_eq!(config.default_chain, eip155::DEFAULT_CHAIN);
        assert_eq!(config.project_id, "");
    }
}
