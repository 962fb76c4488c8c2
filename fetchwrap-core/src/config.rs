use crate::error::{FetchError, Result};
use crate::token::ACCESS_TOKEN_KEY;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// What to send as `Authorization` when the store has no token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingToken {
    /// Send no `Authorization` header.
    #[default]
    Omit,
    /// Send the literal `Bearer undefined`, matching older web clients.
    Undefined,
}

impl FromStr for MissingToken {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "omit" => Ok(MissingToken::Omit),
            "undefined" => Ok(MissingToken::Undefined),
            other => Err(FetchError::Config(format!(
                "unknown missing-token policy: {other} (expected omit or undefined)"
            ))),
        }
    }
}

/// Client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Token store key holding the bearer credential.
    pub token_key: String,
    pub missing_token: MissingToken,
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token_key: ACCESS_TOKEN_KEY.to_string(),
            missing_token: MissingToken::Omit,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `FETCHWRAP_TOKEN_KEY`, `FETCHWRAP_MISSING_TOKEN`
    /// and `FETCHWRAP_USER_AGENT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(key) = non_empty("FETCHWRAP_TOKEN_KEY") {
            config.token_key = key;
        }
        if let Some(policy) = non_empty("FETCHWRAP_MISSING_TOKEN") {
            config.missing_token = policy.parse()?;
        }
        config.user_agent = non_empty("FETCHWRAP_USER_AGENT");
        Ok(config)
    }

    pub fn with_missing_token(mut self, policy: MissingToken) -> Self {
        self.missing_token = policy;
        self
    }

    pub fn with_token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = key.into();
        self
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.token_key, "access_token");
        assert_eq!(config.missing_token, MissingToken::Omit);
    }

    #[test]
    fn env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("FETCHWRAP_TOKEN_KEY", "jwt"),
            ("FETCHWRAP_MISSING_TOKEN", " Undefined "),
            ("FETCHWRAP_USER_AGENT", "fetchwrap-test"),
        ]))
        .unwrap();
        assert_eq!(config.token_key, "jwt");
        assert_eq!(config.missing_token, MissingToken::Undefined);
        assert_eq!(config.user_agent.as_deref(), Some("fetchwrap-test"));
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = ClientConfig::from_lookup(lookup(&[("FETCHWRAP_MISSING_TOKEN", "panic")]))
            .unwrap_err();
        assert!(matches!(err, FetchError::Config(_)));
    }
}
