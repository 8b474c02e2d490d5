//! Dispatcher configuration.
//!
//! Loaded from the environment (`NETSERVICE_*` variables) or from a JSON
//! document; every field has a default so an empty source is valid.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::http::Headers;

const ENV_USER_AGENT: &str = "NETSERVICE_USER_AGENT";
const ENV_ACCEPT_LANGUAGE: &str = "NETSERVICE_ACCEPT_LANGUAGE";
const ENV_SECURE_ONLY: &str = "NETSERVICE_SECURE_ONLY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Sent as `User-Agent` unless the request sets one.
    pub user_agent: String,
    /// Sent as `Accept-Language` unless the request sets one.
    pub accept_language: String,
    /// Reject plain `http` URLs during validation.
    pub secure_only: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("netservice/{}", env!("CARGO_PKG_VERSION")),
            accept_language: "en-US".to_string(),
            secure_only: false,
        }
    }
}

impl DispatcherConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Headers merged into every request that goes through the default
    /// transport.
    pub fn default_headers(&self) -> Headers {
        [
            ("User-Agent", self.user_agent.as_str()),
            ("Accept-Language", self.accept_language.as_str()),
        ]
        .into_iter()
        .collect()
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(ua) = lookup(ENV_USER_AGENT) {
            config.user_agent = ua;
        }
        if let Some(lang) = lookup(ENV_ACCEPT_LANGUAGE) {
            config.accept_language = lang;
        }
        if let Some(raw) = lookup(ENV_SECURE_ONLY) {
            config.secure_only = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: ENV_SECURE_ONLY,
                        value: raw,
                    })
                }
            };
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = DispatcherConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DispatcherConfig::default());
        assert!(config.user_agent.starts_with("netservice/"));
        assert!(!config.secure_only);
    }

    #[test]
    fn env_overrides_defaults() {
        let config = DispatcherConfig::from_lookup(lookup(&[
            ("NETSERVICE_USER_AGENT", "tester/1.0"),
            ("NETSERVICE_ACCEPT_LANGUAGE", "ro-RO"),
            ("NETSERVICE_SECURE_ONLY", "TRUE"),
        ]))
        .unwrap();
        assert_eq!(config.user_agent, "tester/1.0");
        assert_eq!(config.accept_language, "ro-RO");
        assert!(config.secure_only);
    }

    #[test]
    fn bad_boolean_is_rejected() {
        let err = DispatcherConfig::from_lookup(lookup(&[("NETSERVICE_SECURE_ONLY", "maybe")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv { name: "NETSERVICE_SECURE_ONLY", .. }
        ));
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = DispatcherConfig::from_json(r#"{"secure_only":true}"#).unwrap();
        assert!(config.secure_only);
        assert_eq!(config.accept_language, "en-US");
    }

    #[test]
    fn json_parse_errors_surface() {
        assert!(matches!(
            DispatcherConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn default_headers_contain_agent_and_language() {
        let headers = DispatcherConfig::default().default_headers();
        assert_eq!(headers.len(), 2);
        assert!(headers.contains("user-agent"));
        assert_eq!(headers.get("Accept-Language"), Some("en-US"));
    }
}
