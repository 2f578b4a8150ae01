//! Process configuration, read once from the environment (and `.env`) at startup.

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingVar(&'static str),
    #[error("{var} is not a valid {expected}: {value:?}")]
    InvalidVar {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Settings for the generation backend.
///
/// The credential is optional here: a missing key is reported by the client
/// when a stage tries to call out, so the bot stays up and the failure lands
/// in the investigation log instead of killing the process.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl GenerationConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let api_key = non_blank("GEMINI_API_KEY").or_else(|| non_blank("API_KEY"));
        let model = lookup("GEMINI_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = lookup("GEMINI_BASE_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            api_key,
            model,
            base_url,
        }
    }
}

/// Discord connection settings.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    /// Register commands in this guild only (instant) instead of globally.
    pub guild_id: Option<u64>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?;

        let guild_id = match lookup("DISCORD_GUILD_ID").filter(|s| !s.trim().is_empty()) {
            Some(raw) => {
                let parsed = raw.trim().parse::<u64>();
                Some(parsed.map_err(|_| ConfigError::InvalidVar {
                    var: "DISCORD_GUILD_ID",
                    expected: "guild id",
                    value: raw,
                })?)
            }
            None => None,
        };

        Ok(Self { token, guild_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_generation_defaults() {
        let config = GenerationConfig::from_lookup(env(&[]));
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_api_key_fallback_and_blank() {
        let config = GenerationConfig::from_lookup(env(&[("API_KEY", "k1")]));
        assert_eq!(config.api_key.as_deref(), Some("k1"));

        let config = GenerationConfig::from_lookup(env(&[("GEMINI_API_KEY", "k2"), ("API_KEY", "k1")]));
        assert_eq!(config.api_key.as_deref(), Some("k2"));

        let config = GenerationConfig::from_lookup(env(&[("GEMINI_API_KEY", "   ")]));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_blank_primary_key_falls_back() {
        let config = GenerationConfig::from_lookup(env(&[("GEMINI_API_KEY", ""), ("API_KEY", "k1")]));
        assert_eq!(config.api_key.as_deref(), Some("k1"));

        let config = GenerationConfig::from_lookup(env(&[("GEMINI_API_KEY", "  "), ("API_KEY", " k1 ")]));
        assert_eq!(config.api_key.as_deref(), Some("k1"));
    }

    #[test]
    fn test_bot_config_requires_token() {
        let err = BotConfig::from_lookup(env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DISCORD_TOKEN")));
    }

    #[test]
    fn test_bot_config_guild_id() {
        let config = BotConfig::from_lookup(env(&[("DISCORD_TOKEN", "t"), ("DISCORD_GUILD_ID", "42")])).unwrap();
        assert_eq!(config.guild_id, Some(42));

        let err = BotConfig::from_lookup(env(&[("DISCORD_TOKEN", "t"), ("DISCORD_GUILD_ID", "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { var: "DISCORD_GUILD_ID", .. }));
    }
}
