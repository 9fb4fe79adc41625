use std::fmt;

use teloxide::types::{ChatId, Recipient};
use thiserror::Error;

pub const TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing or empty {0} environment variable")]
    Missing(&'static str),
}

#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    /// Chat that every `/copy` is forwarded to.
    pub destination: Recipient,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("destination", &self.destination)
            .finish()
    }
}

impl Config {
    /// Load from `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let bot_token = required(TOKEN_VAR)?;
        let chat_id = required(CHAT_ID_VAR)?;

        Ok(Self {
            bot_token,
            destination: parse_recipient(&chat_id),
        })
    }
}

/// Numeric ids address any chat; anything else is taken as a public
/// channel username such as `@mychannel`.
fn parse_recipient(value: &str) -> Recipient {
    match value.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_loads_numeric_chat_id() {
        let config =
            Config::from_lookup(lookup(&[(TOKEN_VAR, "123:abc"), (CHAT_ID_VAR, "-100123")]))
                .unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.destination, Recipient::Id(ChatId(-100123)));
    }

    #[test]
    fn test_loads_channel_username() {
        let config =
            Config::from_lookup(lookup(&[(TOKEN_VAR, "123:abc"), (CHAT_ID_VAR, " @relay ")]))
                .unwrap();
        assert_eq!(
            config.destination,
            Recipient::ChannelUsername("@relay".to_string())
        );
    }

    #[test]
    fn test_missing_token_fails() {
        let err = Config::from_lookup(lookup(&[(CHAT_ID_VAR, "42")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(TOKEN_VAR));
    }

    #[test]
    fn test_missing_chat_id_fails() {
        let err = Config::from_lookup(lookup(&[(TOKEN_VAR, "123:abc")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(CHAT_ID_VAR));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let err = Config::from_lookup(lookup(&[(TOKEN_VAR, "   "), (CHAT_ID_VAR, "42")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing(TOKEN_VAR));

        let err =
            Config::from_lookup(lookup(&[(TOKEN_VAR, "123:abc"), (CHAT_ID_VAR, "")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(CHAT_ID_VAR));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config =
            Config::from_lookup(lookup(&[(TOKEN_VAR, "secret-token"), (CHAT_ID_VAR, "42")]))
                .unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
