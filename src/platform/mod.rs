pub mod telegram;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use teloxide::types::Recipient;
use thiserror::Error;

/// Sender name used when the platform reports none.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// A command received from the chat platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCommand {
    /// Lower-cased command name without the leading slash
    pub name: String,
    /// Whitespace-separated arguments following the command
    pub args: Vec<String>,
    /// Display name of the sender
    pub sender: String,
    /// When the command was sent
    pub timestamp: DateTime<Utc>,
}

impl IncomingCommand {
    /// Parse `/name[@bot] arg...` out of message text.
    ///
    /// Returns `None` for plain text and for commands addressed to another
    /// bot via the `@bot` suffix.
    pub fn parse(
        text: &str,
        bot_username: &str,
        sender: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Option<Self> {
        let mut tokens = text.split_whitespace();
        let head = tokens.next()?.strip_prefix('/')?;

        let name = match head.split_once('@') {
            Some((name, target)) => {
                if !target.eq_ignore_ascii_case(bot_username) {
                    return None;
                }
                name
            }
            None => head,
        };
        if name.is_empty() {
            return None;
        }

        let sender = sender
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SENDER)
            .to_string();

        Some(Self {
            name: name.to_lowercase(),
            args: tokens.map(str::to_string).collect(),
            sender,
            timestamp,
        })
    }
}

/// A message to be delivered to the destination chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub destination: Recipient,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("destination chat is unavailable: {0}")]
    ChatUnavailable(String),
    #[error("rate limited by Telegram, retry after {0}s")]
    RateLimited(u32),
    #[error("network failure: {0}")]
    Network(String),
    #[error("{0}")]
    Api(String),
}

/// Outbound side of a chat platform
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, to: &Recipient, text: &str) -> Result<(), DeliveryError>;
}
