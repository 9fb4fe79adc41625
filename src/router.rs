use std::sync::Arc;

use chrono::{DateTime, Utc};
use teloxide::types::Recipient;
use tracing::{debug, error, info};

use crate::platform::{IncomingCommand, Messenger, OutgoingMessage};

const START_TEXT: &str = "🤖 Telegram Copy-Paste Bot\n\n\
     Available commands:\n\
     /copy [message] - Forward WhatsApp message\n\
     /help - Show help\n\n\
     Example: /copy Check this out!";

const HELP_TEXT: &str = "📋 How to use:\n\n\
     1. Copy message from WhatsApp group\n\
     2. Send /copy followed by message\n\n\
     Examples:\n\
     /copy Great news!\n\
     /copy Meeting at 3 PM\n";

pub const USAGE_TEXT: &str = "Please provide a message.\nUsage: /copy [message]";
pub const FORWARDED_TEXT: &str = "Message forwarded to Telegram!";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LOG_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Copy,
}

impl Command {
    pub const ALL: [Command; 3] = [Command::Start, Command::Help, Command::Copy];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "copy" => Some(Command::Copy),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Copy => "copy",
        }
    }

    /// Short description shown in the client's command menu
    pub fn description(self) -> &'static str {
        match self {
            Command::Start => "Show the welcome message",
            Command::Help => "Show usage instructions",
            Command::Copy => "Forward a WhatsApp message",
        }
    }
}

/// Result of handling `/copy`
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOutcome {
    /// Text sent back to the user who issued the command
    pub reply: String,
    /// The message that reached the destination chat, if any
    pub forwarded: Option<OutgoingMessage>,
}

/// Build the text that lands in the destination chat.
pub fn format_forward(sender: &str, timestamp: DateTime<Utc>, text: &str) -> String {
    format!(
        "📱 From WhatsApp Group\n\
         👤 Shared by: {}\n\
         ⏰ Time: {}\n\n\
         {}",
        sender,
        timestamp.format(TIME_FORMAT),
        text
    )
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Routes commands to their handlers and forwards `/copy` text to the
/// configured destination.
pub struct CommandRouter {
    destination: Recipient,
    messenger: Arc<dyn Messenger>,
}

impl CommandRouter {
    pub fn new(destination: Recipient, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            destination,
            messenger,
        }
    }

    /// Handle a parsed command and return the reply for the sender.
    /// Unknown commands get no reply.
    pub async fn dispatch(&self, command: &IncomingCommand) -> Option<String> {
        let Some(kind) = Command::from_name(&command.name) else {
            debug!("Ignoring unknown command /{}", command.name);
            return None;
        };

        let reply = match kind {
            Command::Start => self.handle_start(&command.sender),
            Command::Help => self.handle_help(&command.sender),
            Command::Copy => {
                self.handle_copy(&command.args, &command.sender, command.timestamp)
                    .await
                    .reply
            }
        };
        Some(reply)
    }

    pub fn handle_start(&self, _sender: &str) -> String {
        START_TEXT.to_string()
    }

    pub fn handle_help(&self, _sender: &str) -> String {
        HELP_TEXT.to_string()
    }

    pub async fn handle_copy(
        &self,
        args: &[String],
        sender: &str,
        timestamp: DateTime<Utc>,
    ) -> CopyOutcome {
        if args.is_empty() {
            return CopyOutcome {
                reply: USAGE_TEXT.to_string(),
                forwarded: None,
            };
        }

        let message_text = args.join(" ");
        let message = OutgoingMessage {
            destination: self.destination.clone(),
            body: format_forward(sender, timestamp, &message_text),
        };

        match self
            .messenger
            .send_text(&message.destination, &message.body)
            .await
        {
            Ok(()) => {
                info!("Message forwarded: {}", preview(&message_text));
                CopyOutcome {
                    reply: FORWARDED_TEXT.to_string(),
                    forwarded: Some(message),
                }
            }
            Err(e) => {
                error!("Error forwarding message from {}: {}", sender, e);
                CopyOutcome {
                    reply: format!("Error: {}", e),
                    forwarded: None,
                }
            }
        }
    }
}
