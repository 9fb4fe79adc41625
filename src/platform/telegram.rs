use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, Me, Recipient};
use teloxide::{ApiError, RequestError};
use tracing::{info, warn};

use crate::platform::{DeliveryError, IncomingCommand, Messenger};
use crate::router::{Command, CommandRouter};

impl From<RequestError> for DeliveryError {
    fn from(err: RequestError) -> Self {
        let detail = err.to_string();
        match err {
            RequestError::Api(
                ApiError::ChatNotFound | ApiError::BotBlocked | ApiError::BotKicked,
            ) => DeliveryError::ChatUnavailable(detail),
            RequestError::RetryAfter(secs) => DeliveryError::RateLimited(secs.seconds()),
            RequestError::Network(_) => DeliveryError::Network(detail),
            _ => DeliveryError::Api(detail),
        }
    }
}

#[async_trait]
impl Messenger for Bot {
    async fn send_text(&self, to: &Recipient, text: &str) -> Result<(), DeliveryError> {
        self.send_message(to.clone(), text).await?;
        Ok(())
    }
}

fn menu_commands() -> Vec<BotCommand> {
    Command::ALL
        .iter()
        .map(|c| BotCommand::new(c.name(), c.description()))
        .collect()
}

/// Run the Telegram bot platform
pub async fn run(router: Arc<CommandRouter>, bot: Bot) -> Result<()> {
    info!("Starting Telegram platform...");

    if let Err(e) = bot.set_my_commands(menu_commands()).await {
        warn!("Failed to register command menu: {}", e);
    }

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    me: Me,
    router: Arc<CommandRouter>,
) -> ResponseResult<()> {
    let text = match msg.text() {
        Some(t) => t,
        None => return Ok(()),
    };

    let sender = msg.from.as_ref().map(|user| user.first_name.as_str());
    let command = match IncomingCommand::parse(text, me.username(), sender, msg.date) {
        Some(c) => c,
        None => return Ok(()),
    };

    info!(
        "Command /{} from {} in chat {}",
        command.name, command.sender, msg.chat.id
    );

    if let Some(reply) = router.dispatch(&command).await {
        bot.send_message(msg.chat.id, reply).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_not_found_is_unavailable() {
        let err = DeliveryError::from(RequestError::Api(ApiError::ChatNotFound));
        assert!(matches!(err, DeliveryError::ChatUnavailable(_)));
        assert!(err.to_string().contains("chat not found"));
    }

    #[test]
    fn test_bot_blocked_is_unavailable() {
        let err = DeliveryError::from(RequestError::Api(ApiError::BotBlocked));
        assert!(matches!(err, DeliveryError::ChatUnavailable(_)));
    }

    #[test]
    fn test_other_api_errors_keep_description() {
        let err = DeliveryError::from(RequestError::Api(ApiError::MessageTextIsEmpty));
        assert!(matches!(err, DeliveryError::Api(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_menu_lists_every_command() {
        let menu = menu_commands();
        let names: Vec<&str> = menu.iter().map(|c| c.command.as_str()).collect();
        assert_eq!(names, vec!["start", "help", "copy"]);
    }
}
