//! Telegram client using teloxide.

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html;
use tracing::{debug, info, warn};

use super::message::{ChatSender, OutgoingMessage, SendError};

/// Telegram API client.
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Render a message as Telegram HTML, turning the mention into a user link.
pub fn render_html(message: &OutgoingMessage) -> String {
    let text = html::escape(&message.text);
    match &message.mention {
        Some(m) => format!(
            r#"<a href="tg://user?id={}">{}</a> {}"#,
            m.user_id,
            html::escape(&m.display_name),
            text
        ),
        None => text,
    }
}

impl ChatSender for TelegramClient {
    async fn send_group_message(&self, group_id: i64, message: &OutgoingMessage) -> Result<(), SendError> {
        debug!("Sending to chat {}: {}", group_id, message.render_plain());
        let text = render_html(message);
        self.bot
            .send_message(ChatId(group_id), text)
            .parse_mode(ParseMode::Html)
            .await
            .map(|sent| info!("Sent message {} to chat {}", sent.id.0, group_id))
            .map_err(|e| {
                let msg = format!("chat {group_id}: {e}");
                warn!("Failed to send: {}", msg);
                SendError(msg)
            })
    }
}
