//! Chatbot module - turns group-chat commands into provider calls and replies.

pub mod answer_book;
pub mod commands;
pub mod error;
pub mod geo;
pub mod joke;
pub mod lucky_day;
pub mod message;
pub mod telegram;

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::ApiRequester;
use crate::permission::Permission;
use crate::usage::DailyUsage;

pub use commands::{AddressArgs, Command, NearbyArgs};
pub use error::FeatureError;
pub use message::{ChatSender, Mention, OutgoingMessage, SendError};
pub use telegram::TelegramClient;

/// What a command handler ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The sender is not allowed to use the bot here; nothing was sent.
    Ignored,
    /// The feature was already used today; a notice was sent instead.
    Duplicate,
    /// The reply was sent.
    Sent,
}

/// Everything a command handler needs, built once by the composition root.
pub struct Features<S> {
    pub requester: Arc<ApiRequester>,
    pub sender: Arc<S>,
    pub permission: Arc<Permission>,
    pub usage: Arc<DailyUsage>,
    pub bot_info_path: PathBuf,
    pub answer_book_path: PathBuf,
}

impl<S: ChatSender> Features<S> {
    async fn reply(&self, group_id: i64, caller: &Mention, text: impl Into<String>) -> Result<(), FeatureError> {
        let message = OutgoingMessage::to(caller, text);
        self.sender.send_group_message(group_id, &message).await?;
        Ok(())
    }
}

/// Read a provider response body and parse it as JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FeatureError> {
    let status = response.status();
    let body = response.text().await?;
    debug!("Provider response {}: {} bytes", status, body.len());
    serde_json::from_str(&body).map_err(|e| FeatureError::Malformed(format!("{e} (HTTP {status})")))
}
