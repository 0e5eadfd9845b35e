//! Outgoing chat messages and the seam to the messaging runtime.

use std::fmt;
use std::future::Future;

/// The user a reply is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    pub user_id: u64,
    pub display_name: String,
}

/// A text reply, optionally opening with a mention of the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub mention: Option<Mention>,
    pub text: String,
}

impl OutgoingMessage {
    pub fn to(mention: &Mention, text: impl Into<String>) -> Self {
        Self { mention: Some(mention.clone()), text: text.into() }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self { mention: None, text: text.into() }
    }

    /// Plain-text rendering: `@name text`.
    pub fn render_plain(&self) -> String {
        match &self.mention {
            Some(m) => format!("@{} {}", m.display_name, self.text),
            None => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendError(pub String);

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to send: {}", self.0)
    }
}

impl std::error::Error for SendError {}

/// Posts messages into a group chat.
pub trait ChatSender: Send + Sync {
    fn send_group_message(
        &self,
        group_id: i64,
        message: &OutgoingMessage,
    ) -> impl Future<Output = Result<(), SendError>> + Send;
}
