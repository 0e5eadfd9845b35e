//! Wire types for the Baidu conversational-AI provider.

use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every chat request.
pub const TEMPERATURE: f32 = 0.9;
pub const TOP_P: f32 = 1.0;
pub const PENALTY_SCORE: f32 = 1.4;

pub const GRANT_TYPE: &str = "client_credentials";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequestBody<'a> {
    pub messages: &'a [Message],
    pub temperature: f32,
    pub top_p: f32,
    pub penalty_score: f32,
    pub stream: bool,
    pub user_id: String,
}

impl<'a> ChatRequestBody<'a> {
    pub fn new(messages: &'a [Message], sender: u64) -> Self {
        Self {
            messages,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            penalty_score: PENALTY_SCORE,
            stream: false,
            user_id: sender.to_string(),
        }
    }
}

/// Chat completion result.
///
/// On failure the provider omits `result` and fills `error_code`/`error_msg`.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub result: Option<String>,
    pub error_code: Option<i64>,
    pub error_msg: Option<String>,
}

impl ChatResponse {
    pub fn into_result(self) -> Result<String, String> {
        match self.result {
            Some(text) => Ok(text),
            None => Err(match (self.error_code, self.error_msg) {
                (Some(code), Some(msg)) => format!("provider error {code}: {msg}"),
                (None, Some(msg)) => format!("provider error: {msg}"),
                (Some(code), None) => format!("provider error {code}"),
                (None, None) => "no result in chat response".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}
