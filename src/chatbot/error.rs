use std::fmt;

use crate::api::ApiError;
use crate::api::gaode::InvalidRequest;
use crate::files::FileError;

use super::message::SendError;

/// Why a command could not be completed.
#[derive(Debug)]
pub enum FeatureError {
    /// A resource file (bot info, answer book) could not be loaded.
    DataLoad(FileError),
    /// The provider could not be reached, or its credentials could not be loaded.
    Request(ApiError),
    /// The provider answered with something we could not use.
    Malformed(String),
    /// The provider answered with an error status.
    Provider(String),
    /// The user's arguments were rejected.
    Invalid(String),
    Storage(rusqlite::Error),
    Send(SendError),
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureError::DataLoad(e) => write!(f, "data load error: {e}"),
            FeatureError::Request(e) => write!(f, "request error: {e}"),
            FeatureError::Malformed(e) => write!(f, "malformed response: {e}"),
            FeatureError::Provider(e) => write!(f, "provider error: {e}"),
            FeatureError::Invalid(e) => write!(f, "invalid arguments: {e}"),
            FeatureError::Storage(e) => write!(f, "storage error: {e}"),
            FeatureError::Send(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FeatureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeatureError::DataLoad(e) => Some(e),
            FeatureError::Request(e) => Some(e),
            FeatureError::Storage(e) => Some(e),
            FeatureError::Send(e) => Some(e),
            FeatureError::Malformed(_) | FeatureError::Provider(_) | FeatureError::Invalid(_) => None,
        }
    }
}

impl From<FileError> for FeatureError {
    fn from(e: FileError) -> Self {
        FeatureError::DataLoad(e)
    }
}

impl From<ApiError> for FeatureError {
    fn from(e: ApiError) -> Self {
        FeatureError::Request(e)
    }
}

impl From<reqwest::Error> for FeatureError {
    fn from(e: reqwest::Error) -> Self {
        FeatureError::Request(ApiError::Transport(e))
    }
}

impl From<rusqlite::Error> for FeatureError {
    fn from(e: rusqlite::Error) -> Self {
        FeatureError::Storage(e)
    }
}

impl From<SendError> for FeatureError {
    fn from(e: SendError) -> Self {
        FeatureError::Send(e)
    }
}

impl From<InvalidRequest> for FeatureError {
    fn from(e: InvalidRequest) -> Self {
        FeatureError::Invalid(e.0)
    }
}

impl FeatureError {
    /// Text to show the user, if this failure warrants a reply at all.
    ///
    /// Only argument errors are answered; provider and I/O failures abort
    /// silently and are left to the log.
    pub fn user_message(&self) -> Option<String> {
        match self {
            FeatureError::Invalid(reason) => Some(format!("参数不对哦：{reason}")),
            _ => None,
        }
    }
}
