//! Outbound HTTP requests to the mapping, AI and joke providers.
//!
//! Each `send_*` call performs exactly one request and hands back the raw
//! [`reqwest::Response`]; parsing is left to the caller. Nothing is retried.

pub mod baidu;
pub mod gaode;
pub mod joke;

use std::fmt;
use std::time::Duration;

use reqwest::Response;
use tracing::{debug, info};

use crate::config::{ConfigError, ConfigStore};
use baidu::{ChatRequestBody, Message, TokenResponse};
use gaode::AroundSearchRequest;

/// Connect and read timeout applied to every request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider endpoint URLs.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub geocode: String,
    pub around_search: String,
    pub ai_token: String,
    pub ai_chat: String,
    pub joke: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocode: "https://restapi.amap.com/v3/geocode/geo".to_string(),
            around_search: "https://restapi.amap.com/v3/place/around".to_string(),
            ai_token: "https://aip.baidubce.com/oauth/2.0/token".to_string(),
            ai_chat: "https://aip.baidubce.com/rpc/2.0/ai_custom/v1/wenxinworkshop/chat/completions"
                .to_string(),
            joke: "https://v2.jokeapi.dev/joke/Any?type=single".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// Credentials could not be loaded.
    Config(ConfigError),
    /// Network or I/O failure talking to the provider.
    Transport(reqwest::Error),
    /// The token endpoint answered without an access token.
    Token(String),
    /// The token endpoint answered with something that is not JSON.
    Malformed(serde_json::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(e) => write!(f, "config error: {e}"),
            ApiError::Transport(e) => write!(f, "HTTP error: {e}"),
            ApiError::Token(e) => write!(f, "access token error: {e}"),
            ApiError::Malformed(e) => write!(f, "malformed response: {e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Config(e) => Some(e),
            ApiError::Transport(e) => Some(e),
            ApiError::Token(_) => None,
            ApiError::Malformed(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(e: ConfigError) -> Self {
        ApiError::Config(e)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e)
    }
}

/// HTTP client for every provider the bot talks to.
///
/// Credentials are read from the config file on each call.
pub struct ApiRequester {
    http: reqwest::Client,
    config: ConfigStore,
    endpoints: Endpoints,
}

impl ApiRequester {
    pub fn new(config: ConfigStore) -> Result<Self, ApiError> {
        Self::with_endpoints(config, Endpoints::default())
    }

    pub fn with_endpoints(config: ConfigStore, endpoints: Endpoints) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(HTTP_TIMEOUT)
            .read_timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self { http, config, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn send_around_search_request(&self, request: &AroundSearchRequest) -> Result<Response, ApiError> {
        let config = self.config.load()?;
        let url = gaode::around_search_url(
            &self.endpoints.around_search,
            &config.bot_info.gaode_api_config.api_key,
            request,
        );
        debug!("Around search at {} for '{}'", request.location(), request.types());
        Ok(self.http.get(url).send().await?)
    }

    pub async fn send_address_request(&self, address: &str, city: &str) -> Result<Response, ApiError> {
        let config = self.config.load()?;
        let url = gaode::address_url(
            &self.endpoints.geocode,
            &config.bot_info.gaode_api_config.api_key,
            address,
            city,
        );
        debug!("Geocoding '{}' in '{}'", address, city);
        Ok(self.http.get(url).send().await?)
    }

    /// Send a chat completion, fetching a fresh access token first.
    pub async fn send_chat_request(&self, messages: &[Message], sender: u64) -> Result<Response, ApiError> {
        let token = self.fetch_access_token().await?;
        let body = ChatRequestBody::new(messages, sender);

        info!("Sending chat request with {} messages for {}", messages.len(), sender);
        let response = self
            .http
            .post(&self.endpoints.ai_chat)
            .query(&[("access_token", token.as_str())])
            .json(&body)
            .send()
            .await?;
        debug!("Chat response status: {}", response.status());
        Ok(response)
    }

    /// Exchange the configured client id/secret for an access token.
    pub async fn fetch_access_token(&self) -> Result<String, ApiError> {
        let config = self.config.load()?;
        let credentials = &config.bot_info.baidu_api_config;

        let response = self
            .http
            .post(&self.endpoints.ai_token)
            .form(&[
                ("grant_type", baidu::GRANT_TYPE),
                ("client_id", credentials.api_key.as_str()),
                ("client_secret", credentials.secret_key.as_str()),
            ])
            .send()
            .await?;

        let body = response.text().await?;
        let parsed: TokenResponse = serde_json::from_str(&body).map_err(ApiError::Malformed)?;
        match parsed.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ApiError::Token(
                parsed
                    .error_description
                    .or(parsed.error)
                    .unwrap_or_else(|| "no access_token in response".to_string()),
            )),
        }
    }

    pub async fn send_joke_request(&self) -> Result<Response, ApiError> {
        Ok(self.http.get(&self.endpoints.joke).send().await?)
    }
}
