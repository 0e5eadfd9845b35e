use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::files::{self, FileError};

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read or is not a JSON object.
    Load(FileError),
    /// The JSON does not have the expected shape.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "failed to load config: {}", e),
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse config file '{}': {}", path.display(), source)
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(source) => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

impl From<FileError> for ConfigError {
    fn from(e: FileError) -> Self {
        Self::Load(e)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    bot_info: BotInfo,
    telegram_bot_token: String,
    /// Group chats the bot answers in. Empty means every group.
    #[serde(default)]
    allowed_groups: Vec<i64>,
    #[serde(default)]
    blocked_users: Vec<u64>,
    /// Directory for state files (logs, usage database). Defaults to current directory.
    data_dir: Option<String>,
    /// Directory holding bot_info.txt and answer_book.txt. Defaults to `<data_dir>/resources`.
    resources_dir: Option<String>,
    /// IANA timezone used to decide when "today" starts.
    #[serde(default = "default_timezone")]
    timezone: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

fn default_timezone() -> String {
    "Asia/Shanghai".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Provider credentials, the `botInfo` object of the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotInfo {
    pub gaode_api_config: GaodeApiConfig,
    pub baidu_api_config: BaiduApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaodeApiConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaiduApiConfig {
    pub api_key: String,
    pub secret_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_info: BotInfo,
    pub telegram_bot_token: String,
    pub allowed_groups: HashSet<i64>,
    pub blocked_users: HashSet<u64>,
    pub data_dir: PathBuf,
    pub resources_dir: PathBuf,
    pub timezone: Tz,
    pub log_level: String,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let object = files::read_json_file(&config_path)?;
        let file: ConfigFile = serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|e| ConfigError::ParseJson { path: config_path.clone(), source: e })?;

        if file.telegram_bot_token.is_empty() {
            return Err(ConfigError::Validation("telegramBotToken is required".into()));
        }
        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = file.telegram_bot_token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(
                "telegramBotToken appears invalid (expected format: 123456789:ABCdefGHI...)".into(),
            ));
        }

        let timezone: Tz = file.timezone.parse().map_err(|e| {
            ConfigError::Validation(format!("unknown timezone '{}': {}", file.timezone, e))
        })?;

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let resources_dir = file
            .resources_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("resources"));

        debug!("Config loaded from {}", config_path.display());

        Ok(Self {
            bot_info: file.bot_info,
            telegram_bot_token: file.telegram_bot_token,
            allowed_groups: file.allowed_groups.into_iter().collect(),
            blocked_users: file.blocked_users.into_iter().collect(),
            data_dir,
            resources_dir,
            timezone,
            log_level: file.log_level,
        })
    }

    pub fn bot_info_path(&self) -> PathBuf {
        self.resources_dir.join("bot_info.txt")
    }

    pub fn answer_book_path(&self) -> PathBuf {
        self.resources_dir.join("answer_book.txt")
    }

    pub fn usage_db_path(&self) -> PathBuf {
        self.data_dir.join("usage.db")
    }
}

/// Handle to the config file on disk.
///
/// Every [`ConfigStore::load`] re-reads and re-parses the file, so key
/// rotations take effect on the next API call without a restart. Nothing is
/// cached in memory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        Config::load(&self.path)
    }
}
