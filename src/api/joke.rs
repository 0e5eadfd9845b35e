use serde::Deserialize;

/// A single-part joke from JokeAPI (`type=single`).
#[derive(Debug, Clone, Deserialize)]
pub struct SingleJoke {
    pub error: bool,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub joke: String,
    #[serde(default)]
    pub lang: String,
    /// Only present when `error` is true.
    pub message: Option<String>,
}
