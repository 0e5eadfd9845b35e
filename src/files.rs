//! Flat-file helpers for JSON documents and text resources.
//!
//! Nothing here caches: each call opens and parses the file again.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::api::baidu::Message;

#[derive(Debug)]
pub enum FileError {
    /// Failed to read or write the file.
    Io { path: PathBuf, source: std::io::Error },
    /// The file is not valid JSON.
    Json { path: PathBuf, source: serde_json::Error },
    /// The file parsed but does not hold what the caller asked for.
    Shape { path: PathBuf, expected: &'static str },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error on '{}': {}", path.display(), source),
            Self::Json { path, source } => {
                write!(f, "invalid JSON in '{}': {}", path.display(), source)
            }
            Self::Shape { path, expected } => {
                write!(f, "'{}' does not contain {}", path.display(), expected)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Shape { .. } => None,
        }
    }
}

fn read_to_string(path: &Path) -> Result<String, FileError> {
    std::fs::read_to_string(path).map_err(|e| FileError::Io { path: path.to_path_buf(), source: e })
}

fn parse_json(path: &Path) -> Result<Value, FileError> {
    let content = read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| FileError::Json { path: path.to_path_buf(), source: e })
}

/// Read a text template, each line terminated by `\n`.
pub fn read_template_file(path: impl AsRef<Path>) -> Result<String, FileError> {
    let content = read_to_string(path.as_ref())?;
    let mut out = String::with_capacity(content.len() + 1);
    for line in content.lines() {
        out.push_str(line);
        out.push('\n');
    }
    Ok(out)
}

/// Read a file whose top-level JSON value must be an object.
pub fn read_json_file(path: impl AsRef<Path>) -> Result<Map<String, Value>, FileError> {
    let path = path.as_ref();
    match parse_json(path)? {
        Value::Object(map) => Ok(map),
        _ => Err(FileError::Shape { path: path.to_path_buf(), expected: "a JSON object" }),
    }
}

/// Read a file whose top-level JSON value must be an array.
pub fn read_json_array(path: impl AsRef<Path>) -> Result<Vec<Value>, FileError> {
    let path = path.as_ref();
    match parse_json(path)? {
        Value::Array(items) => Ok(items),
        _ => Err(FileError::Shape { path: path.to_path_buf(), expected: "a JSON array" }),
    }
}

pub fn write_json_file(path: impl AsRef<Path>, value: &Value) -> Result<(), FileError> {
    let path = path.as_ref();
    let json = serde_json::to_string(value)
        .map_err(|e| FileError::Json { path: path.to_path_buf(), source: e })?;
    write(path, &json)
}

pub fn write(path: impl AsRef<Path>, content: &str) -> Result<(), FileError> {
    let path = path.as_ref();
    std::fs::write(path, content).map_err(|e| FileError::Io { path: path.to_path_buf(), source: e })
}

/// Read the answer book: one answer per line, keyed by 1-based line number.
///
/// Blank lines are skipped but still count towards the numbering.
pub fn read_answer_book(path: impl AsRef<Path>) -> Result<BTreeMap<usize, String>, FileError> {
    let content = read_to_string(path.as_ref())?;
    Ok(content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line.trim().to_string()))
        .collect())
}

/// Read the conversation seed for the AI provider.
///
/// Odd lines (1st, 3rd, ...) are user turns, even lines are assistant turns.
pub fn read_bot_info(path: impl AsRef<Path>) -> Result<Vec<Message>, FileError> {
    let content = read_to_string(path.as_ref())?;
    Ok(content
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i % 2 == 0 {
                Message::user(line)
            } else {
                Message::assistant(line)
            }
        })
        .collect())
}
