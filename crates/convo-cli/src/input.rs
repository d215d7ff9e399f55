//! Loading conversations from JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use convo_core::chat::sort_by_timestamp;
use convo_core::Message;
use serde::Deserialize;
use thiserror::Error;

/// Errors reading a message file.
#[derive(Debug, Error)]
pub enum InputError {
    /// File could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not a message list.
    #[error("Invalid message file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Export object layout; a bare array is accepted too.
#[derive(Deserialize)]
struct Export {
    messages: Vec<Message>,
}

/// Parse messages from JSON text, oldest first.
///
/// The layout is picked from the top-level value first, so a bad message
/// reports its own error.
pub fn parse_messages(raw: &str) -> Result<Vec<Message>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let mut messages: Vec<Message> = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        serde_json::from_value::<Export>(value)?.messages
    };
    sort_by_timestamp(&mut messages);
    Ok(messages)
}

/// Read and parse a message file.
pub fn load_messages(path: &Path) -> Result<Vec<Message>, InputError> {
    let raw = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_messages(&raw).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}
