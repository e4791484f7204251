//! Serialization for the JSON-blob persisted layout.
//!
//! The legacy key-value backend stores the whole task list as a single
//! serialized JSON array. These functions define that layout in one place
//! so the backend and its tests agree on it.

use crate::task::Task;

/// Error type for blob encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("task list serialization error: {0}")]
    Serialization(String),
}

/// Encodes a task list into the JSON array blob layout.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the list cannot be serialized.
pub fn encode_list(tasks: &[Task]) -> Result<String, CodecError> {
    serde_json::to_string(tasks).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes a task list from the JSON array blob layout.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the blob cannot be deserialized.
pub fn decode_list(blob: &str) -> Result<Vec<Task>, CodecError> {
    serde_json::from_str(blob).map_err(|e| CodecError::Serialization(e.to_string()))
}
