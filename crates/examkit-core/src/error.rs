//! Shuffle error types.
//!
//! The shuffling and aggregation code is total over well-typed input; the
//! only failure surfaced by the core is an encoded option list that cannot
//! be decoded or re-encoded.

use thiserror::Error;

/// Errors that can occur while shuffling an encoded option list.
#[derive(Debug, Error)]
pub enum ShuffleError {
    /// The encoded options were not a valid JSON array.
    #[error("failed to decode option list: {0}")]
    Decode(#[source] serde_json::Error),

    /// The shuffled options could not be encoded again.
    #[error("failed to encode option list: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ShuffleError {
    /// Returns `true` if the caller supplied malformed input.
    pub fn is_decode(&self) -> bool {
        matches!(self, ShuffleError::Decode(_))
    }
}
