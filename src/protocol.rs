//! Wire types for the chat endpoint.

use serde::{Deserialize, Serialize};

use crate::transport::TransportError;

/// Body posted to the chat endpoint for every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    /// Trimmed user input.
    pub message: String,
    /// Whether the server should start a fresh conversation.
    pub new_session: bool,
}

impl TurnRequest {
    /// Build a request for the given user input.
    #[must_use]
    pub fn new(message: impl Into<String>, new_session: bool) -> Self {
        Self {
            message: message.into(),
            new_session,
        }
    }
}

/// Reply returned by the chat endpoint.
///
/// `complete` is only sent on the final turn of a conversation, so it
/// defaults to `false` when absent. A missing or non-string `message` is
/// rejected rather than rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    /// Bot reply text.
    pub message: String,
    /// Whether the conversation is finished.
    #[serde(default)]
    pub complete: bool,
}

impl TurnResponse {
    /// Build a reply.
    #[must_use]
    pub fn new(message: impl Into<String>, complete: bool) -> Self {
        Self {
            message: message.into(),
            complete,
        }
    }

    /// Decode a reply body.
    pub fn from_slice(body: &[u8]) -> Result<Self, TransportError> {
        serde_json::from_slice(body).map_err(|e| TransportError::MalformedResponse(e.to_string()))
    }
}
