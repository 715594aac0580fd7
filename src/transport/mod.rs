//! Chat transport abstraction.
//!
//! The widget only needs one operation from the network: send a turn and get
//! back either the server's reply or an error. Every failure mode collapses
//! into [`TransportError`]; the widget does not distinguish between them when
//! talking to the user, but the variants are kept for logging.
//!
//! - [`HttpTransport`]: JSON over HTTP via `reqwest`

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;

use crate::protocol::{TurnRequest, TurnResponse};

/// Errors that can occur while exchanging a turn with the server.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// The server's reply did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Sends conversation turns to the chat endpoint.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send one turn and wait for the reply.
    async fn send_turn(&self, request: &TurnRequest) -> Result<TurnResponse, TransportError>;
}
