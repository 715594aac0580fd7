//! HTTP transport for the chat endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{Transport, TransportError};
use crate::protocol::{TurnRequest, TurnResponse};

/// Posts turns as JSON to a fixed chat URL.
///
/// The underlying client keeps a cookie store so the server's session cookie
/// survives between turns, as it would in a browser.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    chat_url: Url,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport posting to `chat_url`.
    ///
    /// `timeout` bounds each request; `None` leaves requests unbounded.
    pub fn new(chat_url: Url, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            chat_url,
            http: builder.build()?,
        })
    }

    /// Create a transport with a custom reqwest client.
    #[must_use]
    pub fn with_client(chat_url: Url, http: reqwest::Client) -> Self {
        Self { chat_url, http }
    }

    /// The URL turns are posted to.
    #[must_use]
    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_turn(&self, request: &TurnRequest) -> Result<TurnResponse, TransportError> {
        let response = self
            .http
            .post(self.chat_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %self.chat_url, "chat endpoint responded");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        TurnResponse::from_slice(&body)
    }
}
