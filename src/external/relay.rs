//! HTTP relay transport.
//!
//! Hands messages to a relay gateway that holds the chat network session.
//! The gateway exposes three endpoints:
//! - `POST /messages` with a `MessageRequest` body
//! - `POST /conversations` with `{"recipient_id"}`, answering `{"conversation_id"}`
//! - `GET /me` to check the bearer token

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::build_http_client;
use super::transport::ChatTransport;
use crate::config::TransportConfig;
use crate::error::{AppError, AppResult};
use crate::models::MessageRequest;

#[derive(Debug, Serialize)]
struct CreateConversationRequest<'a> {
    recipient_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateConversationResponse {
    conversation_id: String,
}

/// Chat transport backed by a relay gateway over HTTP
#[derive(Debug, Clone)]
pub struct RelayTransport {
    client: Client,
    base_url: String,
    auth_token: String,
}

impl RelayTransport {
    pub fn new(client: Client, base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.into(),
        }
    }

    /// Builds the transport and its pooled client from configuration
    pub fn from_config(config: &TransportConfig) -> AppResult<Self> {
        let client = build_http_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(client, &config.relay_url, &config.auth_token))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        if self.auth_token.is_empty() {
            request
        } else {
            request.bearer_auth(&self.auth_token)
        }
    }

    /// Sends the request, turning transport failures and non-2xx into `AppError::Transport`
    async fn execute(&self, operation: &str, request: RequestBuilder) -> AppResult<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| AppError::transport(operation, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::transport(
                operation,
                format!("HTTP {}: {}", status, body),
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatTransport for RelayTransport {
    async fn send_message(&self, request: &MessageRequest) -> AppResult<()> {
        let url = self.endpoint("messages");
        debug!(
            url = %url,
            conversation_id = %request.conversation_id,
            message_id = %request.message_id,
            "Sending message to relay"
        );

        self.execute("send_message", self.client.post(&url).json(request))
            .await?;
        Ok(())
    }

    async fn create_conversation(&self, recipient_id: &str) -> AppResult<String> {
        let url = self.endpoint("conversations");
        debug!(url = %url, recipient_id = %recipient_id, "Creating conversation");

        let response = self
            .execute(
                "create_conversation",
                self.client
                    .post(&url)
                    .json(&CreateConversationRequest { recipient_id }),
            )
            .await?;

        let body: CreateConversationResponse = response
            .json()
            .await
            .map_err(|e| AppError::transport("create_conversation", e.to_string()))?;
        Ok(body.conversation_id)
    }

    async fn verify(&self) -> AppResult<()> {
        self.execute("verify", self.client.get(self.endpoint("me")))
            .await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "relay"
    }
}
