//! Stateless single-turn relay from `/chat` to the upstream provider.
//!
//! Every outcome, including failures, becomes an HTTP status plus a
//! [`RelayResponse`] body. Upstream status codes are not forwarded: any
//! failure is reported as 500.

use std::sync::Arc;

use axum::http::StatusCode;
use relaychat_types::{NON_JSON_ERROR, RelayRequest, RelayResponse};
use tracing::{debug, info, warn};

use crate::llm::{ChatRequest, LLMError, LLMProvider};

/// Relays one user message per call to the configured model.
#[derive(Clone)]
pub struct Relay {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl Relay {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Handle a raw `POST /chat` body.
    ///
    /// A body that is not a valid [`RelayRequest`] is reported like any other
    /// failure, as 500 with the parse error message.
    pub async fn handle_body(&self, body: &[u8]) -> (StatusCode, RelayResponse) {
        match serde_json::from_slice::<RelayRequest>(body) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!(error = %e, "rejected malformed relay request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RelayResponse::error(e.to_string()),
                )
            }
        }
    }

    pub async fn handle(&self, request: RelayRequest) -> (StatusCode, RelayResponse) {
        let chat_request = ChatRequest::single_turn(&self.model, request.message);

        match self.provider.chat(chat_request).await {
            Ok(response) => {
                let reply = response.first_content().unwrap_or_default();
                debug!(
                    model = %self.model,
                    finish_reason = response.first_finish_reason().unwrap_or("none"),
                    "upstream choice finished"
                );
                info!(model = %self.model, reply_len = reply.len(), "relayed chat message");
                (StatusCode::OK, RelayResponse::reply(reply))
            }
            Err(e) => {
                warn!(model = %self.model, error = %e, "upstream chat request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, error_response(e))
            }
        }
    }
}

fn error_response(err: LLMError) -> RelayResponse {
    match err {
        LLMError::Api { message, .. } => RelayResponse::error(message),
        LLMError::NonJson { raw } => RelayResponse::error_with_raw(NON_JSON_ERROR, raw),
        other => RelayResponse::error(other.to_string()),
    }
}
