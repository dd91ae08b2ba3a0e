//! Relay endpoint handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use relaychat_types::{Health, RelayResponse};
use tracing::warn;

use crate::server::AppState;

/// GET /chat
///
/// Liveness only; not part of the conversational contract.
pub async fn chat_alive() -> Json<Health> {
    Json(Health::alive())
}

/// POST /chat
///
/// Request body: `{"message": "..."}`. The body is taken as raw bytes so a
/// malformed payload is answered with the relay's 500 `{ error }` shape
/// instead of axum's extractor rejection. A body that cannot be read at all
/// gets the same shape.
pub async fn send_message(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let (status, response) = match body {
        Ok(body) => state.relay.handle_body(&body).await,
        Err(rejection) => {
            warn!(error = %rejection, "failed to read relay request body");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                RelayResponse::error(rejection.body_text()),
            )
        }
    };
    (status, Json(response)).into_response()
}
