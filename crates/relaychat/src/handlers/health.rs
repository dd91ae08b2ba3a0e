use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::server::AppState;

#[derive(Serialize)]
pub struct ReadyResponse {
    status: &'static str,
    model: String,
}

pub async fn livez() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// The relay holds no connections of its own, so it is ready once routed.
/// Reports the model requests will be sent to.
pub async fn readyz(State(state): State<AppState>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        status: "ok",
        model: state.relay.model().to_string(),
    })
}
