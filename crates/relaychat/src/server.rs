use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::relay::Relay;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay: Relay,
}

pub fn build_app(state: AppState, request_timeout_secs: u64) -> Router {
    let chat = Router::new()
        .route(
            "/chat",
            get(handlers::chat_alive).post(handlers::send_message),
        )
        .layer(DefaultBodyLimit::disable())
        .with_state(state.clone());

    Router::new()
        .route("/", get(handlers::index))
        .route("/livez", get(handlers::livez))
        .route("/readyz", get(handlers::readyz))
        .route("/version", get(handlers::version))
        .with_state(state)
        .merge(chat.clone())
        .nest("/api", chat)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(request_timeout_secs),
        ))
}
