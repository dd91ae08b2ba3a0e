//! Transport from the chat client to the relay endpoint.

use async_trait::async_trait;
use relaychat_types::RelayRequest;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use thiserror::Error;

/// Failure of a single relay round trip.
///
/// The `Display` output is the detail shown after `"Error: "` in the log.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connect, DNS, timeout).
    #[error("{0}")]
    Transport(String),

    /// The relay answered with a non-success status.
    #[error("{message}")]
    Relay { status: u16, message: String },

    /// The relay answered 2xx with a body that is not JSON.
    #[error("relay returned non-JSON: {body}")]
    NonJson { body: String },

    /// The relay claimed JSON but the body did not parse.
    #[error("invalid relay response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

/// Sends one relay request and yields the reply text.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Returns the reply, possibly empty, or the failure detail.
    async fn send(&self, request: RelayRequest) -> Result<String, ClientError>;
}

/// Relay response fields the client reads; both are optional on the wire.
#[derive(Deserialize)]
struct ReplyBody {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP transport posting to `<base_url>/chat`.
pub struct HttpRelayClient {
    client: Client,
    url: String,
}

impl HttpRelayClient {
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}/chat", base_url.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RelayTransport for HttpRelayClient {
    async fn send(&self, request: RelayRequest) -> Result<String, ClientError> {
        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        let text = response.text().await?;

        if !status.is_success() {
            // Prefer the relay's `error` field; fall back to the raw body for
            // non-JSON answers (e.g. a proxy's HTML page), then to the status.
            // A JSON content type with an unparseable body is a decode error.
            let message = if is_json {
                serde_json::from_str::<ReplyBody>(&text)?.error
            } else {
                Some(text).filter(|t| !t.is_empty())
            };
            return Err(ClientError::Relay {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            });
        }

        if !is_json {
            return Err(ClientError::NonJson { body: text });
        }

        let body: ReplyBody = serde_json::from_str(&text)?;
        Ok(body.reply.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{spawn_upstream, unreachable_base_url};
    use axum::Router;
    use axum::http::{StatusCode, header};
    use axum::routing::post;
    use serde_json::json;

    async fn client_for(app: Router) -> HttpRelayClient {
        let base_url = spawn_upstream(app).await;
        HttpRelayClient::new(Client::new(), &base_url)
    }

    #[test]
    fn url_joins_chat_path() {
        let client = HttpRelayClient::new(Client::new(), "http://localhost:3000/");
        assert_eq!(client.url(), "http://localhost:3000/chat");
    }

    #[tokio::test]
    async fn success_returns_reply() {
        let client = client_for(Router::new().route(
            "/chat",
            post(|axum::Json(req): axum::Json<RelayRequest>| async move {
                axum::Json(json!({ "reply": format!("echo: {}", req.message) }))
            }),
        ))
        .await;

        let reply = client.send(RelayRequest::new("hi")).await.unwrap();
        assert_eq!(reply, "echo: hi");
    }

    #[tokio::test]
    async fn success_without_reply_is_empty() {
        let client = client_for(
            Router::new().route("/chat", post(|| async { axum::Json(json!({})) })),
        )
        .await;

        let reply = client.send(RelayRequest::new("hi")).await.unwrap();
        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn error_status_uses_error_field() {
        let client = client_for(Router::new().route(
            "/chat",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(json!({ "error": "unauthorized" })),
                )
            }),
        ))
        .await;

        let err = client.send(RelayRequest::new("hi")).await.unwrap_err();
        assert_eq!(err.to_string(), "unauthorized");
        assert!(matches!(err, ClientError::Relay { status: 500, .. }));
    }

    #[tokio::test]
    async fn error_status_with_html_uses_body() {
        let client = client_for(Router::new().route(
            "/chat",
            post(|| async {
                (
                    StatusCode::BAD_GATEWAY,
                    [(header::CONTENT_TYPE, "text/html")],
                    "<h1>Bad Gateway</h1>",
                )
            }),
        ))
        .await;

        let err = client.send(RelayRequest::new("hi")).await.unwrap_err();
        assert_eq!(err.to_string(), "<h1>Bad Gateway</h1>");
    }

    #[tokio::test]
    async fn error_status_without_detail_falls_back_to_status() {
        let client = client_for(Router::new().route(
            "/chat",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, axum::Json(json!({}))) }),
        ))
        .await;

        let err = client.send(RelayRequest::new("hi")).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503");
    }

    #[tokio::test]
    async fn error_status_with_broken_json_reports_parse_error() {
        let client = client_for(Router::new().route(
            "/chat",
            post(|| async {
                (
                    StatusCode::BAD_GATEWAY,
                    [(header::CONTENT_TYPE, "application/json")],
                    "{not json",
                )
            }),
        ))
        .await;

        let err = client.send(RelayRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        assert!(err.to_string().starts_with("invalid relay response: "));
    }

    #[tokio::test]
    async fn success_with_non_json_body_is_error() {
        let client = client_for(Router::new().route("/chat", post(|| async { "plain text" })))
            .await;

        let err = client.send(RelayRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, ClientError::NonJson { ref body } if body == "plain text"));
    }

    #[tokio::test]
    async fn unreachable_relay_is_transport_error() {
        let client = HttpRelayClient::new(Client::new(), &unreachable_base_url().await);

        let err = client.send(RelayRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
