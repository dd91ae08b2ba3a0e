//! OpenAI-compatible LLM provider.
//!
//! Works with OpenRouter, OpenAI, Ollama, and other compatible APIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use super::error::LLMError;
use super::provider::LLMProvider;
use super::types::{ChatRequest, ChatResponse};
use crate::config::UpstreamConfig;

/// OpenAI-compatible provider (works for OpenRouter, OpenAI, Ollama).
pub struct OpenAICompatibleProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    site_url: Option<String>,
    site_name: Option<String>,
}

impl OpenAICompatibleProvider {
    #[must_use]
    pub fn new(client: Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
            site_url: None,
            site_name: None,
        }
    }

    /// Attach the OpenRouter attribution headers (`HTTP-Referer`, `X-Title`).
    #[must_use]
    pub fn with_attribution(mut self, site_url: String, site_name: String) -> Self {
        self.site_url = Some(site_url);
        self.site_name = Some(site_name);
        self
    }

    /// Build a provider from upstream settings, with a bounded request timeout.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, LLMError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self::new(
            client,
            config.base_url.trim_end_matches('/').to_string(),
            config.api_key.clone(),
        )
        .with_attribution(config.site_url.clone(), config.site_name.clone()))
    }

    /// Build a POST request with auth and attribution headers.
    fn build_request(&self, url: &str, body: &ChatRequest) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .post(url)
            .header("Content-Type", "application/json");

        if let Some(ref key) = self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }
        if let Some(ref site_url) = self.site_url {
            builder = builder.header("HTTP-Referer", site_url);
        }
        if let Some(ref site_name) = self.site_name {
            builder = builder.header("X-Title", site_name);
        }

        builder.json(body)
    }
}

#[async_trait]
impl LLMProvider for OpenAICompatibleProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self.build_request(&url, &request).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let raw = response.text().await?;

        debug!(status = status.as_u16(), content_type = %content_type, "upstream responded");

        // Status wins over content type: an HTML error page is still an API error.
        if !status.is_success() {
            return Err(LLMError::Api {
                status: status.as_u16(),
                message: raw,
            });
        }
        if !content_type.contains("application/json") {
            return Err(LLMError::NonJson { raw });
        }

        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{spawn_upstream, unreachable_base_url};
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::routing::post;

    fn provider(base_url: String) -> OpenAICompatibleProvider {
        OpenAICompatibleProvider::new(Client::new(), base_url, Some("sk-test".to_string()))
            .with_attribution(
                "http://localhost:3000".to_string(),
                "My OpenRouter Demo".to_string(),
            )
    }

    #[tokio::test]
    async fn sends_credentials_attribution_and_single_turn_body() {
        let app = Router::new().route(
            "/chat/completions",
            post(
                |headers: HeaderMap, axum::Json(body): axum::Json<serde_json::Value>| async move {
                    let get = |name: &str| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_string()
                    };
                    let echo = format!(
                        "{}|{}|{}|{}|{}|{}|{}",
                        get("authorization"),
                        get("http-referer"),
                        get("x-title"),
                        body["model"].as_str().unwrap_or_default(),
                        body["messages"].as_array().map(Vec::len).unwrap_or_default(),
                        body["messages"][0]["role"].as_str().unwrap_or_default(),
                        body["messages"][0]["content"].as_str().unwrap_or_default(),
                    );
                    axum::Json(serde_json::json!({
                        "choices": [{ "message": { "role": "assistant", "content": echo } }]
                    }))
                },
            ),
        );
        let base_url = spawn_upstream(app).await;

        let response = provider(base_url)
            .chat(ChatRequest::single_turn("test/model", "hi"))
            .await
            .unwrap();

        assert_eq!(
            response.first_content(),
            Some("Bearer sk-test|http://localhost:3000|My OpenRouter Demo|test/model|1|user|hi")
        );
    }

    #[tokio::test]
    async fn non_success_status_keeps_raw_body() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "unauthorized") }),
        );
        let base_url = spawn_upstream(app).await;

        let err = provider(base_url)
            .chat(ChatRequest::single_turn("m", "hi"))
            .await
            .unwrap_err();

        match err {
            LLMError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "unauthorized");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn html_content_type_is_non_json() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { ([(header::CONTENT_TYPE, "text/html")], "<html>oops</html>") }),
        );
        let base_url = spawn_upstream(app).await;

        let err = provider(base_url)
            .chat(ChatRequest::single_turn("m", "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, LLMError::NonJson { ref raw } if raw == "<html>oops</html>"));
    }

    #[tokio::test]
    async fn malformed_json_is_parse_error() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { ([(header::CONTENT_TYPE, "application/json")], "{not json") }),
        );
        let base_url = spawn_upstream(app).await;

        let err = provider(base_url)
            .chat(ChatRequest::single_turn("m", "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, LLMError::Parse(_)));
    }

    #[tokio::test]
    async fn connection_failure_is_request_error() {
        let base_url = unreachable_base_url().await;

        let err = provider(base_url)
            .chat(ChatRequest::single_turn("m", "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, LLMError::Request(_)));
    }

    #[test]
    fn from_config_trims_trailing_slash() {
        let config = UpstreamConfig {
            base_url: "https://openrouter.ai/api/v1/".to_string(),
            ..UpstreamConfig::default()
        };
        let provider = OpenAICompatibleProvider::from_config(&config).unwrap();
        assert_eq!(provider.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(provider.site_name.as_deref(), Some("My OpenRouter Demo"));
    }
}
