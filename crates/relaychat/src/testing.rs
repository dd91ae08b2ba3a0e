//! Test helpers: local fake upstreams and scripted providers.

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;

use crate::llm::{ChatRequest, ChatResponse, LLMError, LLMProvider};

/// Serve `app` on an ephemeral localhost port and return its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

type Script = Box<dyn Fn(&ChatRequest) -> Result<ChatResponse, LLMError> + Send + Sync>;

/// Provider answering every request through a closure.
pub struct ScriptedProvider {
    script: Script,
}

impl ScriptedProvider {
    pub fn new(
        script: impl Fn(&ChatRequest) -> Result<ChatResponse, LLMError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
        }
    }

    /// Echo the user message back as the reply.
    pub fn echo() -> Self {
        Self::new(|request| {
            let content = request
                .messages
                .first()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(serde_json::from_value(serde_json::json!({
                "choices": [{ "message": { "content": content } }]
            }))?)
        })
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError> {
        (self.script)(&request)
    }
}
