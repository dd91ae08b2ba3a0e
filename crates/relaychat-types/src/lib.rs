//! Wire types for the relaychat `/chat` endpoint.
//!
//! Shared by the relay server and by clients talking to it, so both sides
//! agree on the JSON shapes.

use serde::{Deserialize, Serialize};

/// Message returned in the liveness payload of `GET /chat`.
pub const ALIVE_MESSAGE: &str = "API alive";

/// Error string used when the upstream answers with a non-JSON content type.
pub const NON_JSON_ERROR: &str = "Upstream returned non-JSON";

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayRequest {
    pub message: String,
}

impl RelayRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body returned by `POST /chat`.
///
/// Serialized untagged, so the JSON is either `{"reply": ...}` or
/// `{"error": ..., "raw": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelayResponse {
    Reply {
        reply: String,
    },
    Error {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw: Option<String>,
    },
}

impl RelayResponse {
    pub fn reply(reply: impl Into<String>) -> Self {
        Self::Reply {
            reply: reply.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
            raw: None,
        }
    }

    pub fn error_with_raw(error: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
            raw: Some(raw.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Liveness payload of `GET /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub ok: bool,
    pub msg: String,
}

impl Health {
    pub fn alive() -> Self {
        Self {
            ok: true,
            msg: ALIVE_MESSAGE.to_string(),
        }
    }
}
