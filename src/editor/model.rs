//! Request and response records for the editor endpoints.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Deserializer, Serialize};

/// Query for `GET /ajax/loadfile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadRequest {
    #[serde(default, rename = "dir")]
    pub directory: String,
    #[serde(default)]
    pub filename: String,
}

/// Body of `PUT /ajax/savefile`, JSON or form-encoded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub path: String,
    #[serde(default, rename = "filecontents", deserialize_with = "deserialize_text")]
    pub contents: String,
    /// Modification time the client loaded. `None` when absent or blank.
    #[serde(default, deserialize_with = "deserialize_mtime")]
    pub mtime: Option<i64>,
}

/// A string field where `null` means empty.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept an mtime as a number or a numeric string; blank means absent.
fn deserialize_mtime<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A file opened for editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedFile {
    pub filecontents: String,
    pub writeable: bool,
    pub mime: String,
    pub mtime: i64,
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedFile {
    pub mtime: i64,
    pub size: u64,
}

/// JSON body of an editor response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Loaded(LoadedFile),
    Saved(SavedFile),
    Error { message: String },
}

/// Status and payload produced by a controller operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    pub status: StatusCode,
    pub payload: Payload,
}

impl OperationResult {
    pub fn ok(payload: Payload) -> Self {
        Self {
            status: StatusCode::OK,
            payload,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            payload: Payload::Error {
                message: message.into(),
            },
        }
    }

    /// The error message, if this is a failure.
    pub fn message(&self) -> Option<&str> {
        match &self.payload {
            Payload::Error { message } => Some(message),
            _ => None,
        }
    }
}

impl IntoResponse for OperationResult {
    fn into_response(self) -> Response {
        (self.status, Json(self.payload)).into_response()
    }
}
