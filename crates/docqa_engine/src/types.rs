use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of a successful `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub filename: String,
    pub chunks_count: u64,
}

/// Body of a successful `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Option<Vec<SourceSnippet>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceSnippet {
    pub text: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub question: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

/// A file read from disk, ready to be sent as the `file` form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Local metadata of a file the user picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub path: std::path::PathBuf,
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    HealthChecked(Result<(), ApiError>),
    UploadFinished {
        file_name: String,
        result: Result<UploadResponse, ApiError>,
    },
    ChatFinished(Result<ChatResponse, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Network,
    Timeout,
    HttpStatus { status: u16, detail: Option<String> },
    InvalidResponse,
    LocalFile,
    TooLarge { max_bytes: u64, actual: u64 },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus { status, .. } => write!(f, "http status {status}"),
            FailureKind::InvalidResponse => write!(f, "invalid response body"),
            FailureKind::LocalFile => write!(f, "local file error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "file too large (max {max_bytes}, actual {actual})")
            }
        }
    }
}
