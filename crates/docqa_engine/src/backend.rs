use std::time::Duration;

use docqa_logging::{docqa_debug, docqa_info, docqa_warn};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::document::content_type_for;
use crate::types::{ChatRequest, ErrorBody};
use crate::{ApiError, ChatResponse, DocumentUpload, FailureKind, UploadResponse};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const HEALTH_PATH: &str = "health";
const UPLOAD_PATH: &str = "api/upload";
const CHAT_PATH: &str = "api/chat";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: Url,
    /// `None` waits forever, matching a browser `fetch` without an abort signal.
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl BackendSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: None,
            request_timeout: None,
        }
    }

    /// Parses and validates an `http`/`https` base URL.
    pub fn parse(base_url: &str) -> Result<Self, ApiError> {
        let url = Url::parse(base_url.trim())
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{base_url}: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{base_url}: unsupported scheme {}", url.scheme()),
            ));
        }
        Ok(Self::new(url))
    }
}

/// The document question-answering service, as seen by the client.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn health(&self) -> Result<(), ApiError>;

    async fn upload(&self, document: DocumentUpload) -> Result<UploadResponse, ApiError>;

    async fn chat(&self, question: &str) -> Result<ChatResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let mut base = self.settings.base_url.clone();
        // Without a trailing slash `join` would replace the last path segment.
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn health(&self) -> Result<(), ApiError> {
        let url = self.endpoint(HEALTH_PATH)?;
        let seq = docqa_logging::next_request_seq();
        docqa_debug!("#{} GET {}", seq, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error);
        let result = match response {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => Err(status_error(response).await),
            Err(err) => Err(err),
        };
        log_outcome(seq, "health", &result);
        result
    }

    async fn upload(&self, document: DocumentUpload) -> Result<UploadResponse, ApiError> {
        let url = self.endpoint(UPLOAD_PATH)?;
        let seq = docqa_logging::next_request_seq();
        docqa_info!(
            "#{} POST {} file={} bytes={}",
            seq,
            url,
            document.file_name,
            document.bytes.len()
        );

        let mime = content_type_for(&document.file_name);
        let part = Part::bytes(document.bytes)
            .file_name(document.file_name)
            .mime_str(mime)
            .map_err(|err| ApiError::new(FailureKind::LocalFile, err.to_string()))?;
        let form = Form::new().part("file", part);

        let result = match self.client.post(url).multipart(form).send().await {
            Ok(response) => decode_json(response).await,
            Err(err) => Err(map_reqwest_error(err)),
        };
        log_outcome(seq, "upload", &result);
        result
    }

    async fn chat(&self, question: &str) -> Result<ChatResponse, ApiError> {
        let url = self.endpoint(CHAT_PATH)?;
        let seq = docqa_logging::next_request_seq();
        docqa_info!("#{} POST {} question_len={}", seq, url, question.len());

        let result = match self
            .client
            .post(url)
            .json(&ChatRequest { question })
            .send()
            .await
        {
            Ok(response) => decode_json(response).await,
            Err(err) => Err(map_reqwest_error(err)),
        };
        log_outcome(seq, "chat", &result);
        result
    }
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(status_error(response).await);
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body)
        .map_err(|err| ApiError::new(FailureKind::InvalidResponse, err.to_string()))
}

/// Builds the error for a non-success response, keeping the server's `detail`.
async fn status_error(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let detail = match response.bytes().await {
        Ok(body) => error_detail(&body),
        Err(err) => {
            docqa_warn!("Failed to read error body for status {}: {}", status, err);
            None
        }
    };
    let message = detail.clone().unwrap_or_else(|| status.to_string());
    ApiError::new(
        FailureKind::HttpStatus {
            status: status.as_u16(),
            detail,
        },
        message,
    )
}

fn error_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail? {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn log_outcome<T>(seq: u64, what: &str, result: &Result<T, ApiError>) {
    match result {
        Ok(_) => docqa_debug!("#{} {} ok", seq, what),
        Err(err) => docqa_warn!("#{} {} failed ({}): {}", seq, what, err.kind, err.message),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
