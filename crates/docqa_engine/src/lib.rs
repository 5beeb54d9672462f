//! docqa engine: HTTP access to the question-answering backend and effect execution.
mod backend;
mod document;
mod engine;
mod types;

pub use backend::{Backend, BackendSettings, ReqwestBackend, DEFAULT_BASE_URL};
pub use document::{inspect_file, load_document};
pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use types::{
    ApiError, ChatResponse, DocumentInfo, DocumentUpload, EngineEvent, FailureKind,
    SourceSnippet, UploadResponse,
};
