use std::path::PathBuf;
use std::time::Duration;

/// Side effects requested by `update`; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Probe `GET /health`.
    CheckHealth,
    /// Post the file as multipart form data to `/api/upload`.
    UploadFile { path: PathBuf, file_name: String },
    /// Post `{"question": ...}` to `/api/chat`.
    AskQuestion { question: String },
    /// Deliver `Msg::StatusExpired { token }` once `after` has elapsed.
    ScheduleStatusClear { token: u64, after: Duration },
}
