use crate::{Role, StatusKind};

pub const UPLOAD_LABEL_IDLE: &str = "Upload PDF";
pub const UPLOAD_LABEL_BUSY: &str = "Uploading...";
pub const WELCOME_TEXT: &str =
    "Welcome! Upload a PDF document, then ask questions about its content.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub text: String,
    pub kind: StatusKind,
    /// Distinguishes a repeated status from the one already shown.
    pub token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub role: Role,
    pub sender: String,
    pub content: String,
    /// Heading plus one truncated line per source, if the answer had any.
    pub sources_preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub file_info: Option<String>,
    pub upload_enabled: bool,
    pub upload_label: String,
    pub status: Option<StatusView>,
    pub input_enabled: bool,
    pub send_enabled: bool,
    /// A question is in flight; the send action shows a spinner.
    pub sending: bool,
    pub show_welcome: bool,
    pub messages: Vec<MessageView>,
}
