use std::path::PathBuf;
use std::time::Duration;

use crate::preview::{format_file_info, sources_block};
use crate::view_model::{
    AppViewModel, MessageView, StatusView, UPLOAD_LABEL_BUSY, UPLOAD_LABEL_IDLE,
};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub filename: String,
    pub chunks_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatReply {
    pub answer: String,
    /// Raw supporting snippets, in backend order.
    pub sources: Vec<String>,
}

/// Why a backend exchange did not produce a usable result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// The request never got a response (refused, reset, timed out).
    Connectivity(String),
    /// Non-success status; `detail` is the server's explanation if it sent one.
    Server { status: u16, detail: Option<String> },
    /// A success status whose body could not be decoded.
    InvalidResponse(String),
    /// The file to upload could not be read locally.
    LocalFile(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub sender: String,
    pub content: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
    /// Backend unreachable advisory; stays until replaced.
    Offline,
}

impl StatusKind {
    pub fn auto_clears(self) -> bool {
        matches!(self, StatusKind::Success | StatusKind::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Status {
    text: String,
    kind: StatusKind,
    token: u64,
}

/// Everything the controller knows about the current client session.
///
/// Nothing here outlives the process; a restart begins a fresh session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSession {
    backend_url: String,
    status_clear_after: Duration,
    selected_file: Option<SelectedFile>,
    health_check_pending: bool,
    upload_enabled: bool,
    uploads_in_flight: usize,
    chat_enabled: bool,
    busy: bool,
    draft: String,
    messages: Vec<ChatMessage>,
    status: Option<Status>,
    status_seq: u64,
    dirty: bool,
}

impl Default for ClientSession {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            status_clear_after: STATUS_CLEAR_AFTER,
            selected_file: None,
            health_check_pending: false,
            upload_enabled: false,
            uploads_in_flight: 0,
            chat_enabled: false,
            busy: false,
            draft: String::new(),
            messages: Vec::new(),
            status: None,
            status_seq: 0,
            dirty: false,
        }
    }
}

impl ClientSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    pub fn with_status_clear_after(mut self, after: Duration) -> Self {
        self.status_clear_after = after;
        self
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn chat_enabled(&self) -> bool {
        self.chat_enabled
    }

    pub fn upload_enabled(&self) -> bool {
        self.upload_enabled
    }

    pub fn input_enabled(&self) -> bool {
        self.chat_enabled && !self.busy
    }

    /// Whether a health check, upload or question is still awaiting its reply.
    pub fn has_requests_in_flight(&self) -> bool {
        self.health_check_pending || self.uploads_in_flight > 0 || self.busy
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Token of the status currently on screen, if any.
    pub fn status_token(&self) -> Option<u64> {
        self.status.as_ref().map(|status| status.token)
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            file_info: self
                .selected_file
                .as_ref()
                .map(|file| format_file_info(&file.name, file.size_bytes)),
            upload_enabled: self.upload_enabled,
            upload_label: if self.uploads_in_flight > 0 {
                UPLOAD_LABEL_BUSY
            } else {
                UPLOAD_LABEL_IDLE
            }
            .to_string(),
            status: self.status.as_ref().map(|status| StatusView {
                text: status.text.clone(),
                kind: status.kind,
                token: status.token,
            }),
            input_enabled: self.input_enabled(),
            send_enabled: self.input_enabled(),
            sending: self.busy,
            show_welcome: self.messages.is_empty(),
            messages: self
                .messages
                .iter()
                .map(|message| MessageView {
                    role: message.role,
                    sender: message.sender.clone(),
                    content: message.content.clone(),
                    sources_preview: sources_block(&message.sources),
                })
                .collect(),
        }
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Replaces the status line. Returns the clear delay and token when the
    /// new status is one that expires on its own.
    pub(crate) fn set_status(
        &mut self,
        text: impl Into<String>,
        kind: StatusKind,
    ) -> Option<(u64, Duration)> {
        self.status_seq += 1;
        let token = self.status_seq;
        self.status = Some(Status {
            text: text.into(),
            kind,
            token,
        });
        self.mark_dirty();
        kind.auto_clears().then_some((token, self.status_clear_after))
    }

    pub(crate) fn clear_status(&mut self) {
        if self.status.take().is_some() {
            self.mark_dirty();
        }
    }

    /// Clears the status only if `token` still identifies it.
    pub(crate) fn expire_status(&mut self, token: u64) {
        if self.status_token() == Some(token) {
            self.clear_status();
        }
    }

    pub(crate) fn begin_health_check(&mut self) {
        self.health_check_pending = true;
    }

    pub(crate) fn finish_health_check(&mut self) {
        self.health_check_pending = false;
    }

    pub(crate) fn select_file(&mut self, file: SelectedFile) {
        self.selected_file = Some(file);
        self.upload_enabled = true;
        self.mark_dirty();
    }

    pub(crate) fn begin_upload(&mut self) {
        self.upload_enabled = false;
        self.uploads_in_flight += 1;
        self.mark_dirty();
    }

    pub(crate) fn finish_upload(&mut self, succeeded: bool) {
        self.uploads_in_flight = self.uploads_in_flight.saturating_sub(1);
        if succeeded {
            self.chat_enabled = true;
        } else {
            self.upload_enabled = true;
        }
        self.mark_dirty();
    }

    pub(crate) fn set_draft(&mut self, text: String) {
        if self.draft != text {
            self.draft = text;
            self.mark_dirty();
        }
    }

    /// Takes the trimmed draft for sending and raises the busy flag.
    pub(crate) fn begin_question(&mut self) -> Option<String> {
        if self.busy || !self.chat_enabled {
            return None;
        }
        let question = self.draft.trim();
        if question.is_empty() {
            return None;
        }
        let question = question.to_string();
        self.busy = true;
        self.draft.clear();
        self.mark_dirty();
        Some(question)
    }

    pub(crate) fn finish_question(&mut self) {
        self.busy = false;
        self.mark_dirty();
    }

    pub(crate) fn push_message(
        &mut self,
        role: Role,
        sender: impl Into<String>,
        content: impl Into<String>,
        sources: Vec<String>,
    ) {
        self.messages.push(ChatMessage {
            role,
            sender: sender.into(),
            content: content.into(),
            sources,
        });
        self.mark_dirty();
    }
}
