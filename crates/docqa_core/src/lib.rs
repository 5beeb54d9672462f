//! docqa core: pure client session state machine and view-model helpers.
mod effect;
mod msg;
mod preview;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use preview::{format_file_info, source_preview, sources_block, SOURCE_PREVIEW_CHARS};
pub use state::{
    ChatMessage, ChatReply, ClientSession, RequestFailure, Role, SelectedFile, StatusKind,
    UploadReceipt, DEFAULT_BACKEND_URL, STATUS_CLEAR_AFTER,
};
pub use update::update;
pub use view_model::{
    AppViewModel, MessageView, StatusView, UPLOAD_LABEL_BUSY, UPLOAD_LABEL_IDLE, WELCOME_TEXT,
};
