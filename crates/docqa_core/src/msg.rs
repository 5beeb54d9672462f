#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Client finished setting up; triggers the liveness probe.
    Started,
    /// Liveness probe outcome.
    HealthChecked(Result<(), crate::RequestFailure>),
    /// User picked a file and its metadata was read.
    FileSelected(crate::SelectedFile),
    /// User picked a file that could not be inspected.
    FileSelectionFailed { reason: String },
    /// User clicked Upload.
    UploadClicked,
    /// Backend finished processing an upload.
    UploadFinished(Result<crate::UploadReceipt, crate::RequestFailure>),
    /// User edited the question input.
    QuestionEdited(String),
    /// User clicked Send.
    SendClicked,
    /// User pressed Enter in the question input.
    EnterPressed,
    /// Backend answered (or failed to answer) the outstanding question.
    ChatFinished(Result<crate::ChatReply, crate::RequestFailure>),
    /// A scheduled status clear fired.
    StatusExpired { token: u64 },
    /// Fallback for placeholder wiring.
    NoOp,
}
