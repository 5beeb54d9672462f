use crate::{ChatReply, ClientSession, Effect, Msg, RequestFailure, Role, StatusKind, UploadReceipt};

const SERVER_NOT_RESPONDING: &str = "Server is not responding. Make sure the backend is running.";
const NO_FILE_SELECTED: &str = "Please select a PDF file first.";
const UPLOAD_IN_PROGRESS: &str = "Uploading and processing PDF...";
const UPLOAD_FALLBACK: &str = "Failed to upload PDF";
const CHAT_FALLBACK: &str = "Failed to get response";

const SENDER_USER: &str = "You";
const SENDER_ASSISTANT: &str = "AI Assistant";
const SENDER_SYSTEM: &str = "System";
const SENDER_ERROR: &str = "Error";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ClientSession, msg: Msg) -> (ClientSession, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            state.begin_health_check();
            vec![Effect::CheckHealth]
        }
        Msg::HealthChecked(Ok(())) => {
            state.finish_health_check();
            Vec::new()
        }
        Msg::HealthChecked(Err(failure)) => {
            state.finish_health_check();
            let text = match failure {
                RequestFailure::Connectivity(_) => format!(
                    "Cannot connect to server. Make sure the backend is running on {}",
                    state.backend_url()
                ),
                _ => SERVER_NOT_RESPONDING.to_string(),
            };
            status_effects(&mut state, text, StatusKind::Offline)
        }
        Msg::FileSelected(file) => {
            state.select_file(file);
            state.clear_status();
            Vec::new()
        }
        Msg::FileSelectionFailed { reason } => {
            status_effects(&mut state, format!("Error: {reason}"), StatusKind::Error)
        }
        Msg::UploadClicked => {
            let Some(file) = state.selected_file().cloned() else {
                let effects = status_effects(&mut state, NO_FILE_SELECTED, StatusKind::Error);
                return (state, effects);
            };
            if !state.upload_enabled() {
                return (state, Vec::new());
            }
            state.begin_upload();
            let mut effects = status_effects(&mut state, UPLOAD_IN_PROGRESS, StatusKind::Info);
            effects.push(Effect::UploadFile {
                path: file.path,
                file_name: file.name,
            });
            effects
        }
        Msg::UploadFinished(result) => apply_upload_result(&mut state, result),
        Msg::QuestionEdited(text) => {
            if state.input_enabled() {
                state.set_draft(text);
            }
            Vec::new()
        }
        // Send button and Enter key share one guard: both are inert while a
        // question is in flight or before a document is ready.
        Msg::SendClicked | Msg::EnterPressed => match state.begin_question() {
            Some(question) => {
                state.push_message(Role::User, SENDER_USER, question.clone(), Vec::new());
                vec![Effect::AskQuestion { question }]
            }
            None => Vec::new(),
        },
        Msg::ChatFinished(result) => {
            apply_chat_result(&mut state, result);
            state.finish_question();
            Vec::new()
        }
        Msg::StatusExpired { token } => {
            state.expire_status(token);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn status_effects(
    state: &mut ClientSession,
    text: impl Into<String>,
    kind: StatusKind,
) -> Vec<Effect> {
    state
        .set_status(text, kind)
        .map(|(token, after)| Effect::ScheduleStatusClear { token, after })
        .into_iter()
        .collect()
}

fn apply_upload_result(
    state: &mut ClientSession,
    result: Result<UploadReceipt, RequestFailure>,
) -> Vec<Effect> {
    match result {
        Ok(receipt) => {
            state.finish_upload(true);
            let effects = status_effects(
                state,
                format!(
                    "✓ PDF uploaded successfully! Processed {} chunks.",
                    receipt.chunks_count
                ),
                StatusKind::Success,
            );
            state.push_message(
                Role::System,
                SENDER_SYSTEM,
                format!(
                    "PDF \"{}\" has been uploaded and processed. You can now ask questions about it!",
                    receipt.filename
                ),
                Vec::new(),
            );
            effects
        }
        Err(failure) => {
            state.finish_upload(false);
            let reason = match failure {
                RequestFailure::Server { detail, .. } => {
                    detail.unwrap_or_else(|| UPLOAD_FALLBACK.to_string())
                }
                RequestFailure::Connectivity(message)
                | RequestFailure::InvalidResponse(message)
                | RequestFailure::LocalFile(message) => message,
            };
            status_effects(state, format!("Error: {reason}"), StatusKind::Error)
        }
    }
}

fn apply_chat_result(state: &mut ClientSession, result: Result<ChatReply, RequestFailure>) {
    match result {
        Ok(reply) => {
            state.push_message(Role::Assistant, SENDER_ASSISTANT, reply.answer, reply.sources);
        }
        Err(failure) => {
            let content = match failure {
                RequestFailure::Server { detail, .. } => {
                    detail.unwrap_or_else(|| CHAT_FALLBACK.to_string())
                }
                RequestFailure::Connectivity(message) => format!(
                    "Connection error: {message}. Make sure the backend server is running."
                ),
                RequestFailure::InvalidResponse(message) => {
                    format!("Unexpected response from server: {message}")
                }
                RequestFailure::LocalFile(message) => message,
            };
            state.push_message(Role::Error, SENDER_ERROR, content, Vec::new());
        }
    }
}
