use std::path::PathBuf;
use std::sync::Once;

use docqa_core::{
    update, ChatReply, ClientSession, Effect, Msg, RequestFailure, Role, SelectedFile,
    UploadReceipt,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(docqa_logging::initialize_for_tests);
}

/// A session with a processed document, ready for questions.
fn ready_session() -> ClientSession {
    let (state, _) = update(
        ClientSession::new(),
        Msg::FileSelected(SelectedFile {
            path: PathBuf::from("a.pdf"),
            name: "a.pdf".to_string(),
            size_bytes: 100,
        }),
    );
    let (state, _) = update(state, Msg::UploadClicked);
    let (mut state, _) = update(
        state,
        Msg::UploadFinished(Ok(UploadReceipt {
            filename: "a.pdf".to_string(),
            chunks_count: 4,
        })),
    );
    state.consume_dirty();
    state
}

fn ask(state: ClientSession, question: &str) -> (ClientSession, Vec<Effect>) {
    let (state, _) = update(state, Msg::QuestionEdited(question.to_string()));
    update(state, Msg::EnterPressed)
}

#[test]
fn question_is_trimmed_echoed_and_sent() {
    init_logging();
    let (state, effects) = ask(ready_session(), "  What is chapter 2 about?  ");
    let view = state.view();

    assert_eq!(
        effects,
        vec![Effect::AskQuestion {
            question: "What is chapter 2 about?".to_string(),
        }]
    );
    assert!(state.is_busy());
    assert!(view.sending);
    assert!(!view.input_enabled);
    assert!(!view.send_enabled);
    assert_eq!(state.draft(), "");
    let last = view.messages.last().unwrap();
    assert_eq!(last.role, Role::User);
    assert_eq!(last.sender, "You");
    assert_eq!(last.content, "What is chapter 2 about?");
}

#[test]
fn blank_question_is_ignored() {
    init_logging();
    let state = ready_session();
    let messages_before = state.view().messages;

    for input in ["", "   ", "\t\n "] {
        let (next, effects) = ask(state.clone(), input);
        assert!(effects.is_empty());
        assert!(!next.is_busy());
        assert_eq!(next.view().messages, messages_before);
    }
}

#[test]
fn second_submission_while_busy_is_noop() {
    init_logging();
    let (state, effects) = ask(ready_session(), "first?");
    assert_eq!(effects.len(), 1);
    let before = state.view();

    let (state, effects) = ask(state, "second?");
    assert!(effects.is_empty());
    assert_eq!(state.view(), before);

    let (state, effects) = update(state, Msg::SendClicked);
    assert!(effects.is_empty());
    assert_eq!(state.view().messages, before.messages);
}

#[test]
fn questions_before_upload_are_ignored() {
    init_logging();
    let (state, effects) = ask(ClientSession::new(), "anything?");

    assert!(effects.is_empty());
    assert!(state.view().messages.is_empty());
    assert!(state.view().show_welcome);
}

#[test]
fn send_click_submits_current_draft() {
    init_logging();
    let (state, _) = update(ready_session(), Msg::QuestionEdited("Who wrote it?".to_string()));
    let (_state, effects) = update(state, Msg::SendClicked);

    assert_eq!(
        effects,
        vec![Effect::AskQuestion {
            question: "Who wrote it?".to_string(),
        }]
    );
}

#[test]
fn answer_is_appended_with_sources_preview() {
    init_logging();
    let (state, _) = ask(ready_session(), "Summary?");
    let long_source = "x".repeat(150);

    let (state, effects) = update(
        state,
        Msg::ChatFinished(Ok(ChatReply {
            answer: "It is about testing.".to_string(),
            sources: vec!["short snippet".to_string(), long_source],
        })),
    );
    let view = state.view();
    let last = view.messages.last().unwrap();

    assert!(effects.is_empty());
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.sender, "AI Assistant");
    assert_eq!(last.content, "It is about testing.");
    let preview = last.sources_preview.as_deref().expect("sources preview");
    assert!(preview.starts_with("📚 Sources (2):"));
    assert!(preview.contains("• short snippet..."));
    assert!(preview.contains(&format!("• {}...", "x".repeat(100))));
    assert!(!state.is_busy());
    assert!(view.input_enabled);
}

#[test]
fn answer_without_sources_has_no_preview() {
    init_logging();
    let (state, _) = ask(ready_session(), "Summary?");
    let (state, _) = update(
        state,
        Msg::ChatFinished(Ok(ChatReply {
            answer: "Nothing relevant.".to_string(),
            sources: Vec::new(),
        })),
    );

    assert_eq!(state.view().messages.last().unwrap().sources_preview, None);
}

#[test]
fn server_failure_appends_detail_and_releases_busy() {
    init_logging();
    let (state, _) = ask(ready_session(), "Summary?");
    let (state, _) = update(
        state,
        Msg::ChatFinished(Err(RequestFailure::Server {
            status: 400,
            detail: Some("Question cannot be empty".to_string()),
        })),
    );
    let view = state.view();
    let last = view.messages.last().unwrap();

    assert_eq!(last.role, Role::Error);
    assert_eq!(last.sender, "Error");
    assert_eq!(last.content, "Question cannot be empty");
    assert!(!state.is_busy());
    assert!(view.input_enabled);
    assert!(view.send_enabled);
    assert!(!view.sending);
}

#[test]
fn server_failure_without_detail_uses_fallback() {
    init_logging();
    let (state, _) = ask(ready_session(), "Summary?");
    let (state, _) = update(
        state,
        Msg::ChatFinished(Err(RequestFailure::Server {
            status: 502,
            detail: None,
        })),
    );

    assert_eq!(
        state.view().messages.last().unwrap().content,
        "Failed to get response"
    );
}

#[test]
fn connection_failure_matches_success_cleanup() {
    init_logging();
    let (ok_state, _) = ask(ready_session(), "Summary?");
    let (ok_state, _) = update(ok_state, Msg::ChatFinished(Ok(ChatReply::default())));

    let (err_state, _) = ask(ready_session(), "Summary?");
    let (err_state, _) = update(
        err_state,
        Msg::ChatFinished(Err(RequestFailure::Connectivity(
            "connection reset".to_string(),
        ))),
    );

    let ok_view = ok_state.view();
    let err_view = err_state.view();
    assert_eq!(ok_view.input_enabled, err_view.input_enabled);
    assert_eq!(ok_view.send_enabled, err_view.send_enabled);
    assert_eq!(ok_view.sending, err_view.sending);
    assert_eq!(ok_state.is_busy(), err_state.is_busy());
    assert_eq!(
        err_view.messages.last().unwrap().content,
        "Connection error: connection reset. Make sure the backend server is running."
    );
}

#[test]
fn next_question_allowed_after_completion() {
    init_logging();
    let (state, _) = ask(ready_session(), "first?");
    let (state, _) = update(
        state,
        Msg::ChatFinished(Err(RequestFailure::InvalidResponse("eof".to_string()))),
    );
    let (state, effects) = ask(state, "second?");

    assert_eq!(
        effects,
        vec![Effect::AskQuestion {
            question: "second?".to_string(),
        }]
    );
    assert!(state.is_busy());
}

#[test]
fn edits_are_ignored_while_busy() {
    init_logging();
    let (state, _) = ask(ready_session(), "first?");
    let (state, _) = update(state, Msg::QuestionEdited("typed while busy".to_string()));

    assert_eq!(state.draft(), "");
}
