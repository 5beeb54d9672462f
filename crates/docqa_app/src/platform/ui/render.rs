use docqa_core::{AppViewModel, MessageView, StatusKind, StatusView, WELCOME_TEXT};

/// Enabled/busy state of the upload action and the question input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsView {
    pub upload_label: String,
    pub upload_enabled: bool,
    pub input_enabled: bool,
    pub send_enabled: bool,
    pub sending: bool,
}

impl ControlsView {
    fn from_view(view: &AppViewModel) -> Self {
        Self {
            upload_label: view.upload_label.clone(),
            upload_enabled: view.upload_enabled,
            input_enabled: view.input_enabled,
            send_enabled: view.send_enabled,
            sending: view.sending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    Line(String),
    FileInfo(String),
    Status { text: String, kind: StatusKind },
    Controls(ControlsView),
    Message(MessageView),
}

/// What has already been written to the terminal. The terminal is append-only,
/// so rendering emits only what changed since the previous frame.
#[derive(Debug, Default)]
pub struct RenderCursor {
    welcome_shown: bool,
    messages_shown: usize,
    status: Option<StatusView>,
    file_info: Option<String>,
    controls: Option<ControlsView>,
}

pub fn render(cursor: &mut RenderCursor, view: &AppViewModel) -> Vec<TerminalCommand> {
    let mut cmds = Vec::new();

    if view.file_info != cursor.file_info {
        if let Some(info) = &view.file_info {
            cmds.push(TerminalCommand::FileInfo(info.clone()));
        }
        cursor.file_info = view.file_info.clone();
    }

    // Statuses are compared with their token, so a repeat of the same text is shown again.
    if view.status != cursor.status {
        if let Some(status) = &view.status {
            cmds.push(TerminalCommand::Status {
                text: status.text.clone(),
                kind: status.kind,
            });
        }
        cursor.status = view.status.clone();
    }

    if view.show_welcome && !cursor.welcome_shown {
        cmds.push(TerminalCommand::Line(WELCOME_TEXT.to_string()));
        cursor.welcome_shown = true;
    }

    cmds.extend(
        view.messages
            .iter()
            .skip(cursor.messages_shown)
            .cloned()
            .map(TerminalCommand::Message),
    );
    cursor.messages_shown = view.messages.len();

    let controls = ControlsView::from_view(view);
    if cursor.controls.as_ref() != Some(&controls) {
        cmds.push(TerminalCommand::Controls(controls.clone()));
        cursor.controls = Some(controls);
    }

    cmds
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use docqa_core::{
        update, ClientSession, Msg, SelectedFile, StatusKind, UploadReceipt, WELCOME_TEXT,
    };

    use super::{render, RenderCursor, TerminalCommand};

    fn select(state: ClientSession) -> ClientSession {
        update(
            state,
            Msg::FileSelected(SelectedFile {
                path: PathBuf::from("a.pdf"),
                name: "a.pdf".to_string(),
                size_bytes: 2048,
            }),
        )
        .0
    }

    fn statuses(cmds: &[TerminalCommand]) -> Vec<(&str, StatusKind)> {
        cmds.iter()
            .filter_map(|cmd| match cmd {
                TerminalCommand::Status { text, kind } => Some((text.as_str(), *kind)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_frame_shows_welcome_and_controls_once() {
        let mut cursor = RenderCursor::default();
        let cmds = render(&mut cursor, &ClientSession::new().view());

        assert_eq!(cmds[0], TerminalCommand::Line(WELCOME_TEXT.to_string()));
        assert!(matches!(cmds[1], TerminalCommand::Controls(_)));
        assert_eq!(cmds.len(), 2);
        assert!(render(&mut cursor, &ClientSession::new().view()).is_empty());
    }

    #[test]
    fn repeated_identical_status_is_rendered_each_time() {
        let mut cursor = RenderCursor::default();
        let (state, _) = update(ClientSession::new(), Msg::UploadClicked);
        let first = render(&mut cursor, &state.view());

        let (state, _) = update(state, Msg::UploadClicked);
        let second = render(&mut cursor, &state.view());

        let expected = vec![("Please select a PDF file first.", StatusKind::Error)];
        assert_eq!(statuses(&first), expected);
        assert_eq!(statuses(&second), expected);
    }

    #[test]
    fn file_selection_renders_info_once() {
        let mut cursor = RenderCursor::default();
        render(&mut cursor, &ClientSession::new().view());

        let state = select(ClientSession::new());
        let cmds = render(&mut cursor, &state.view());
        assert_eq!(
            cmds[0],
            TerminalCommand::FileInfo("Selected: a.pdf (2.00 KB)".to_string())
        );
        assert!(render(&mut cursor, &state.view()).is_empty());
    }

    #[test]
    fn only_new_messages_are_emitted() {
        let mut cursor = RenderCursor::default();
        let state = select(ClientSession::new());
        let (state, _) = update(state, Msg::UploadClicked);
        render(&mut cursor, &state.view());

        let (state, _) = update(
            state,
            Msg::UploadFinished(Ok(UploadReceipt {
                filename: "a.pdf".to_string(),
                chunks_count: 12,
            })),
        );
        let cmds = render(&mut cursor, &state.view());
        assert_eq!(
            statuses(&cmds),
            vec![(
                "✓ PDF uploaded successfully! Processed 12 chunks.",
                StatusKind::Success
            )]
        );
        let messages = cmds
            .iter()
            .filter(|cmd| matches!(cmd, TerminalCommand::Message(_)))
            .count();
        assert_eq!(messages, 1);

        let (state, _) = update(state, Msg::QuestionEdited("Why?".to_string()));
        let (state, _) = update(state, Msg::EnterPressed);
        let cmds = render(&mut cursor, &state.view());
        let new_messages: Vec<_> = cmds
            .iter()
            .filter_map(|cmd| match cmd {
                TerminalCommand::Message(message) => Some(message.content.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(new_messages, vec!["Why?"]);
    }

    #[test]
    fn cleared_status_is_shown_again_when_repeated() {
        let mut cursor = RenderCursor::default();
        let (state, _) = update(ClientSession::new(), Msg::UploadClicked);
        let token = state.status_token().unwrap();
        assert!(render(&mut cursor, &state.view())
            .iter()
            .any(|cmd| matches!(cmd, TerminalCommand::Status { .. })));

        let (state, _) = update(state, Msg::StatusExpired { token });
        assert!(render(&mut cursor, &state.view()).is_empty());

        let (state, _) = update(state, Msg::UploadClicked);
        assert!(render(&mut cursor, &state.view())
            .iter()
            .any(|cmd| matches!(cmd, TerminalCommand::Status { .. })));
    }
}
