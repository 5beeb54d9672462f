use std::io::{self, Write};

use chrono::Local;
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use docqa_core::{MessageView, Role, StatusKind};

use super::constants::PROMPT;
use super::render::{ControlsView, TerminalCommand};

/// How output reaches the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalMode {
    /// Raw-mode terminal with a live input line at the bottom.
    Interactive,
    /// Piped or redirected streams: plain lines, no escape sequences.
    Plain,
}

/// Writes render commands to an output stream, stamping messages with local time.
///
/// In interactive mode the last line belongs to the prompt. Every batch of
/// output clears it first and redraws it, with the unsent draft, afterwards.
pub struct Terminal<W: Write> {
    out: W,
    mode: TerminalMode,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W, mode: TerminalMode) -> Self {
        Self { out, mode }
    }

    pub fn apply(&mut self, commands: &[TerminalCommand], draft: &str) -> io::Result<()> {
        if commands.is_empty() {
            return Ok(());
        }
        let stamp = Local::now().format("%H:%M").to_string();
        self.clear_input_line()?;
        for cmd in commands {
            let color = command_color(cmd);
            for line in format_command(cmd, &stamp) {
                self.write_line(&line, color)?;
            }
        }
        self.draw_prompt(draft)
    }

    pub fn notice(&mut self, text: &str, draft: &str) -> io::Result<()> {
        self.apply(&[TerminalCommand::Line(text.to_string())], draft)
    }

    /// Redraws the input line after the draft changed.
    pub fn redraw_input(&mut self, draft: &str) -> io::Result<()> {
        self.clear_input_line()?;
        self.draw_prompt(draft)
    }

    /// Moves a submitted line into the scrollback and leaves an empty prompt.
    pub fn commit_input(&mut self, line: &str) -> io::Result<()> {
        self.clear_input_line()?;
        self.write_line(&format!("{PROMPT}{line}"), None)?;
        self.draw_prompt("")
    }

    fn clear_input_line(&mut self) -> io::Result<()> {
        if self.mode == TerminalMode::Interactive {
            queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        }
        Ok(())
    }

    fn write_line(&mut self, line: &str, color: Option<Color>) -> io::Result<()> {
        match (self.mode, color) {
            // Raw mode does not translate '\n', so lines end with an explicit "\r\n".
            (TerminalMode::Interactive, Some(color)) => queue!(
                self.out,
                SetForegroundColor(color),
                Print(line),
                ResetColor,
                Print("\r\n")
            ),
            (TerminalMode::Interactive, None) => queue!(self.out, Print(line), Print("\r\n")),
            (TerminalMode::Plain, _) => writeln!(self.out, "{line}"),
        }
    }

    fn draw_prompt(&mut self, draft: &str) -> io::Result<()> {
        if self.mode == TerminalMode::Interactive {
            queue!(self.out, Print(PROMPT), Print(draft))?;
        }
        self.out.flush()
    }
}

pub(crate) fn format_command(cmd: &TerminalCommand, stamp: &str) -> Vec<String> {
    match cmd {
        TerminalCommand::Line(text) => vec![text.clone()],
        TerminalCommand::FileInfo(info) => vec![info.clone()],
        TerminalCommand::Status { text, kind } => vec![format!("{} {text}", status_tag(*kind))],
        TerminalCommand::Controls(controls) => vec![format_controls(controls)],
        TerminalCommand::Message(message) => format_message(message, stamp),
    }
}

pub(crate) fn command_color(cmd: &TerminalCommand) -> Option<Color> {
    match cmd {
        TerminalCommand::Line(_) | TerminalCommand::FileInfo(_) => None,
        TerminalCommand::Controls(_) => Some(Color::DarkGrey),
        TerminalCommand::Status { kind, .. } => Some(match kind {
            StatusKind::Info => Color::Cyan,
            StatusKind::Success => Color::Green,
            StatusKind::Error => Color::Red,
            StatusKind::Offline => Color::Yellow,
        }),
        TerminalCommand::Message(message) => match message.role {
            Role::User => None,
            Role::Assistant => Some(Color::Blue),
            Role::System => Some(Color::DarkGrey),
            Role::Error => Some(Color::Red),
        },
    }
}

fn status_tag(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Info => "[..]",
        StatusKind::Success => "[ok]",
        StatusKind::Error => "[error]",
        StatusKind::Offline => "[offline]",
    }
}

fn format_controls(controls: &ControlsView) -> String {
    let upload = if controls.upload_enabled {
        format!("{} (/upload)", controls.upload_label)
    } else {
        format!("{} (unavailable)", controls.upload_label)
    };
    let ask = if controls.sending {
        "waiting for answer..."
    } else if controls.input_enabled && controls.send_enabled {
        "ready"
    } else {
        "locked"
    };
    format!("[{upload}] [questions: {ask}]")
}

fn format_message(message: &MessageView, stamp: &str) -> Vec<String> {
    let marker = match message.role {
        Role::Error => "! ",
        _ => "",
    };
    let mut lines = Vec::new();
    let mut content = message.content.lines();
    let first = content.next().unwrap_or_default();
    lines.push(format!("[{stamp}] {marker}{}: {first}", message.sender));
    lines.extend(content.map(|line| format!("    {line}")));
    if let Some(sources) = &message.sources_preview {
        lines.extend(sources.lines().map(|line| format!("    {line}")));
    }
    lines
}

#[cfg(test)]
mod tests {
    use crossterm::style::Color;
    use docqa_core::{MessageView, Role, StatusKind};

    use super::{command_color, format_command, Terminal, TerminalMode};
    use crate::platform::ui::render::{ControlsView, TerminalCommand};

    fn message(role: Role, sender: &str, content: &str) -> TerminalCommand {
        TerminalCommand::Message(MessageView {
            role,
            sender: sender.to_string(),
            content: content.to_string(),
            sources_preview: None,
        })
    }

    #[test]
    fn message_lines_are_stamped_and_indented() {
        let cmd = TerminalCommand::Message(MessageView {
            role: Role::Assistant,
            sender: "AI Assistant".to_string(),
            content: "Line one\nLine two".to_string(),
            sources_preview: Some("📚 Sources (1):\n• snippet...".to_string()),
        });

        assert_eq!(
            format_command(&cmd, "09:41"),
            vec![
                "[09:41] AI Assistant: Line one",
                "    Line two",
                "    📚 Sources (1):",
                "    • snippet...",
            ]
        );
    }

    #[test]
    fn error_messages_are_marked_and_red() {
        let cmd = message(Role::Error, "Error", "Failed to get response");
        assert_eq!(
            format_command(&cmd, "10:00"),
            vec!["[10:00] ! Error: Failed to get response"]
        );
        assert_eq!(command_color(&cmd), Some(Color::Red));
        assert_eq!(command_color(&message(Role::User, "You", "hi")), None);
    }

    #[test]
    fn status_lines_carry_kind_tag() {
        let cmd = TerminalCommand::Status {
            text: "Server is not responding. Make sure the backend is running.".to_string(),
            kind: StatusKind::Offline,
        };
        assert_eq!(
            format_command(&cmd, "00:00"),
            vec!["[offline] Server is not responding. Make sure the backend is running."]
        );
    }

    #[test]
    fn controls_describe_busy_question() {
        let cmd = TerminalCommand::Controls(ControlsView {
            upload_label: "Upload PDF".to_string(),
            upload_enabled: false,
            input_enabled: false,
            send_enabled: false,
            sending: true,
        });
        assert_eq!(
            format_command(&cmd, "00:00"),
            vec!["[Upload PDF (unavailable)] [questions: waiting for answer...]"]
        );
    }

    #[test]
    fn plain_mode_writes_bare_lines() {
        let mut out = Vec::new();
        let mut terminal = Terminal::new(&mut out, TerminalMode::Plain);
        terminal.commit_input("/upload").unwrap();
        terminal
            .apply(&[TerminalCommand::Line("hello".to_string())], "ignored")
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "> /upload\nhello\n");
    }

    #[test]
    fn interactive_output_clears_and_restores_the_draft() {
        let mut out = Vec::new();
        Terminal::new(&mut out, TerminalMode::Interactive)
            .apply(&[TerminalCommand::Line("hello".to_string())], "what is the rev")
            .unwrap();
        let written = String::from_utf8(out).unwrap();

        let clear_at = written.find("\u{1b}[2K").expect("input line cleared");
        let line_at = written.find("hello\r\n").expect("line written");
        assert!(clear_at < line_at);
        assert!(written.ends_with("> what is the rev"));
    }

    #[test]
    fn empty_batch_leaves_input_line_alone() {
        let mut out = Vec::new();
        Terminal::new(&mut out, TerminalMode::Interactive)
            .apply(&[], "draft")
            .unwrap();
        assert!(out.is_empty());
    }
}
