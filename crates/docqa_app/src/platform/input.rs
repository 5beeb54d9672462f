use std::path::PathBuf;

use super::ui::constants::{CMD_FILE, CMD_HELP, CMD_QUIT, CMD_SEND, CMD_UPLOAD};

/// One line typed at the prompt, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    SelectFile(PathBuf),
    Upload,
    /// Question given inline to the send action.
    Send(String),
    Help,
    Quit,
    /// Anything that is not a command: typed into the question box, then Enter.
    Question(String),
    Invalid(String),
}

pub fn parse_line(line: &str) -> InputCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    // A doubled slash escapes a question that starts with '/'.
    if let Some(rest) = line.strip_prefix("//") {
        return InputCommand::Question(format!("/{rest}"));
    }
    if !line.starts_with('/') {
        return InputCommand::Question(line.to_string());
    }

    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };
    match command {
        CMD_FILE if arg.is_empty() => InputCommand::Invalid(format!("usage: {CMD_FILE} <path>")),
        CMD_FILE => InputCommand::SelectFile(PathBuf::from(unquote(arg))),
        CMD_UPLOAD => InputCommand::Upload,
        CMD_SEND if arg.is_empty() => InputCommand::Invalid(format!(
            "usage: {CMD_SEND} <question> (or type the question and press Enter)"
        )),
        CMD_SEND => InputCommand::Send(arg.to_string()),
        CMD_HELP => InputCommand::Help,
        CMD_QUIT => InputCommand::Quit,
        other => InputCommand::Invalid(format!("unknown command {other}; type {CMD_HELP}")),
    }
}

fn unquote(arg: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|quote| arg.strip_prefix(*quote)?.strip_suffix(*quote))
        .unwrap_or(arg)
}
