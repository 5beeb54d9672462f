use super::constants::{HELP_LINES, TITLE};
use super::render::TerminalCommand;

/// Banner shown once at startup, before the first render.
pub fn initial_commands(backend_url: &str) -> Vec<TerminalCommand> {
    let mut commands = vec![
        TerminalCommand::Line(TITLE.to_string()),
        TerminalCommand::Line(format!("Backend: {backend_url}")),
        TerminalCommand::Line(String::new()),
    ];
    commands.extend(help_commands());
    commands
}

pub fn help_commands() -> Vec<TerminalCommand> {
    let mut commands = vec![TerminalCommand::Line("Commands:".to_string())];
    commands.extend(
        HELP_LINES
            .iter()
            .map(|line| TerminalCommand::Line((*line).to_string())),
    );
    commands.push(TerminalCommand::Line(
        "  Any other line is sent as a question.".to_string(),
    ));
    commands
}
