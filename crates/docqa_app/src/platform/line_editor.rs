use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Result of feeding one key press to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Unchanged,
    Edited,
    Submitted(String),
    Quit,
}

/// Single-line input buffer for the raw-mode prompt.
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    pub fn line(&self) -> &str {
        &self.buffer
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditOutcome {
        if key.kind != KeyEventKind::Press {
            return EditOutcome::Unchanged;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => EditOutcome::Quit,
            KeyCode::Char('d') if ctrl && self.buffer.is_empty() => EditOutcome::Quit,
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char(c) if !ctrl => {
                self.buffer.push(c);
                EditOutcome::Edited
            }
            KeyCode::Backspace => match self.buffer.pop() {
                Some(_) => EditOutcome::Edited,
                None => EditOutcome::Unchanged,
            },
            KeyCode::Esc => self.clear(),
            KeyCode::Enter => EditOutcome::Submitted(std::mem::take(&mut self.buffer)),
            _ => EditOutcome::Unchanged,
        }
    }

    fn clear(&mut self) -> EditOutcome {
        if self.buffer.is_empty() {
            EditOutcome::Unchanged
        } else {
            self.buffer.clear();
            EditOutcome::Edited
        }
    }
}
