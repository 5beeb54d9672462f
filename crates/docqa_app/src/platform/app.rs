use std::collections::VecDeque;
use std::io::{self, BufRead, Stdout};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent};
use crossterm::terminal;
use crossterm::tty::IsTty;
use docqa_core::{update, ClientSession, Msg, SelectedFile};
use docqa_engine::{inspect_file, ReqwestBackend};
use docqa_logging::{docqa_info, docqa_warn};

use super::config::{self, ClientConfig};
use super::effects::EffectRunner;
use super::input::{parse_line, InputCommand};
use super::line_editor::{EditOutcome, LineEditor};
use super::logging;
use super::ui;
use super::ui::constants::{NOTICE_BUSY, NOTICE_CHAT_DISABLED};
use super::ui::render::RenderCursor;
use super::ui::terminal::{Terminal, TerminalMode};

/// Everything the main loop reacts to, funnelled through one channel.
pub(crate) enum AppEvent {
    Dispatch(Msg),
    Key(KeyEvent),
    InputLine(String),
    InputClosed,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run_app() -> Result<()> {
    let config = config::load()?;
    logging::initialize(config.log_destination, config.log_level()?);
    docqa_info!("Starting docqa client against {}", config.backend_url);

    let backend = ReqwestBackend::new(config.backend_settings()?)
        .context("failed to build HTTP client")?;
    let (app_tx, app_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(Arc::new(backend), config.engine_config(), app_tx.clone())
        .context("failed to start engine")?;

    let mode = if io::stdin().is_tty() && io::stdout().is_tty() {
        TerminalMode::Interactive
    } else {
        TerminalMode::Plain
    };
    let _raw_mode = match mode {
        TerminalMode::Interactive => {
            let guard = RawModeGuard::enable().context("failed to enable raw terminal mode")?;
            spawn_key_reader(app_tx);
            Some(guard)
        }
        TerminalMode::Plain => {
            spawn_line_reader(app_tx);
            None
        }
    };
    docqa_info!("Terminal mode: {:?}", mode);

    let mut controller = Controller::new(&config, runner, Terminal::new(io::stdout(), mode));
    controller.start()?;

    for event in app_rx {
        if controller.handle_event(event)? == Flow::Quit {
            break;
        }
    }

    docqa_info!("docqa client exiting");
    Ok(())
}

/// Restores cooked mode when the app leaves, including on error.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            docqa_warn!("Failed to restore terminal mode: {}", err);
        }
        println!();
    }
}

fn spawn_key_reader(app_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        let event = match event::read() {
            Ok(Event::Key(key)) => AppEvent::Key(key),
            Ok(_) => continue,
            Err(err) => {
                docqa_warn!("Failed to read terminal input: {}", err);
                let _ = app_tx.send(AppEvent::InputClosed);
                return;
            }
        };
        if app_tx.send(event).is_err() {
            return;
        }
    });
}

fn spawn_line_reader(app_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let event = match line {
                Ok(line) => AppEvent::InputLine(line),
                Err(err) => {
                    docqa_warn!("Failed to read stdin: {}", err);
                    break;
                }
            };
            if app_tx.send(event).is_err() {
                return;
            }
        }
        let _ = app_tx.send(AppEvent::InputClosed);
    });
}

/// Owns the session and wires input, update, effects and rendering together.
struct Controller {
    state: ClientSession,
    runner: EffectRunner,
    cursor: RenderCursor,
    terminal: Terminal<Stdout>,
    editor: LineEditor,
    piped_lines: VecDeque<String>,
    input_closed: bool,
}

impl Controller {
    fn new(config: &ClientConfig, runner: EffectRunner, terminal: Terminal<Stdout>) -> Self {
        let state = ClientSession::new()
            .with_backend_url(config.backend_url.clone())
            .with_status_clear_after(config.status_clear_after());
        Self {
            state,
            runner,
            cursor: RenderCursor::default(),
            terminal,
            editor: LineEditor::default(),
            piped_lines: VecDeque::new(),
            input_closed: false,
        }
    }

    fn start(&mut self) -> Result<()> {
        let banner = ui::layout::initial_commands(self.state.backend_url());
        self.terminal.apply(&banner, self.editor.line())?;
        self.dispatch(Msg::Started)?;
        // The first frame is drawn even if `Started` changed nothing visible.
        self.render()
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<Flow> {
        match event {
            AppEvent::Dispatch(msg) => self.dispatch(msg)?,
            AppEvent::Key(key) => match self.editor.handle_key(key) {
                EditOutcome::Unchanged => {}
                EditOutcome::Edited => self.terminal.redraw_input(self.editor.line())?,
                EditOutcome::Submitted(line) => {
                    self.terminal.commit_input(&line)?;
                    return self.handle_line(&line);
                }
                EditOutcome::Quit => return Ok(Flow::Quit),
            },
            AppEvent::InputLine(line) => self.piped_lines.push_back(line),
            AppEvent::InputClosed => self.input_closed = true,
        }
        self.drain_piped_lines()
    }

    /// Piped lines run one at a time, each once the previous line's requests
    /// have been answered. End of input quits only when nothing is in flight.
    fn drain_piped_lines(&mut self) -> Result<Flow> {
        while !self.state.has_requests_in_flight() {
            match self.piped_lines.pop_front() {
                Some(line) => {
                    self.terminal.commit_input(&line)?;
                    if self.handle_line(&line)? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
                None if self.input_closed => return Ok(Flow::Quit),
                None => break,
            }
        }
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, msg: Msg) -> Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
        if self.state.consume_dirty() {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let commands = ui::render::render(&mut self.cursor, &self.state.view());
        self.terminal.apply(&commands, self.editor.line())?;
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow> {
        match parse_line(line) {
            InputCommand::SelectFile(path) => {
                let msg = match inspect_file(&path) {
                    Ok(info) => Msg::FileSelected(SelectedFile {
                        path: info.path,
                        name: info.name,
                        size_bytes: info.size_bytes,
                    }),
                    Err(err) => Msg::FileSelectionFailed {
                        reason: err.message,
                    },
                };
                self.dispatch(msg)?;
            }
            InputCommand::Upload => self.dispatch(Msg::UploadClicked)?,
            InputCommand::Send(text) => {
                self.explain_locked_input()?;
                self.dispatch(Msg::QuestionEdited(text))?;
                self.dispatch(Msg::SendClicked)?;
            }
            InputCommand::Question(text) => {
                if !text.trim().is_empty() {
                    self.explain_locked_input()?;
                }
                self.dispatch(Msg::QuestionEdited(text))?;
                self.dispatch(Msg::EnterPressed)?;
            }
            InputCommand::Help => {
                let commands = ui::layout::help_commands();
                self.terminal.apply(&commands, self.editor.line())?;
            }
            InputCommand::Invalid(reason) => self.terminal.notice(&reason, self.editor.line())?,
            InputCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// The update loop drops input while it is disabled; tell the user why.
    fn explain_locked_input(&mut self) -> io::Result<()> {
        let notice = if self.state.is_busy() {
            NOTICE_BUSY
        } else if !self.state.chat_enabled() {
            NOTICE_CHAT_DISABLED
        } else {
            return Ok(());
        };
        self.terminal.notice(notice, self.editor.line())
    }
}
