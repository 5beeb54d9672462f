use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use docqa_logging::{docqa_debug, docqa_warn};
use thiserror::Error;

use crate::backend::Backend;
use crate::document::load_document;
use crate::EngineEvent;

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Files above this size are refused before any request is made.
    pub max_upload_bytes: Option<u64>,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine worker: {0}")]
    Startup(#[from] io::Error),
}

enum EngineCommand {
    CheckHealth,
    Upload { path: PathBuf, file_name: String },
    Ask { question: String },
}

/// Runs backend calls on a background tokio runtime and reports results as
/// `EngineEvent`s on the channel given at construction.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        backend: Arc<dyn Backend>,
        config: EngineConfig,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("docqa-engine-rt")
            .build()?;
        let config = Arc::new(config);

        thread::Builder::new()
            .name("docqa-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let backend = backend.clone();
                    let config = config.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(backend.as_ref(), &config, command, event_tx).await;
                    });
                }
                docqa_debug!("Engine command channel closed; worker exiting");
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn check_health(&self) {
        self.send(EngineCommand::CheckHealth);
    }

    pub fn upload(&self, path: impl Into<PathBuf>, file_name: impl Into<String>) {
        self.send(EngineCommand::Upload {
            path: path.into(),
            file_name: file_name.into(),
        });
    }

    pub fn ask(&self, question: impl Into<String>) {
        self.send(EngineCommand::Ask {
            question: question.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            docqa_warn!("Engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(
    backend: &dyn Backend,
    config: &EngineConfig,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::CheckHealth => EngineEvent::HealthChecked(backend.health().await),
        EngineCommand::Upload { path, file_name } => {
            let result = match load_document(&path, &file_name, config.max_upload_bytes).await {
                Ok(document) => backend.upload(document).await,
                Err(err) => Err(err),
            };
            EngineEvent::UploadFinished { file_name, result }
        }
        EngineCommand::Ask { question } => EngineEvent::ChatFinished(backend.chat(&question).await),
    };
    let _ = event_tx.send(event);
}
