use std::sync::{mpsc, Arc};
use std::thread;

use docqa_core::{ChatReply, Effect, Msg, RequestFailure, UploadReceipt};
use docqa_engine::{
    ApiError, Backend, EngineConfig, EngineError, EngineEvent, EngineHandle, FailureKind,
};
use docqa_logging::{docqa_debug, docqa_info, docqa_warn};

use super::app::AppEvent;

pub struct EffectRunner {
    engine: EngineHandle,
    app_tx: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(
        backend: Arc<dyn Backend>,
        config: EngineConfig,
        app_tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self, EngineError> {
        let (event_tx, event_rx) = mpsc::channel();
        let engine = EngineHandle::new(backend, config, event_tx)?;
        spawn_event_loop(event_rx, app_tx.clone());
        Ok(Self { engine, app_tx })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CheckHealth => {
                    docqa_debug!("CheckHealth");
                    self.engine.check_health();
                }
                Effect::UploadFile { path, file_name } => {
                    docqa_info!("UploadFile file={} path={:?}", file_name, path);
                    self.engine.upload(path, file_name);
                }
                Effect::AskQuestion { question } => {
                    docqa_info!("AskQuestion len={}", question.len());
                    self.engine.ask(question);
                }
                Effect::ScheduleStatusClear { token, after } => {
                    let app_tx = self.app_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(after);
                        let _ = app_tx.send(AppEvent::Dispatch(Msg::StatusExpired { token }));
                    });
                }
            }
        }
    }
}

fn spawn_event_loop(event_rx: mpsc::Receiver<EngineEvent>, app_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            if app_tx.send(AppEvent::Dispatch(map_event(event))).is_err() {
                break;
            }
        }
    });
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::HealthChecked(result) => Msg::HealthChecked(result.map_err(map_failure)),
        EngineEvent::UploadFinished { file_name, result } => {
            let result = result
                .map(|response| UploadReceipt {
                    filename: response.filename,
                    chunks_count: response.chunks_count,
                })
                .map_err(|err| {
                    docqa_warn!("Upload of {} failed: {}", file_name, err.kind);
                    map_failure(err)
                });
            Msg::UploadFinished(result)
        }
        EngineEvent::ChatFinished(result) => {
            let result = result
                .map(|response| ChatReply {
                    answer: response.answer,
                    sources: response
                        .sources
                        .unwrap_or_default()
                        .into_iter()
                        .map(|source| source.text)
                        .collect(),
                })
                .map_err(map_failure);
            Msg::ChatFinished(result)
        }
    }
}

fn map_failure(err: ApiError) -> RequestFailure {
    match err.kind {
        FailureKind::HttpStatus { status, detail } => RequestFailure::Server { status, detail },
        FailureKind::InvalidResponse => RequestFailure::InvalidResponse(err.message),
        FailureKind::LocalFile | FailureKind::TooLarge { .. } => {
            RequestFailure::LocalFile(err.message)
        }
        FailureKind::Network | FailureKind::Timeout | FailureKind::InvalidUrl => {
            RequestFailure::Connectivity(err.message)
        }
    }
}
