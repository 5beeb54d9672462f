//! Terminal platform for the docqa client: input, rendering, and effect execution.
mod app;
mod config;
mod effects;
mod input;
mod line_editor;
mod logging;
mod ui;

pub use app::run_app;
