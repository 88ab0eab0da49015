//! Assessment server: many isolated participant sessions behind an HTTP API.

pub mod api;
pub mod app;

pub use api::{create_router, run_server};
pub use app::{AppState, Session, spawn_ticker};
