//! HTTP API handlers for azan-ui

pub mod handlers;
pub mod health;
pub mod ui;

pub use handlers::{generate, get_audio, list_voices};
pub use health::health_routes;
pub use ui::{serve_app_js, serve_index};
