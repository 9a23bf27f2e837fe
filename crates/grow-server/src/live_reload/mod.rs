//! Live reload: file watching, event debouncing and WebSocket push.

mod client;
mod debouncer;
mod manager;
mod websocket;

pub(crate) use client::client_script;
pub(crate) use manager::{LiveReloadManager, ReloadEvent};
pub(crate) use websocket::ws_handler;
