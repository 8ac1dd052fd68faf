//! Live telemetry dashboard client: keeps a view in sync with metrics snapshots
//! pushed over a WebSocket by a monitoring collector.

pub mod app;
pub mod codec;
pub mod config;
pub mod connection;
pub mod error;
pub mod history;
pub mod sink;
pub mod status;
pub mod store;
pub mod types;
pub mod ui;
pub mod view;
pub mod ws;
