//! ecoe-server library root.
//!
//! Re-exports internal modules so integration tests can exercise the
//! router and view building without starting a real server.

pub mod api;
pub mod config;
pub mod state;
pub mod view;
