//! ecoe-station
//!
//! Checklist grading, scoring, the station countdown, and the session
//! state machine. Pure state and transitions — no AWS dependency. The
//! server crate owns the clock and the AI calls; everything here is a
//! synchronous function of `(state, event)`.

pub mod checklist;
pub mod error;
pub mod scoring;
pub mod session;
pub mod timer;
