//! ecoe-core
//!
//! Pure domain types for ECOE/OSCE station evaluations. No AWS dependency —
//! this is the shared vocabulary of the system, mirrored to TypeScript for
//! the instructor frontend via `ts-rs`.

pub mod models;
