//! ecoe-export
//!
//! PDF report generation for finalized station evaluations.

pub mod error;
pub mod pdf;
