//! ecoe-bedrock
//!
//! The AI gateway: Bedrock model invocation and structured output parsing
//! for case generation and narrative feedback.

pub mod cases;
pub mod error;
pub mod results;
