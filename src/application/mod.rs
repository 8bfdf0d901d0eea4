//! Application layer orchestrating a single log-to-maps run.
//!
//! This module ties the log reader, the aggregation services and a map
//! renderer together.

pub mod pipeline;
pub mod renderer;

pub use pipeline::*;
pub use renderer::*;
