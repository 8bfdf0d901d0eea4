//! Infrastructure layer providing external service integrations.
//!
//! This module contains the contest log readers and the configuration
//! loader; everything that touches the filesystem on the input side.

pub mod config;
pub mod log_reader;

pub use config::*;
pub use log_reader::*;
