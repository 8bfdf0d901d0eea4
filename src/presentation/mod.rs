//! Presentation layer handling the command line and map images.
//!
//! This module parses command-line arguments with clap and draws band
//! maps to PNG files with plotters.

pub mod cli;
pub mod render;

pub use cli::*;
pub use render::*;
