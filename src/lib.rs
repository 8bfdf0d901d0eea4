//! Maidenhead Map - contest log grid square maps
//!
//! Reads Cabrillo or CSV contest logs, counts contacts per Maidenhead grid
//! square and band, and renders one shaded map per band.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
