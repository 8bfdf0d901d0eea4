pub mod models;
pub mod grid;
pub mod band;
pub mod continent;
pub mod services;
pub mod errors;

pub use models::*;
pub use grid::*;
pub use band::*;
pub use continent::*;
pub use services::*;
pub use errors::*;
