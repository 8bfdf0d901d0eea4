use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Invalid grid square: {0}")]
    InvalidGrid(String),
    #[error("Unknown continent: {0}")]
    UnknownContinent(String),
}

