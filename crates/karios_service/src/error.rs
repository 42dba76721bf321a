//! Error types for the Karios service.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Missing required field")]
    MissingField,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] external_services::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
