//! The module contains the errors the engine can raise.
//!
//! Every operation returns one of a small closed set of kinds so the HTTP
//! layer can map them to status codes without inspecting messages:
//!
//! - [`NotFound`] no record matches the given key.
//! - [`Unauthorized`] the caller does not own the record it tries to touch.
//! - [`Conflict`] a uniqueness rule rejected the write.
//! - [`Validation`] malformed input shape or enum value outside the closed set.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`Unauthorized`]: EngineError::Unauthorized
//!  [`Conflict`]: EngineError::Conflict
//!  [`Validation`]: EngineError::Validation
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("not authorized: {0}")]
    Unauthorized(String),
    #[error("\"{0}\" already present!")]
    Conflict(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Unavailable(a), Self::Unavailable(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
