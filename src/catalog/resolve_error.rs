use crate::foundation::database::RosterError;
use reqwest::Error as ReqwestError;
use std::fmt;

/// Errors from resolving a validated URL against the catalog service.
#[derive(Debug)]
pub enum ResolveError {
    /// The catalog has no artist with the requested identity.
    NotFound,
    /// The catalog service or the roster store could not be reached.
    Unavailable(String),
    /// The service answered with something we could not make sense of.
    Unexpected(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResolveError::NotFound => write!(f, "No artist found for that URL"),
            ResolveError::Unavailable(msg) => write!(f, "Catalog service unavailable: {}", msg),
            ResolveError::Unexpected(msg) => {
                write!(f, "Unexpected response from catalog service: {}", msg)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<ReqwestError> for ResolveError {
    fn from(error: ReqwestError) -> Self {
        if error.is_decode() {
            ResolveError::Unexpected(error.to_string())
        } else {
            ResolveError::Unavailable(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(error: serde_json::Error) -> Self {
        ResolveError::Unexpected(error.to_string())
    }
}

impl From<RosterError> for ResolveError {
    fn from(error: RosterError) -> Self {
        ResolveError::Unavailable(error.to_string())
    }
}
