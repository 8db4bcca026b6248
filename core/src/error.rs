//! Error types for the lessons API client.
//!
//! # Design
//! One variant per failing step of a call: building the request, moving it
//! over the network, checking the status, reading the body, encoding the
//! payload and decoding the response. The messages name the step so a CLI can
//! print the error as-is. Any status above 299 lands in `HttpStatus`
//! regardless of the specific code.

use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors returned by `LessonClient` and the authorized fetch helpers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The URL or request could not be constructed.
    #[error("error creating request: {0}")]
    RequestBuild(String),

    /// DNS, connection or timeout failure.
    #[error("error performing request: {0}")]
    Transport(String),

    /// The server answered with a status code above 299.
    #[error("bad status code: {status}")]
    HttpStatus { status: u16 },

    /// The response body could not be fully read.
    #[error("error reading response body: {0}")]
    Io(#[from] std::io::Error),

    /// The request payload could not be serialized to JSON.
    #[error("error encoding payload: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body did not have the expected shape.
    #[error("error decoding response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// The HTTP status carried by `HttpStatus`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }
}
