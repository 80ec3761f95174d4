//! Error types for the trips client.
//!
//! # Design
//! Every failed request collapses into one `ApiError` whose `Display` text is
//! the "request failed" message shown to the user and stored in
//! `TripState::error`. `NotFound` keeps a dedicated variant because callers
//! tell "the trip is gone" apart from other non-2xx statuses.

use thiserror::Error;

/// Errors produced while building, executing or parsing a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The host could not complete the round-trip (DNS, refused, reset...).
    #[error("{0}")]
    Transport(String),
}

/// Invalid client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
