//! Error types for request construction.
//!
//! # Design
//! A constructor either yields a complete `HttpRequest` or one of these
//! errors; there is no partially built request. The two variants match the
//! two things that can go wrong: the body cannot be represented in the
//! requested encoding, or the target URL cannot be formed.

use std::fmt;

/// Errors returned by `RequestBuilder` constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The body could not be serialized to the requested representation
    /// (a non-finite number in a JSON body, or text that is not UTF-8).
    Encoding(String),

    /// The target URL could not be parsed or merged with the query string.
    UrlConstruction(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Encoding(msg) => write!(f, "encoding failed: {msg}"),
            BuildError::UrlConstruction(msg) => {
                write!(f, "URL construction failed: {msg}")
            }
        }
    }
}

impl std::error::Error for BuildError {}

impl From<url::ParseError> for BuildError {
    fn from(err: url::ParseError) -> Self {
        BuildError::UrlConstruction(err.to_string())
    }
}
