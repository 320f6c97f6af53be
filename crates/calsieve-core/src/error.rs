//! Error types for calsieve operations.

use thiserror::Error;

/// Errors that can occur while parsing rules, reading events or loading
/// configuration.
#[derive(Error, Debug)]
pub enum SieveError {
    /// A rule token sequence violated the grammar (bad arity, missing
    /// terminator, unknown keyword, leftover tokens).
    /// `position` is the 0-based index of the offending token.
    #[error("Malformed rule at token {position}: {message}")]
    MalformedRule { position: usize, message: String },

    /// A strict field accessor was used on a field the event does not have.
    #[error("Event does not have the field: {0}")]
    MissingField(String),

    /// A time string was malformed, or an event had no usable DTSTART/DTEND.
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// An event source could not be fetched, read or parsed.
    #[error("Source '{name}' unavailable: {message}")]
    SourceUnavailable { name: String, message: String },

    /// The configuration document is structurally invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configuration document was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout calsieve-core.
pub type Result<T> = std::result::Result<T, SieveError>;
