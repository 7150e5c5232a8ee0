/*!
 * Error types for the markerlane crate.
 *
 * The engine itself never fails: grouping, classification and navigation
 * degrade to empty or unchanged results. These types cover the fallible
 * edges around it (time string parsing, configuration, file loading),
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when parsing a `mm:ss.mmm` time string
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimeParseError {
    /// Input was empty or whitespace
    #[error("Empty time string")]
    Empty,

    /// Input did not match `mm:ss` or `mm:ss.mmm`
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    /// A component was out of range (e.g. seconds >= 60)
    #[error("Time component out of range in {input}: {component}")]
    OutOfRange {
        /// The original input
        input: String,
        /// Name of the offending component
        component: &'static str,
    },
}

/// Errors raised by configuration validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A reserved tag id that the classifier depends on is empty
    #[error("Reserved tag id is empty: {0}")]
    MissingReservedTag(&'static str),

    /// The AI suffix used for lane folding is empty
    #[error("AI tag suffix must not be empty")]
    EmptyAiSuffix,

    /// The prefix identifying unsaved draft markers is empty
    #[error("Temporary marker id prefix must not be empty")]
    EmptyTemporaryPrefix,

    /// Two reserved status tags share the same id
    #[error("Reserved tags {first} and {second} share the id {id}")]
    DuplicateReservedTag {
        /// First field name
        first: &'static str,
        /// Second field name
        second: &'static str,
        /// The shared id
        id: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error decoding or encoding JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid time string
    #[error("Time parse error: {0}")]
    TimeParse(#[from] TimeParseError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
