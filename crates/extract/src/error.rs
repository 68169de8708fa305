// ABOUTME: Error types for the extraction engine: ExtractError for hard failures and QueryError for row sources.
// ABOUTME: Heuristic mismatches are never errors; only bad selectors and live-DOM query failures surface here.

use thiserror::Error;

/// Errors that can stop an extraction call.
///
/// Absence of a section, table, or search result is not an error; it is
/// represented by empty output. This enum covers configuration mistakes and
/// failures reported by a [`crate::RowSource`].
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A caller-supplied CSS selector could not be parsed.
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },

    /// A relation table query failed for environmental reasons.
    #[error("{relation} query failed: {source}")]
    Query {
        relation: &'static str,
        #[source]
        source: QueryError,
    },
}

impl ExtractError {
    /// Creates a Selector error from the offending selector text.
    pub fn selector(selector: impl Into<String>, message: impl std::fmt::Display) -> Self {
        ExtractError::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Returns true if this is a Selector error.
    pub fn is_selector(&self) -> bool {
        matches!(self, ExtractError::Selector { .. })
    }
}

/// Failure reported by a [`crate::RowSource`] while reading table rows.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct QueryError {
    pub message: String,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<ExtractError> for QueryError {
    fn from(err: ExtractError) -> Self {
        QueryError::new(err.to_string())
    }
}
