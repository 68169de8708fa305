// ABOUTME: Error types for the lookup service including the ErrorCode enum and ServiceError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the categories of service failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidRequest,
    Browser,
    Navigation,
    Timeout,
    Persist,
    Extract,
    Server,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidRequest => "invalid request",
            ErrorCode::Browser => "browser error",
            ErrorCode::Navigation => "navigation error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Persist => "persist error",
            ErrorCode::Extract => "extraction error",
            ErrorCode::Server => "server error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for lookup operations.
#[derive(Debug, thiserror::Error)]
pub struct ServiceError {
    pub code: ErrorCode,
    pub op: String,
    /// URL, query, or selector the operation was working on.
    pub target: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "regscrape: {} {}: {}", self.op, self.target, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ServiceError {
    fn new(
        code: ErrorCode,
        op: impl Into<String>,
        target: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            op: op.into(),
            target: target.into(),
            source,
        }
    }

    /// Create an InvalidRequest error.
    pub fn invalid_request(
        op: impl Into<String>,
        target: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidRequest, op, target, source)
    }

    /// Create a Browser error.
    pub fn browser(
        op: impl Into<String>,
        target: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Browser, op, target, source)
    }

    /// Create a Navigation error.
    pub fn navigation(
        op: impl Into<String>,
        target: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Navigation, op, target, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        op: impl Into<String>,
        target: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Timeout, op, target, source)
    }

    /// Create a Persist error.
    pub fn persist(
        op: impl Into<String>,
        target: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Persist, op, target, source)
    }

    /// Create an Extract error.
    pub fn extract(
        op: impl Into<String>,
        target: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Extract, op, target, source)
    }

    /// Create a Server error.
    pub fn server(
        op: impl Into<String>,
        target: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Server, op, target, source)
    }

    /// Returns true if this is an InvalidRequest error.
    pub fn is_invalid_request(&self) -> bool {
        self.code == ErrorCode::InvalidRequest
    }

    /// Returns true if this is a Browser error.
    pub fn is_browser(&self) -> bool {
        self.code == ErrorCode::Browser
    }

    /// Returns true if this is a Navigation error.
    pub fn is_navigation(&self) -> bool {
        self.code == ErrorCode::Navigation
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is a Persist error.
    pub fn is_persist(&self) -> bool {
        self.code == ErrorCode::Persist
    }

    /// Returns true if this is an Extract error.
    pub fn is_extract(&self) -> bool {
        self.code == ErrorCode::Extract
    }

    /// Returns true if this is a Server error.
    pub fn is_server(&self) -> bool {
        self.code == ErrorCode::Server
    }
}

impl From<regscrape_extract::ExtractError> for ServiceError {
    fn from(err: regscrape_extract::ExtractError) -> Self {
        ServiceError::extract("Extract", "", Some(anyhow::Error::new(err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_target_code_and_source() {
        let err = ServiceError::navigation(
            "Goto",
            "https://registry.test/x",
            Some(anyhow::anyhow!("net::ERR_NAME_NOT_RESOLVED")),
        );
        assert_eq!(
            err.to_string(),
            "regscrape: Goto https://registry.test/x: navigation error: net::ERR_NAME_NOT_RESOLVED"
        );
        assert!(err.is_navigation());
        assert!(!err.is_timeout());
    }

    #[test]
    fn display_without_source() {
        let err = ServiceError::timeout("WaitFor", ".card-body", None);
        assert_eq!(err.to_string(), "regscrape: WaitFor .card-body: timeout");
    }
}
