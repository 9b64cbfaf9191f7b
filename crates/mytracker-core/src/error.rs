//! Error types for mytracker-core
//!
//! Every failure the dashboard can hit while fetching, decoding or rendering
//! is one of these. Refresh chains catch them and report through an
//! [`ErrorLogger`] instead of stopping the page.

use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Page element missing
    ElementNotFound,
    /// Payload decoded but inconsistent
    MalformedPayload,
    /// Transport failure or non-success status
    HttpError,
    /// Payload could not be decoded
    DecodeError,
    /// Quick-add submission rejected
    SubmitFailed,
    /// Polling already started
    AlreadyRunning,
    /// Polling or charts not started
    NotRunning,
    /// Configuration error
    ConfigError,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ElementNotFound => write!(f, "ELEMENT_NOT_FOUND"),
            ErrorCode::MalformedPayload => write!(f, "MALFORMED_PAYLOAD"),
            ErrorCode::HttpError => write!(f, "HTTP_ERROR"),
            ErrorCode::DecodeError => write!(f, "DECODE_ERROR"),
            ErrorCode::SubmitFailed => write!(f, "SUBMIT_FAILED"),
            ErrorCode::AlreadyRunning => write!(f, "ALREADY_RUNNING"),
            ErrorCode::NotRunning => write!(f, "NOT_RUNNING"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for logs and the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - this refresh was skipped, the next one may succeed
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - the dashboard cannot work with this setup
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for mytracker-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Element not found: #{id}")]
    ElementNotFound { id: String },

    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    #[error("HTTP error: {message}")]
    Http { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Quick-add submission failed with status {status}")]
    SubmitFailed { status: u16 },

    #[error("Polling is already running")]
    AlreadyRunning,

    #[error("Not running: {message}")]
    NotRunning { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ElementNotFound { .. } => ErrorCode::ElementNotFound,
            CoreError::MalformedPayload { .. } => ErrorCode::MalformedPayload,
            CoreError::Http { .. } => ErrorCode::HttpError,
            CoreError::Decode { .. } => ErrorCode::DecodeError,
            CoreError::SubmitFailed { .. } => ErrorCode::SubmitFailed,
            CoreError::AlreadyRunning => ErrorCode::AlreadyRunning,
            CoreError::NotRunning { .. } => ErrorCode::NotRunning,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::ElementNotFound { .. } => ErrorSeverity::Critical,
            CoreError::MalformedPayload { .. } => ErrorSeverity::Error,
            CoreError::Http { .. } => ErrorSeverity::Warning,
            CoreError::Decode { .. } => ErrorSeverity::Error,
            CoreError::SubmitFailed { .. } => ErrorSeverity::Error,
            CoreError::AlreadyRunning => ErrorSeverity::Info,
            CoreError::NotRunning { .. } => ErrorSeverity::Warning,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::ElementNotFound { id } => {
                details = details.with_suggestion(format!(
                    "Check that the page markup carries an element with id '{}'.", id
                ));
                details = details.with_suggestion(
                    "Element ids can be remapped in the `elements` config section.".to_string()
                );
            }
            CoreError::MalformedPayload { message } => {
                details = details.with_detail(serde_json::json!({ "payload_message": message }));
                details = details.with_suggestion(
                    "The chart data endpoint must return index-aligned monthly arrays.".to_string()
                );
            }
            CoreError::Http { .. } => {
                details = details.with_suggestion(
                    "Check that the tracker backend is reachable at `server.base_url`.".to_string()
                );
            }
            CoreError::SubmitFailed { status } => {
                details = details.with_detail(serde_json::json!({ "status": status }));
                details = details.with_suggestion(
                    "The entry was not saved; the quick-add form stays open for a retry.".to_string()
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::Decode { message: error.to_string() }
    }
}

impl From<mytracker_config::ConfigError> for CoreError {
    fn from(error: mytracker_config::ConfigError) -> Self {
        CoreError::ConfigError { message: error.to_string() }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Generation of the refresh that failed
    pub generation: Option<u64>,
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: &str) -> Self {
        Self {
            generation: None,
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    /// Add the refresh generation
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
    /// Log debug information
    fn log_debug(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        let level = match error.severity() {
            ErrorSeverity::Info => log::Level::Info,
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error | ErrorSeverity::Critical => log::Level::Error,
        };
        log::log!(
            target: "mytracker::error",
            level,
            "[{}] {} - Operation: {} - Generation: {:?}",
            error.code(),
            error,
            context.operation,
            context.generation
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "mytracker::error",
            "WARNING: {} - Operation: {} - Generation: {:?}",
            message,
            context.operation,
            context.generation
        );
    }

    fn log_debug(&self, message: &str, context: &ErrorContext) {
        log::debug!(
            target: "mytracker::error",
            "DEBUG: {} - Operation: {} - Generation: {:?}",
            message,
            context.operation,
            context.generation
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::ElementNotFound.to_string(), "ELEMENT_NOT_FOUND");
        assert_eq!(ErrorCode::MalformedPayload.to_string(), "MALFORMED_PAYLOAD");
        assert_eq!(ErrorCode::SubmitFailed.to_string(), "SUBMIT_FAILED");
    }

    #[test]
    fn test_core_error_code_and_severity() {
        let error = CoreError::ElementNotFound { id: "sum-income".to_string() };
        assert_eq!(error.code(), ErrorCode::ElementNotFound);
        assert_eq!(error.severity(), ErrorSeverity::Critical);

        let error = CoreError::Http { message: "connection refused".to_string() };
        assert_eq!(error.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_error_details_submit_failed() {
        let details = CoreError::SubmitFailed { status: 500 }.to_details();
        assert_eq!(details.code, ErrorCode::SubmitFailed);
        assert_eq!(details.details, Some(serde_json::json!({ "status": 500 })));
        assert!(details.message.contains("500"));
    }

    #[test]
    fn test_error_details_element_not_found() {
        let details = CoreError::ElementNotFound { id: "pieChart".to_string() }.to_details();
        assert!(details.to_string().contains("#pieChart"));
        assert_eq!(details.suggestions.len(), 2);
    }

    #[test]
    fn test_json_error_becomes_decode() {
        let err: CoreError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.code(), ErrorCode::DecodeError);
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("refresh_summary")
            .with_generation(7)
            .with_data("endpoint", serde_json::json!("/api/summary"));

        assert_eq!(context.operation, "refresh_summary");
        assert_eq!(context.generation, Some(7));
        assert_eq!(context.data["endpoint"], "/api/summary");
    }
}
