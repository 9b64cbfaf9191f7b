//! Error types for mytracker-client

use mytracker_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid endpoint URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Classify a reqwest failure for `url`
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ClientError::Timeout { url: url.to_string() }
        } else if let Some(status) = error.status() {
            ClientError::Status { url: url.to_string(), status: status.as_u16() }
        } else if error.is_decode() {
            ClientError::Decode { url: url.to_string(), message: error.to_string() }
        } else {
            ClientError::Http(error)
        }
    }
}

impl From<ClientError> for CoreError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Decode { .. } => CoreError::Decode { message: error.to_string() },
            ClientError::InvalidUrl { .. } => CoreError::ConfigError { message: error.to_string() },
            _ => CoreError::Http { message: error.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mytracker_core::error::ErrorCode;

    #[test]
    fn test_core_error_mapping() {
        let err: CoreError = ClientError::Status { url: "http://x/api/summary".to_string(), status: 401 }.into();
        assert_eq!(err.code(), ErrorCode::HttpError);
        assert!(err.to_string().contains("401"));

        let err: CoreError = ClientError::Decode { url: "http://x/api/chart_data".to_string(), message: "eof".to_string() }.into();
        assert_eq!(err.code(), ErrorCode::DecodeError);

        let err: CoreError = ClientError::Timeout { url: "http://x/add".to_string() }.into();
        assert!(err.to_string().contains("timed out"));
    }
}
