//! Error types for the todolists API client

use thiserror::Error;

/// Shown when the server rejects a request without saying why
const GENERIC_REJECTION: &str = "Some error occurred";

/// Errors that can occur when talking to the todolists API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, body read)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status
    #[error("HTTP error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or status reason
        message: String,
    },

    /// The body is not the expected JSON
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// The server processed the request and refused it
    #[error("Request rejected (result code {result_code}): {}", messages.join("; "))]
    Rejected {
        /// Non-zero `resultCode`
        result_code: i32,
        /// Server messages, most relevant first
        messages: Vec<String>,
    },
}

impl ApiError {
    /// Whether the failure happened below the application protocol
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }

    /// Text suitable for a user-facing notification
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { messages, .. } => messages
                .first()
                .cloned()
                .unwrap_or_else(|| GENERIC_REJECTION.to_string()),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            Self::Status {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            Self::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_uses_first_server_message() {
        let error = ApiError::Rejected {
            result_code: 1,
            messages: vec!["Incorrect Email or Password".to_string(), "second".to_string()],
        };
        assert_eq!(error.user_message(), "Incorrect Email or Password");
        assert!(!error.is_transport());
    }

    #[test]
    fn test_user_message_falls_back_when_no_messages() {
        let error = ApiError::Rejected {
            result_code: 1,
            messages: vec![],
        };
        assert_eq!(error.user_message(), GENERIC_REJECTION);
    }

    #[test]
    fn test_transport_kinds() {
        assert!(ApiError::Transport("connection refused".to_string()).is_transport());
        assert!(ApiError::Decode("eof".to_string()).is_transport());

        let status = ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(status.is_transport());
        assert_eq!(status.user_message(), "HTTP error (status 500): boom");
    }
}
