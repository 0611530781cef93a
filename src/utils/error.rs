use thiserror::Error;

#[derive(Error, Debug)]
pub enum KhlError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {route}")]
    Status { status: u16, route: String },

    #[error("Unauthorized request to {route}")]
    Unauthorized { route: String },

    #[error("Resource not found: {route}")]
    NotFound { route: String },

    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Raised by a receiver while consuming the inbound stream.
    Connection,
    /// Raised by a requester while issuing an outbound request.
    Request,
    Config,
}

impl KhlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            KhlError::Connection(_) | KhlError::Transport(_) => ErrorCategory::Connection,
            KhlError::Http(_)
            | KhlError::Status { .. }
            | KhlError::Unauthorized { .. }
            | KhlError::NotFound { .. }
            | KhlError::Api { .. }
            | KhlError::Decode(_) => ErrorCategory::Request,
            KhlError::ConfigError { .. } | KhlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
        }
    }

    /// Transient request failures a caller may reasonably try again.
    pub fn is_retryable(&self) -> bool {
        match self {
            KhlError::Http(e) => e.is_timeout() || e.is_connect(),
            KhlError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            KhlError::Unauthorized { .. } => {
                "The server rejected the token. Check the configured token and token type."
                    .to_string()
            }
            KhlError::NotFound { route } => format!("Nothing was found at {}", route),
            KhlError::Api { code, message } => {
                format!("The server refused the request ({}): {}", code, message)
            }
            KhlError::ConfigError { message } => format!("Configuration problem: {}", message),
            KhlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Config => "Fix the configuration file or command line flags",
            ErrorCategory::Connection => "Check the event source and restart the gateway",
            ErrorCategory::Request if self.is_retryable() => "Retry the request later",
            ErrorCategory::Request => "Verify the requested id and the token permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, KhlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            KhlError::Connection("closed".to_string()).category(),
            ErrorCategory::Connection
        );
        assert_eq!(
            KhlError::NotFound {
                route: "channel/view".to_string()
            }
            .category(),
            ErrorCategory::Request
        );
        assert_eq!(
            KhlError::ConfigError {
                message: "missing token".to_string()
            }
            .category(),
            ErrorCategory::Config
        );
    }

    #[test]
    fn test_retryable_statuses() {
        let server_error = KhlError::Status {
            status: 503,
            route: "guild/view".to_string(),
        };
        let client_error = KhlError::Status {
            status: 400,
            route: "guild/view".to_string(),
        };

        assert!(server_error.is_retryable());
        assert!(!client_error.is_retryable());
        assert!(!KhlError::Api {
            code: 40000,
            message: "bad".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_user_friendly_message() {
        let err = KhlError::InvalidConfigValueError {
            field: "client.base_url".to_string(),
            value: "ftp://x".to_string(),
            reason: "Unsupported URL scheme: ftp".to_string(),
        };
        assert!(err.user_friendly_message().contains("client.base_url"));
        assert_eq!(
            err.recovery_suggestion(),
            "Fix the configuration file or command line flags"
        );
    }
}
