use std::fmt;

use thiserror::Error;

/// Result alias used throughout the console
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Error type for every fallible console operation.
///
/// The type is `Clone` so a single refresh failure can be handed to every
/// request that was waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsoleError {
    /// Input rejected before anything was sent
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Login rejected by the server
    #[error("Authentication failed ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Authentication { status: u16, detail: Option<String> },

    /// No refresh token available to recover from a 401
    #[error("Session expired")]
    SessionExpired,

    /// The refresh exchange was rejected or abandoned
    #[error("Unable to refresh token: {reason}")]
    RefreshFailed { reason: String },

    /// A request was still unauthorized after its single retry
    #[error("Unauthorized: {}", detail.as_deref().unwrap_or("no detail"))]
    Unauthorized { detail: Option<String> },

    /// Non-success response from a domain endpoint
    #[error("API request failed with status {status}")]
    Api {
        status: u16,
        detail: Option<String>,
        body: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Navigation error: {0}")]
    Navigation(String),
}

impl ConsoleError {
    /// Create a validation error for a form field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The `detail` message sent by the server, if any
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            Self::Authentication { detail, .. }
            | Self::Unauthorized { detail }
            | Self::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Look up a top-level string field in the server's JSON error body.
    ///
    /// Field errors may arrive either as a string or as a list of strings;
    /// the first message is returned in the latter case.
    pub fn server_field(&self, field: &str) -> Option<String> {
        let Self::Api { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        match value.get(field)? {
            serde_json::Value::String(message) => Some(message.clone()),
            serde_json::Value::Array(items) => {
                items.first().and_then(|v| v.as_str()).map(str::to_string)
            }
            _ => None,
        }
    }

    /// HTTP status attached to the error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Error code for programmatic handling
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationFailed,
            Self::Authentication { .. } => ErrorCode::AuthInvalidCredentials,
            Self::SessionExpired => ErrorCode::AuthSessionExpired,
            Self::RefreshFailed { .. } => ErrorCode::AuthRefreshFailed,
            Self::Unauthorized { .. } => ErrorCode::AuthorizationFailed,
            Self::Api { status: 403, .. } => ErrorCode::ApiPermissionDenied,
            Self::Api { status: 404, .. } => ErrorCode::ApiNotFound,
            Self::Api { .. } => ErrorCode::ApiRequestFailed,
            Self::Transport(_) => ErrorCode::NetworkFailure,
            Self::Decode(_) => ErrorCode::ApiResponseInvalid,
            Self::Storage(_) => ErrorCode::StorageFailed,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::Navigation(_) => ErrorCode::NavigationFailed,
        }
    }

    /// Category used to decide how the failure is surfaced
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Authentication { .. } | Self::SessionExpired | Self::RefreshFailed { .. } => {
                ErrorCategory::Authentication
            }
            Self::Unauthorized { .. } | Self::Api { status: 403, .. } => {
                ErrorCategory::Authorization
            }
            Self::Api { .. } | Self::Decode(_) => ErrorCategory::Service,
            Self::Transport(_) => ErrorCategory::Network,
            Self::Storage(_) | Self::Config(_) | Self::Navigation(_) => ErrorCategory::Internal,
        }
    }

    /// Whether the failure should end the local session
    pub fn clears_session(&self) -> bool {
        self.category() == ErrorCategory::Authentication
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Enumeration of error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Client-side errors
    ValidationFailed,
    ConfigInvalid,
    StorageFailed,
    NavigationFailed,

    // Authentication errors
    AuthInvalidCredentials,
    AuthSessionExpired,
    AuthRefreshFailed,
    AuthorizationFailed,

    // API errors
    ApiRequestFailed,
    ApiResponseInvalid,
    ApiPermissionDenied,
    ApiNotFound,

    // Network errors
    NetworkFailure,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code_str = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::ConfigInvalid => "CONFIG_INVALID",
            ErrorCode::StorageFailed => "STORAGE_FAILED",
            ErrorCode::NavigationFailed => "NAVIGATION_FAILED",

            ErrorCode::AuthInvalidCredentials => "AUTH_INVALID_CREDENTIALS",
            ErrorCode::AuthSessionExpired => "AUTH_SESSION_EXPIRED",
            ErrorCode::AuthRefreshFailed => "AUTH_REFRESH_FAILED",
            ErrorCode::AuthorizationFailed => "AUTH_FAILED",

            ErrorCode::ApiRequestFailed => "API_REQUEST_FAILED",
            ErrorCode::ApiResponseInvalid => "API_RESPONSE_INVALID",
            ErrorCode::ApiPermissionDenied => "API_PERMISSION_DENIED",
            ErrorCode::ApiNotFound => "API_NOT_FOUND",

            ErrorCode::NetworkFailure => "NETWORK_FAILURE",
        };
        write!(f, "{}", code_str)
    }
}

/// Error category for filtering and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caught before submission, never reaches the network
    Validation,
    /// Invalid credentials, expired or rejected refresh
    Authentication,
    /// Role or permission mismatch
    Authorization,
    /// Connection-level failures
    Network,
    /// Server answered with an error or an unreadable body
    Service,
    /// Local configuration, storage or routing problems
    Internal,
}
