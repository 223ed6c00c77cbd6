//! Error types for sessiongate

use thiserror::Error;

/// Result type alias for sessiongate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for raw backend calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Backend call errors, classified by HTTP outcome
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Session rejected by the server. Run `sessiongate login` to sign in again.")]
    Unauthorized,

    #[error("Access denied. You don't have permission to access this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether the server authoritatively rejected the credential (401/403)
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::Forbidden)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Errors surfaced by login, signup and password flows
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Transient failure; the session stays signed out
    #[error("Could not reach the server. Please check your connection. ({0})")]
    Network(String),

    /// 401/403 from any call; the stored token has been cleared
    #[error("Authentication rejected: {0}")]
    Rejected(String),

    /// Malformed input or a 4xx the user can fix from the form
    #[error("{0}")]
    Validation(String),

    /// The token could not be persisted
    #[error("Failed to store session token: {0}")]
    Storage(String),
}

impl AuthError {
    pub fn is_rejected(&self) -> bool {
        matches!(self, AuthError::Rejected(_))
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized | ApiError::Forbidden => AuthError::Rejected(err.to_string()),
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => AuthError::Validation(msg),
            ApiError::Network(msg) | ApiError::ServerError(msg) | ApiError::InvalidResponse(msg) => {
                AuthError::Network(msg)
            }
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Storage(err.to_string())
    }
}

/// Token store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to encode session file: {0}")]
    Encode(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
