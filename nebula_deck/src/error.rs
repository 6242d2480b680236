use std::fmt;

/// Unified error type for catalog, storage and export operations
#[derive(Debug)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    Network(reqwest::Error),
    /// Failed to parse or serialize JSON
    Parse(serde_json::Error),
    /// Catalog answered with a non-success status
    HttpStatus { status: u16, body: String },
    /// File I/O error
    Io(std::io::Error),
    /// Image decoding or encoding error
    Image(String),
    /// Persistent store operation failed
    Store(String),
    /// Deck document does not have the expected shape
    InvalidFormat(String),
    /// No catalog base address configured
    NotConfigured,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e) => write!(f, "Network error: {}", e),
            ApiError::Parse(e) => write!(f, "Parse error: {}", e),
            ApiError::HttpStatus { status, body } => write!(f, "API error ({}): {}", status, body),
            ApiError::Io(e) => write!(f, "I/O error: {}", e),
            ApiError::Image(msg) => write!(f, "Image error: {}", msg),
            ApiError::Store(msg) => write!(f, "Store error: {}", msg),
            ApiError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            ApiError::NotConfigured => write!(f, "Set the API base URL first."),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e) => Some(e),
            ApiError::Parse(e) => Some(e),
            ApiError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err)
    }
}

impl From<image::ImageError> for ApiError {
    fn from(err: image::ImageError) -> Self {
        ApiError::Image(err.to_string())
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
