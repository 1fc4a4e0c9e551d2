use crate::endpoint::HttpMethod;
use thiserror::Error;

/// Main error type for API operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// Response body is not valid JSON or does not have the expected shape
    #[error("invalid response string: {body}")]
    MalformedResponse {
        body: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Non-success HTTP status returned by the API
    #[error("request failed with HTTP status {status}{}", body_suffix(.body))]
    RequestFailed { status: u16, body: Option<String> },

    /// Authentication kept failing after the token was regenerated
    #[error("retry timeout exceeded")]
    RetryExhausted,

    /// Transport-level fault (connection refused, timeout, unreadable body)
    #[error("HTTP transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The endpoint verb cannot be dispatched
    #[error("unsupported http request method: {0}")]
    UnsupportedMethod(HttpMethod),

    /// Endpoint template has more placeholders than supplied path params
    #[error("missing path parameter #{index} for endpoint template '{template}'")]
    MissingPathParam { template: String, index: usize },

    /// The call was cancelled through its context's cancel token
    #[error("request cancelled")]
    Cancelled,

    /// JSON serialization error while building a request
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl ApiError {
    /// Create a malformed response error carrying the offending body
    pub fn malformed(body: impl Into<String>, source: Option<serde_json::Error>) -> Self {
        ApiError::MalformedResponse {
            body: body.into(),
            source,
        }
    }

    /// Wrap any transport failure
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ApiError::Transport(err.into())
    }

    /// Check if the response data itself was unusable
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, ApiError::MalformedResponse { .. })
    }

    /// Check if this is a request or transport problem
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            ApiError::RequestFailed { .. } | ApiError::RetryExhausted | ApiError::Transport(_)
        )
    }

    /// Check if the call was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// Get the HTTP status code if the server answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the raw text attached to this error: the server error body for a
    /// failed request, or the unparseable body for a malformed response
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            ApiError::RequestFailed { body, .. } => body.as_deref(),
            ApiError::MalformedResponse { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Parse the raw body as a JSON value, if it is one
    pub fn raw_body_as_json(&self) -> Option<serde_json::Value> {
        self.raw_body().and_then(|b| serde_json::from_str(b).ok())
    }
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref().map(|b| format!(": {}", b)).unwrap_or_default()
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
