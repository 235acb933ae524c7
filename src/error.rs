use serde_json::Value;
use thiserror::Error;

/// Main error type for UrgentCargus API operations
#[derive(Debug, Error)]
pub enum CargusError {
    /// Invalid client construction arguments
    #[error("{0}")]
    Configuration(String),

    /// Login went through but the service did not hand back a token
    #[error("UrgentCargus API did not return a valid token.")]
    InvalidToken,

    /// Transport or service failure, normalized from the failed call
    #[error("{message}")]
    Request {
        message: String,
        /// HTTP status of the failed call, 0 when unknown
        code: u16,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint could not be resolved against the base URI
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Method name outside GET, POST, PUT and DELETE
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
}

impl CargusError {
    /// Build a normalized request error from a failed call.
    ///
    /// `message` is the underlying transport error text. `response` carries
    /// the status and raw body when the failure came with a response.
    ///
    /// Without a body the message is wrapped in a generic prefix and the
    /// code is 0. With a body, the decoded `message` field wins, then the
    /// `Error` field, then a bare JSON string, and finally the transport
    /// message. A body that is not JSON falls through to the transport
    /// message.
    pub fn from_failure(message: &str, response: Option<(u16, &[u8])>) -> Self {
        Self::normalize(message, response, None)
    }

    pub(crate) fn normalize(
        message: &str,
        response: Option<(u16, &[u8])>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let (code, body) = match response {
            Some((code, body)) if !body.is_empty() => (code, body),
            _ => {
                return CargusError::Request {
                    message: format!("Something went wrong: {}", message),
                    code: 0,
                    source,
                }
            }
        };

        let decoded: Option<Value> = serde_json::from_slice(body).ok();
        let message = decoded
            .as_ref()
            .and_then(service_message)
            .unwrap_or(message)
            .to_string();

        CargusError::Request {
            message,
            code,
            source,
        }
    }

    /// Get the HTTP status code if this is a request error with a known status
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CargusError::Request { code, .. } if *code != 0 => Some(*code),
            _ => None,
        }
    }

    /// Check if this error is an unauthorized error (401)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CargusError::Request { code: 401, .. })
    }

    /// Check if this error is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, CargusError::Request { code: 404, .. })
    }
}

fn service_message(data: &Value) -> Option<&str> {
    non_empty_str(data, "message")
        .or_else(|| non_empty_str(data, "Error"))
        .or_else(|| data.as_str())
}

fn non_empty_str<'a>(data: &'a Value, field: &str) -> Option<&'a str> {
    data.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Result type for UrgentCargus operations
pub type Result<T> = std::result::Result<T, CargusError>;
