use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// Errors reported by the remote client service or its transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Client not found")]
    NotFound,

    #[error("Shared key already exists: {0}")]
    DuplicateKey(String),

    #[error("Field errors: {message}")]
    FieldErrors {
        message: String,
        fields: BTreeMap<String, String>,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid url: {0}")]
    InvalidUrl(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Error payload returned by the service on 4xx/5xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, alias = "validationErrors")]
    field_errors: Option<BTreeMap<String, String>>,
}

fn mentions_shared_key(message: &str) -> bool {
    let compact: String = message
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .collect::<String>()
        .to_lowercase();
    compact.contains("sharedkey")
}

impl ApiError {
    /// Classifies a non-success response from its status and raw body.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let message = parsed
            .message
            .clone()
            .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

        match status {
            404 => ApiError::NotFound,
            409 => ApiError::DuplicateKey(message),
            400 => {
                let fields = parsed.field_errors.unwrap_or_default();
                if mentions_shared_key(&message) && fields.is_empty() {
                    ApiError::DuplicateKey(message)
                } else if !fields.is_empty() {
                    ApiError::FieldErrors { message, fields }
                } else {
                    ApiError::BadRequest(message)
                }
            }
            _ => ApiError::Server { status, message },
        }
    }
}
