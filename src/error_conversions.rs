//! Error conversion glue between the service layer and the controllers.
//!
//! Remote errors are classified once here so that controllers expose typed
//! states rather than transport errors.

use crate::api::ApiError;
use crate::controllers::creation::CreationFailure;
use crate::controllers::list::ListErrorKind;

impl From<&ApiError> for ListErrorKind {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::NotFound => ListErrorKind::NotFound,
            ApiError::Network(_) | ApiError::InvalidUrl(_) => ListErrorKind::NetworkError,
            ApiError::DuplicateKey(_)
            | ApiError::FieldErrors { .. }
            | ApiError::BadRequest(_)
            | ApiError::Server { .. }
            | ApiError::Malformed(_) => ListErrorKind::ServerError,
        }
    }
}

impl From<ApiError> for CreationFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::DuplicateKey(_) => CreationFailure::DuplicateKey,
            ApiError::FieldErrors { fields, .. } => CreationFailure::FieldErrors(fields),
            other => CreationFailure::Unknown(other.to_string()),
        }
    }
}
