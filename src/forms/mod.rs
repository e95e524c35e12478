//! Draft forms and the validation engine backing the creation flow.

use thiserror::Error;

pub mod client;
pub mod validation;

use crate::forms::validation::ValidationReport;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(ValidationReport),

    #[error("invalid shared key")]
    InvalidSharedKey,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid date")]
    InvalidDate,
}
