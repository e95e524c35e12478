//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (positive identifiers, bounded
//! shared keys, normalized email) so that once a value reaches the domain
//! layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{ValidateEmail, ValidateLength};

/// Maximum number of characters in a shared key.
pub const SHARED_KEY_MAX_LEN: usize = 50;
/// Maximum number of characters in a client name.
pub const CLIENT_NAME_MAX_LEN: usize = 100;
/// Maximum number of characters in a client email.
pub const CLIENT_EMAIL_MAX_LEN: usize = 100;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided string exceeded the allowed number of characters.
    #[error("value exceeds {0} characters")]
    TooLong(usize),
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = bounded_trimmed(email, CLIENT_EMAIL_MAX_LEN)?.to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Trims the value and checks it is non-empty and at most `max_len` characters.
fn bounded_trimmed<S: Into<String>>(value: S, max_len: usize) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if !trimmed.validate_length(Some(1_u64), None, None) {
        return Err(TypeConstraintError::EmptyString);
    }
    if !trimmed.validate_length(None, Some(max_len as u64), None) {
        return Err(TypeConstraintError::TooLong(max_len));
    }
    Ok(trimmed)
}

/// Identifier assigned to a client record by the remote service.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(i64);

impl ClientId {
    /// Creates a new identifier ensuring it is greater than zero.
    pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveId)
        }
    }

    /// Returns the raw `i64` backing this identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for ClientId {
    type Error = TypeConstraintError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientId> for i64 {
    fn from(value: ClientId) -> Self {
        value.0
    }
}

/// Lower-cased and validated client contact address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClientEmail(String);

impl ClientEmail {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ClientEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for ClientEmail {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientEmail> for String {
    fn from(value: ClientEmail) -> Self {
        value.0
    }
}

macro_rules! bounded_string_newtype {
    ($name:ident, $max:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Maximum number of characters accepted.
            pub const MAX_LEN: usize = $max;

            /// Constructs a trimmed, non-empty value within the length bound.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                Ok(Self(bounded_trimmed(value, Self::MAX_LEN)?))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

bounded_string_newtype!(
    SharedKey,
    SHARED_KEY_MAX_LEN,
    "Unique external identifier of a client record."
);

bounded_string_newtype!(
    ClientName,
    CLIENT_NAME_MAX_LEN,
    "Client display name enforcing trimmed, non-empty values."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_id_rejects_non_positive() {
        assert_eq!(ClientId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(ClientId::new(-3), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(ClientId::new(7).map(ClientId::get), Ok(7));
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let email = ClientEmail::new("  Jane.Doe@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "jane.doe@example.com");
        assert_eq!(
            ClientEmail::new("not-an-email"),
            Err(TypeConstraintError::InvalidEmail)
        );
    }

    #[test]
    fn shared_key_enforces_bounds() {
        assert_eq!(SharedKey::new("   "), Err(TypeConstraintError::EmptyString));
        assert_eq!(
            SharedKey::new("k".repeat(51)),
            Err(TypeConstraintError::TooLong(SHARED_KEY_MAX_LEN))
        );
        assert_eq!(&*SharedKey::new(" CLI123 ").unwrap(), "CLI123");
    }

    #[test]
    fn newtypes_serialize_transparently() {
        let key = SharedKey::new("jdoe").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"jdoe\"");
        let id: ClientId = serde_json::from_str("12").unwrap();
        assert_eq!(id.get(), 12);
    }
}
