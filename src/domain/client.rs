use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientEmail, ClientId, ClientName, SharedKey};

/// Client record as stored by the remote service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub shared_key: SharedKey,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Assigned by the service on creation.
    #[serde(default)]
    pub created_at: Option<NaiveDate>,
}

/// Validated payload submitted to create a client.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub shared_key: SharedKey,
    pub name: ClientName,
    pub email: ClientEmail,
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Partial-field predicate used for server-side search.
///
/// Absent fields are omitted from the request body; the service decides how
/// present fields are matched.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl ClientFilter {
    pub fn shared_key(mut self, value: impl Into<String>) -> Self {
        self.shared_key = Some(value.into());
        self
    }

    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }

    pub fn start_date(mut self, value: NaiveDate) -> Self {
        self.start_date = Some(value);
        self
    }

    pub fn end_date(mut self, value: NaiveDate) -> Self {
        self.end_date = Some(value);
        self
    }

    /// Returns `true` when no field constrains the search.
    pub fn is_empty(&self) -> bool {
        self.shared_key.is_none()
            && self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Trims text fields and drops the ones left blank.
    #[must_use]
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        }

        Self {
            shared_key: clean(self.shared_key),
            name: clean(self.name),
            email: clean(self.email),
            phone: clean(self.phone),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}
