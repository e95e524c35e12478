use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateArgs, ValidationError};

use crate::domain::client::{Client, NewClient};
use crate::domain::types::{
    CLIENT_EMAIL_MAX_LEN, CLIENT_NAME_MAX_LEN, ClientEmail, ClientName, SHARED_KEY_MAX_LEN,
    SharedKey,
};
use crate::forms::FormError;
use crate::forms::validation::{ClientField, FieldRule, PhonePolicy, ValidationReport};

/// Date format used by date inputs and the service.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Draft of a client record exactly as typed by the user.
///
/// Length limits mirror `SHARED_KEY_MAX_LEN`, `CLIENT_NAME_MAX_LEN` and
/// `CLIENT_EMAIL_MAX_LEN`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[validate(context = PhonePolicy)]
pub struct ClientForm {
    #[validate(length(min = 1, max = 50))]
    pub shared_key: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100), email)]
    pub email: String,
    #[validate(length(min = 1), custom(function = "phone_matches_policy", use_context))]
    pub phone: String,
    #[validate(length(min = 1), custom(function = "iso_date"))]
    pub start_date: String,
    #[validate(length(min = 1), custom(function = "iso_date"))]
    pub end_date: String,
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn iso_date(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_date(value).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("format"))
    }
}

fn phone_matches_policy(phone: &str, policy: &PhonePolicy) -> Result<(), ValidationError> {
    if phone.is_empty() {
        return Ok(());
    }
    match policy.check(phone) {
        None => Ok(()),
        Some(FieldRule::Pattern) => Err(ValidationError::new("pattern")),
        Some(_) => {
            let mut err = ValidationError::new("max_length");
            err.add_param(Cow::from("max"), &policy.max_length);
            Err(err)
        }
    }
}

/// Limit reported when a length error carries no `max` parameter.
fn default_max_len(field: ClientField, policy: &PhonePolicy) -> usize {
    match field {
        ClientField::SharedKey => SHARED_KEY_MAX_LEN,
        ClientField::Name => CLIENT_NAME_MAX_LEN,
        ClientField::Email => CLIENT_EMAIL_MAX_LEN,
        ClientField::Phone => policy.max_length,
        ClientField::StartDate | ClientField::EndDate => 0,
    }
}

/// Maps a `validator` error on an already trimmed `value` to a field rule.
fn rule_for(
    field: ClientField,
    value: &str,
    error: &ValidationError,
    policy: &PhonePolicy,
) -> FieldRule {
    let limit = error
        .params
        .get("max")
        .and_then(|max| max.as_u64())
        .map_or_else(|| default_max_len(field, policy), |max| max as usize);

    match &*error.code {
        "length" if value.is_empty() => FieldRule::Required,
        "length" | "max_length" => FieldRule::MaxLength(limit),
        "pattern" => FieldRule::Pattern,
        _ => FieldRule::Format,
    }
}

impl ClientForm {
    /// Prefills a draft from an existing record.
    pub fn from_client(client: &Client) -> Self {
        Self {
            shared_key: client.shared_key.as_str().to_string(),
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            start_date: client.start_date.format(DATE_FORMAT).to_string(),
            end_date: client.end_date.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn value(&self, field: ClientField) -> &str {
        match field {
            ClientField::SharedKey => &self.shared_key,
            ClientField::Name => &self.name,
            ClientField::Email => &self.email,
            ClientField::Phone => &self.phone,
            ClientField::StartDate => &self.start_date,
            ClientField::EndDate => &self.end_date,
        }
    }

    pub fn set(&mut self, field: ClientField, value: impl Into<String>) {
        let slot = match field {
            ClientField::SharedKey => &mut self.shared_key,
            ClientField::Name => &mut self.name,
            ClientField::Email => &mut self.email,
            ClientField::Phone => &mut self.phone,
            ClientField::StartDate => &mut self.start_date,
            ClientField::EndDate => &mut self.end_date,
        };
        *slot = value.into();
    }

    /// Copy with surrounding whitespace removed, so blank input is missing.
    fn trimmed(&self) -> Self {
        Self {
            shared_key: self.shared_key.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
        }
    }

    /// Checks a single field in isolation.
    pub fn check_field(&self, field: ClientField, policy: &PhonePolicy) -> Option<FieldRule> {
        self.validate(policy).error(field)
    }

    /// Validates every field plus the start/end date ordering.
    ///
    /// When a field fails several rules the first of Required, Format,
    /// Pattern, MaxLength is reported.
    pub fn validate(&self, policy: &PhonePolicy) -> ValidationReport {
        let draft = self.trimmed();
        let mut report = ValidationReport::default();

        if let Err(errors) = draft.validate_with_args(policy) {
            let by_field = errors.field_errors();
            for field in ClientField::ALL {
                let failed = by_field
                    .get(field.rust_name())
                    .or_else(|| by_field.get(field.as_str()));
                let Some(failed) = failed else {
                    continue;
                };
                let value = draft.value(field);
                if let Some(rule) = failed
                    .iter()
                    .map(|error| rule_for(field, value, error, policy))
                    .min_by_key(|rule| rule.precedence())
                {
                    report.set(field, rule);
                }
            }
        }

        if let (Some(start), Some(end)) = (parse_date(&draft.start_date), parse_date(&draft.end_date))
            && start > end
        {
            report.set_date_order_invalid();
        }

        report
    }

    /// Converts a valid draft into the payload submitted to the service.
    pub fn to_new_client(&self, policy: &PhonePolicy) -> Result<NewClient, FormError> {
        let report = self.validate(policy);
        if !report.is_valid() {
            return Err(FormError::Validation(report));
        }

        Ok(NewClient {
            shared_key: SharedKey::new(self.shared_key.as_str())
                .map_err(|_| FormError::InvalidSharedKey)?,
            name: ClientName::new(self.name.as_str()).map_err(|_| FormError::InvalidName)?,
            email: ClientEmail::new(self.email.as_str()).map_err(|_| FormError::InvalidEmail)?,
            phone: self.phone.trim().to_string(),
            start_date: parse_date(&self.start_date).ok_or(FormError::InvalidDate)?,
            end_date: parse_date(&self.end_date).ok_or(FormError::InvalidDate)?,
        })
    }
}
