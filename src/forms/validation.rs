//! Field rules and reports produced by the draft validation engine.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::ValidateLength;

/// Editable fields of a client draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientField {
    SharedKey,
    Name,
    Email,
    Phone,
    StartDate,
    EndDate,
}

impl ClientField {
    pub const ALL: [ClientField; 6] = [
        ClientField::SharedKey,
        ClientField::Name,
        ClientField::Email,
        ClientField::Phone,
        ClientField::StartDate,
        ClientField::EndDate,
    ];

    /// Wire name of the field, as used by the service in field errors.
    pub const fn as_str(self) -> &'static str {
        match self {
            ClientField::SharedKey => "sharedKey",
            ClientField::Name => "name",
            ClientField::Email => "email",
            ClientField::Phone => "phone",
            ClientField::StartDate => "startDate",
            ClientField::EndDate => "endDate",
        }
    }

    /// Struct field name, as keyed by `validator` errors.
    pub(crate) const fn rust_name(self) -> &'static str {
        match self {
            ClientField::SharedKey => "shared_key",
            ClientField::Name => "name",
            ClientField::Email => "email",
            ClientField::Phone => "phone",
            ClientField::StartDate => "start_date",
            ClientField::EndDate => "end_date",
        }
    }
}

impl Display for ClientField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClientField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or(())
    }
}

/// Rule a field value failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "limit", rename_all = "camelCase")]
pub enum FieldRule {
    Required,
    /// Malformed email address or date.
    Format,
    /// Phone contains non-digit characters while digits are enforced.
    Pattern,
    MaxLength(usize),
}

impl FieldRule {
    /// Lower ranks win when a value fails several rules.
    pub(crate) const fn precedence(self) -> u8 {
        match self {
            FieldRule::Required => 0,
            FieldRule::Format => 1,
            FieldRule::Pattern => 2,
            FieldRule::MaxLength(_) => 3,
        }
    }
}

impl Display for FieldRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldRule::Required => write!(f, "This field is required"),
            FieldRule::Format => write!(f, "Invalid format"),
            FieldRule::Pattern => write!(f, "Only digits are allowed"),
            FieldRule::MaxLength(limit) => write!(f, "At most {limit} characters"),
        }
    }
}

/// Phone-field strictness.
///
/// The standalone creation page accepts digits only, the embedded dialog any
/// characters up to a longer bound. Callers pick one explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonePolicy {
    pub numeric_only: bool,
    pub max_length: usize,
}

impl PhonePolicy {
    pub const fn strict() -> Self {
        Self {
            numeric_only: true,
            max_length: 10,
        }
    }

    pub const fn lenient() -> Self {
        Self {
            numeric_only: false,
            max_length: 20,
        }
    }

    pub(crate) fn check(&self, phone: &str) -> Option<FieldRule> {
        if self.numeric_only && !phone.chars().all(|c| c.is_ascii_digit()) {
            return Some(FieldRule::Pattern);
        }
        if !phone.validate_length(None, Some(self.max_length as u64), None) {
            return Some(FieldRule::MaxLength(self.max_length));
        }
        None
    }
}

/// Named presets accepted in configuration files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhonePolicyKind {
    #[default]
    Strict,
    Lenient,
}

impl From<PhonePolicyKind> for PhonePolicy {
    fn from(kind: PhonePolicyKind) -> Self {
        match kind {
            PhonePolicyKind::Strict => PhonePolicy::strict(),
            PhonePolicyKind::Lenient => PhonePolicy::lenient(),
        }
    }
}

/// Outcome of validating a draft.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    fields: BTreeMap<ClientField, FieldRule>,
    date_order_invalid: bool,
}

impl ValidationReport {
    pub(crate) fn set(&mut self, field: ClientField, rule: FieldRule) {
        self.fields.insert(field, rule);
    }

    pub(crate) fn set_date_order_invalid(&mut self) {
        self.date_order_invalid = true;
    }

    pub fn is_valid(&self) -> bool {
        self.fields.is_empty() && !self.date_order_invalid
    }

    /// Failed rule for `field`, if any.
    pub fn error(&self, field: ClientField) -> Option<FieldRule> {
        self.fields.get(&field).copied()
    }

    pub fn field_errors(&self) -> &BTreeMap<ClientField, FieldRule> {
        &self.fields
    }

    /// `true` when both dates are present and the start is after the end.
    pub fn date_order_invalid(&self) -> bool {
        self.date_order_invalid
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, rule)| format!("{field}: {rule}"))
            .collect();
        if self.date_order_invalid {
            parts.push("start date must not be after end date".to_string());
        }
        write!(f, "{}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_policy_rejects_non_digits_before_length() {
        let policy = PhonePolicy::strict();
        assert_eq!(policy.check("300-123"), Some(FieldRule::Pattern));
        assert_eq!(policy.check("30012345678"), Some(FieldRule::MaxLength(10)));
        assert_eq!(policy.check("3001234567"), None);
    }

    #[test]
    fn lenient_policy_only_bounds_length() {
        let policy = PhonePolicy::lenient();
        assert_eq!(policy.check("+57 (300) 123-4567"), None);
        assert_eq!(
            policy.check("+57 (300) 123-4567 ext 12"),
            Some(FieldRule::MaxLength(20))
        );
    }

    #[test]
    fn field_names_round_trip() {
        for field in ClientField::ALL {
            assert_eq!(field.as_str().parse::<ClientField>(), Ok(field));
        }
        assert!("telefono".parse::<ClientField>().is_err());
    }
}
