//! Payload Validator
//!
//! Checks a candidate `FieldSet` against the provenance business rules
//! before a record may be built.
//!
//! # Rules (checked in this order, first failure wins)
//! 1. **Disc number**: positive integer, at most `max_disc_number`, not excluded
//! 2. **Track**: `N` or `X/Y` with positive integers and X <= Y; zero padding
//!    is accepted
//! 3. **Date**: `YYYY-MM-DD`, a real calendar date, not in the future
//! 4. **Version**: `major` or `major.minor`, present in the accepted list
//! 5. **Era**: for the reserved persona only, the version major must match
//!    the era the date falls in
//! 6. **Twin order**: the collaboration credit must use the canonical order
//! 7. **Presence**: every required field is non-empty
//!
//! `validate` stops at the first violation. `collect_violations` runs every
//! check and returns all failures for display.
//!
//! Validation is pure: the current date is an explicit argument.

use crate::models::{ContentFingerprint, FieldName, FieldSet, InvalidFingerprint};
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Fields that must be non-empty in a record
pub const REQUIRED_FIELDS: [FieldName; 8] = [
    FieldName::Date,
    FieldName::Title,
    FieldName::Artist,
    FieldName::CoverArtist,
    FieldName::Version,
    FieldName::Discnumber,
    FieldName::Track,
    FieldName::XxHash,
];

/// A violated validation rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid disc number '{value}': {reason}")]
    DiscNumber { value: String, reason: String },

    #[error("Invalid track '{value}': {reason}")]
    Track { value: String, reason: String },

    #[error("Invalid date '{value}': {reason}")]
    Date { value: String, reason: String },

    #[error("Invalid version '{value}': {reason}")]
    Version { value: String, reason: String },

    #[error("{persona} V{major} ended {last_day}!")]
    EraEnded {
        persona: String,
        major: u32,
        last_day: NaiveDate,
    },

    #[error("{persona} V{major} started {first_day}!")]
    EraNotStarted {
        persona: String,
        major: u32,
        first_day: NaiveDate,
    },

    #[error("{persona} V{major} has no era defined!")]
    UnknownEra { persona: String, major: u32 },

    #[error("Wrong twin order! Expected \"{expected}\"")]
    TwinOrder { expected: String },

    #[error("No {} for {file}!", .field.label())]
    Missing { field: FieldName, file: String },

    #[error(transparent)]
    Fingerprint(#[from] InvalidFingerprint),
}

impl ValidationError {
    /// Field the failure is attributed to
    pub fn field(&self) -> FieldName {
        match self {
            ValidationError::DiscNumber { .. } => FieldName::Discnumber,
            ValidationError::Track { .. } => FieldName::Track,
            ValidationError::Date { .. } => FieldName::Date,
            ValidationError::Version { .. }
            | ValidationError::EraEnded { .. }
            | ValidationError::EraNotStarted { .. }
            | ValidationError::UnknownEra { .. } => FieldName::Version,
            ValidationError::TwinOrder { .. } => FieldName::CoverArtist,
            ValidationError::Missing { field, .. } => *field,
            ValidationError::Fingerprint(_) => FieldName::XxHash,
        }
    }
}

/// Date range in which one version major is valid (inclusive bounds)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Era {
    pub major: u32,
    #[serde(default)]
    pub first_day: Option<NaiveDate>,
    #[serde(default)]
    pub last_day: Option<NaiveDate>,
}

/// Canonical two-party collaboration credit, e.g. "Neuro & Evil"
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TwinCredit {
    pub first: String,
    pub second: String,
    #[serde(default = "default_twin_separator")]
    pub separator: String,
}

impl TwinCredit {
    /// The credit in canonical order
    pub fn canonical(&self) -> String {
        format!("{}{}{}", self.first, self.separator, self.second)
    }

    /// Whether `credit` names both parties in reversed order
    pub fn is_reversed(&self, credit: &str) -> bool {
        credit
            .split_once(self.separator.as_str())
            .map(|(a, b)| a.trim() == self.second && b.trim() == self.first)
            .unwrap_or(false)
    }
}

fn default_twin_separator() -> String {
    " & ".to_string()
}

/// Tunable rule parameters (`[validation]` config table)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Cover artist name the era rule applies to (exact match)
    pub reserved_persona: String,
    pub twins: TwinCredit,
    pub max_disc_number: u32,
    pub excluded_disc_numbers: Vec<u32>,
    /// Exact version literals accepted (`major` or `major.minor`)
    pub accepted_versions: Vec<String>,
    /// Dates before this are rejected when set
    pub earliest_date: Option<NaiveDate>,
    pub eras: Vec<Era>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            reserved_persona: "Neuro".to_string(),
            twins: TwinCredit {
                first: "Neuro".to_string(),
                second: "Evil".to_string(),
                separator: default_twin_separator(),
            },
            max_disc_number: 99,
            excluded_disc_numbers: Vec::new(),
            accepted_versions: ["1", "1.2", "2", "2.2", "3", "3.4"]
                .iter()
                .map(|v| v.to_string())
                .collect(),
            earliest_date: None,
            eras: vec![
                Era {
                    major: 1,
                    first_day: None,
                    last_day: NaiveDate::from_ymd_opt(2023, 5, 17),
                },
                Era {
                    major: 2,
                    first_day: NaiveDate::from_ymd_opt(2023, 5, 18),
                    last_day: NaiveDate::from_ymd_opt(2023, 6, 8),
                },
                Era {
                    major: 3,
                    first_day: NaiveDate::from_ymd_opt(2023, 6, 21),
                    last_day: None,
                },
            ],
        }
    }
}

/// Payload validator
pub struct PayloadValidator {
    policy: ValidationPolicy,
}

impl PayloadValidator {
    /// Create validator with the default policy
    pub fn new() -> Self {
        Self {
            policy: ValidationPolicy::default(),
        }
    }

    /// Create validator with a custom policy
    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validate all rules, stopping at the first failure
    pub fn validate(&self, fields: &FieldSet, today: NaiveDate) -> Result<(), ValidationError> {
        self.check_disc_number(&fields.disc_number)?;
        self.check_track(&fields.track)?;
        let date = self.check_date(&fields.date, today)?;
        let major = self.check_version(&fields.version)?;
        self.check_era(&fields.cover_artist, major, date)?;
        self.check_twin_order(&fields.cover_artist)?;
        check_presence(fields)?;

        debug!(file = %fields.source_label(), "Payload passed validation");
        Ok(())
    }

    /// Validate against today's local date
    pub fn validate_now(&self, fields: &FieldSet) -> Result<(), ValidationError> {
        self.validate(fields, songmark_common::time::today())
    }

    /// Run every rule and report all failures
    ///
    /// The era rule needs a valid date and version, so it is skipped when
    /// either already failed.
    pub fn collect_violations(&self, fields: &FieldSet, today: NaiveDate) -> Vec<ValidationError> {
        let mut violations = self.rule_violations(fields, today);
        violations.extend(
            REQUIRED_FIELDS
                .iter()
                .filter_map(|&field| missing(fields, field)),
        );
        violations
    }

    /// Report all failures of operator-entered values, before a file is hashed
    ///
    /// Without `hash` the fingerprint is not required. A given `hash` must
    /// parse as a content fingerprint.
    pub fn collect_field_violations(
        &self,
        fields: &FieldSet,
        hash: Option<&str>,
        today: NaiveDate,
    ) -> Vec<ValidationError> {
        let fields = FieldSet {
            xx_hash: hash.unwrap_or_default().to_string(),
            ..fields.clone()
        };

        let mut violations = self.rule_violations(&fields, today);
        violations.extend(
            REQUIRED_FIELDS
                .iter()
                .filter(|&&field| hash.is_some() || field != FieldName::XxHash)
                .filter_map(|&field| missing(&fields, field)),
        );
        if !fields.xx_hash.trim().is_empty() {
            if let Err(e) = fields.xx_hash.parse::<ContentFingerprint>() {
                violations.push(e.into());
            }
        }
        violations
    }

    /// Format and cross-field rules, everything except presence
    fn rule_violations(&self, fields: &FieldSet, today: NaiveDate) -> Vec<ValidationError> {
        let mut violations = Vec::new();

        if let Err(e) = self.check_disc_number(&fields.disc_number) {
            violations.push(e);
        }
        if let Err(e) = self.check_track(&fields.track) {
            violations.push(e);
        }
        let date = self
            .check_date(&fields.date, today)
            .map_err(|e| violations.push(e))
            .ok();
        let major = self
            .check_version(&fields.version)
            .map_err(|e| violations.push(e))
            .ok();
        if let (Some(date), Some(major)) = (date, major) {
            if let Err(e) = self.check_era(&fields.cover_artist, major, date) {
                violations.push(e);
            }
        }
        if let Err(e) = self.check_twin_order(&fields.cover_artist) {
            violations.push(e);
        }

        violations
    }

    fn check_disc_number(&self, value: &str) -> Result<(), ValidationError> {
        let fail = |reason: &str| ValidationError::DiscNumber {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let disc = parse_positive(value).ok_or_else(|| fail("expected a positive integer"))?;
        if disc > self.policy.max_disc_number {
            return Err(fail(&format!(
                "must not exceed {}",
                self.policy.max_disc_number
            )));
        }
        if self.policy.excluded_disc_numbers.contains(&disc) {
            return Err(fail("disc number is not allowed"));
        }
        Ok(())
    }

    fn check_track(&self, value: &str) -> Result<(), ValidationError> {
        let fail = |reason: &str| ValidationError::Track {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match value.split_once('/') {
            Some((number, total)) => {
                let number = parse_counter(number)
                    .ok_or_else(|| fail("track number must be a positive integer"))?;
                let total = parse_counter(total)
                    .ok_or_else(|| fail("track total must be a positive integer"))?;
                if number > total {
                    return Err(fail("track number exceeds track total"));
                }
                Ok(())
            }
            None => parse_counter(value)
                .map(|_| ())
                .ok_or_else(|| fail("expected a positive integer or X/Y")),
        }
    }

    fn check_date(&self, value: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
        let fail = |reason: String| ValidationError::Date {
            value: value.to_string(),
            reason,
        };

        if !has_date_shape(value) {
            return Err(fail("expected YYYY-MM-DD".to_string()));
        }
        let date = NaiveDate::parse_from_str(value, songmark_common::time::RECORD_DATE_FORMAT)
            .map_err(|_| fail("not a calendar date".to_string()))?;

        if date > today {
            return Err(fail(format!("is after today ({})", today)));
        }
        if let Some(earliest) = self.policy.earliest_date {
            if date < earliest {
                return Err(fail(format!("is before {}", earliest)));
            }
        }
        Ok(date)
    }

    /// Returns the version major
    fn check_version(&self, value: &str) -> Result<u32, ValidationError> {
        let fail = |reason: &str| ValidationError::Version {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = value.split('.');
        let major = parts.next().unwrap_or_default();
        let minor = parts.next();
        let well_formed = is_digits(major)
            && minor.map(is_digits).unwrap_or(true)
            && parts.next().is_none();
        if !well_formed {
            return Err(fail("expected MAJOR or MAJOR.MINOR"));
        }

        if !self.policy.accepted_versions.iter().any(|v| v == value) {
            return Err(fail("not an accepted version"));
        }

        major
            .parse::<u32>()
            .map_err(|_| fail("major version out of range"))
    }

    fn check_era(&self, cover_artist: &str, major: u32, date: NaiveDate) -> Result<(), ValidationError> {
        let persona = &self.policy.reserved_persona;
        if cover_artist != persona {
            return Ok(());
        }

        let era = self
            .policy
            .eras
            .iter()
            .find(|era| era.major == major)
            .ok_or_else(|| ValidationError::UnknownEra {
                persona: persona.clone(),
                major,
            })?;

        if let Some(first_day) = era.first_day {
            if date < first_day {
                return Err(ValidationError::EraNotStarted {
                    persona: persona.clone(),
                    major,
                    first_day,
                });
            }
        }
        if let Some(last_day) = era.last_day {
            if date > last_day {
                return Err(ValidationError::EraEnded {
                    persona: persona.clone(),
                    major,
                    last_day,
                });
            }
        }
        Ok(())
    }

    fn check_twin_order(&self, cover_artist: &str) -> Result<(), ValidationError> {
        if self.policy.twins.is_reversed(cover_artist) {
            return Err(ValidationError::TwinOrder {
                expected: self.policy.twins.canonical(),
            });
        }
        Ok(())
    }
}

impl Default for PayloadValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Fail on the first required field that is empty
///
/// Shared with the payload builder.
pub(crate) fn check_presence(fields: &FieldSet) -> Result<(), ValidationError> {
    match REQUIRED_FIELDS.iter().find_map(|&field| missing(fields, field)) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn missing(fields: &FieldSet, field: FieldName) -> Option<ValidationError> {
    fields.get(field).trim().is_empty().then(|| ValidationError::Missing {
        field,
        file: fields.source_label().to_string(),
    })
}

/// Positive integer without sign, whitespace or leading zero
fn parse_positive(value: &str) -> Option<u32> {
    if !is_digits(value) || value.starts_with('0') {
        return None;
    }
    value.parse().ok()
}

/// Positive integer that may be zero-padded, as TRCK values often are
fn parse_counter(value: &str) -> Option<u32> {
    if !is_digits(value) {
        return None;
    }
    value.parse().ok().filter(|&n| n > 0)
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// `DDDD-DD-DD`
fn has_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
