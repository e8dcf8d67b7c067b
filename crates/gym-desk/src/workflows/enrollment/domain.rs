use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::validation::ValidationError;

/// Column width shared by the pool and the profile table.
pub const ENROLLMENT_MAX_LEN: usize = 14;
/// Literal placed between the year and the sequence number.
pub const PREFIX_MARKER: &str = "111";
pub const SEQUENCE_WIDTH: usize = 4;
pub const MAX_SEQUENCE: u16 = 9999;

/// Enrollment number (matrícula), e.g. `20241110001`.
///
/// Any non-empty value up to [`ENROLLMENT_MAX_LEN`] characters is accepted so
/// that legacy identifiers can still be stored and scanned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EnrollmentId(String);

impl EnrollmentId {
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new("enrollment", "must not be empty"));
        }
        if trimmed.chars().count() > ENROLLMENT_MAX_LEN {
            return Err(ValidationError::new(
                "enrollment",
                format!("must have at most {ENROLLMENT_MAX_LEN} characters"),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parse form input where a blank value means "no enrollment".
    pub fn optional(raw: Option<&str>) -> Result<Option<Self>, ValidationError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Self::new(value).map(Some),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EnrollmentId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EnrollmentId> for String {
    fn from(value: EnrollmentId) -> Self {
        value.0
    }
}

/// `YYYY111`, the per-year prefix every issued identifier starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnrollmentPrefix {
    year: u16,
}

impl EnrollmentPrefix {
    /// Four digit years only; anything else could not round-trip through the format.
    pub fn for_year(year: i32) -> Option<Self> {
        if (1000..=9999).contains(&year) {
            Some(Self { year: year as u16 })
        } else {
            None
        }
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn as_string(&self) -> String {
        format!("{}{PREFIX_MARKER}", self.year)
    }

    pub fn identifier(&self, sequence: u16) -> EnrollmentId {
        EnrollmentId(format!(
            "{}{:0width$}",
            self.as_string(),
            sequence,
            width = SEQUENCE_WIDTH
        ))
    }
}

impl fmt::Display for EnrollmentPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{PREFIX_MARKER}", self.year)
    }
}

/// Pool entry: a generated identifier waiting to be attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub identifier: EnrollmentId,
    pub created_at: DateTime<Utc>,
    pub consumed: bool,
}

impl EnrollmentRecord {
    pub fn available(identifier: EnrollmentId, created_at: DateTime<Utc>) -> Self {
        Self {
            identifier,
            created_at,
            consumed: false,
        }
    }

    pub const fn status_label(&self) -> &'static str {
        if self.consumed {
            "consumed"
        } else {
            "available"
        }
    }
}
