//! Next-number computation for the enrollment pool.
//!
//! The next sequence for a year is one past the largest sequence found among
//! every identifier sharing the year's prefix, whether it sits in the pool or is
//! already attached to a profile. Identifiers whose trailing digits do not parse
//! are skipped rather than failing the whole computation.

use super::domain::{EnrollmentId, EnrollmentPrefix, MAX_SEQUENCE, SEQUENCE_WIDTH};

/// Reasons an identifier cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssuanceError {
    #[error("year {0} cannot form a four digit enrollment prefix")]
    InvalidYear(i32),
    #[error("enrollment prefix {prefix} has no sequence numbers left (max {max})")]
    CapacityExceeded { prefix: String, max: u16 },
}

impl EnrollmentPrefix {
    pub fn try_for_year(year: i32) -> Result<Self, IssuanceError> {
        Self::for_year(year).ok_or(IssuanceError::InvalidYear(year))
    }
}

/// Sequence number carried by `identifier`, if it belongs to `prefix`.
///
/// The trailing four characters of the whole identifier are read and must be
/// ASCII digits.
pub fn sequence_number(prefix: &EnrollmentPrefix, identifier: &str) -> Option<u16> {
    if !identifier.starts_with(prefix.as_string().as_str()) {
        return None;
    }
    let split = identifier.char_indices().rev().nth(SEQUENCE_WIDTH - 1)?.0;
    let digits = &identifier[split..];
    if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Sequence the next identifier under `prefix` should carry.
pub fn next_sequence<'a, I>(prefix: &EnrollmentPrefix, identifiers: I) -> Result<u16, IssuanceError>
where
    I: IntoIterator<Item = &'a str>,
{
    let highest = identifiers
        .into_iter()
        .filter_map(|identifier| sequence_number(prefix, identifier))
        .max();

    match highest {
        None => Ok(1),
        Some(current) if current >= MAX_SEQUENCE => Err(IssuanceError::CapacityExceeded {
            prefix: prefix.as_string(),
            max: MAX_SEQUENCE,
        }),
        Some(current) => Ok(current + 1),
    }
}

pub fn next_identifier<'a, I>(
    prefix: &EnrollmentPrefix,
    identifiers: I,
) -> Result<EnrollmentId, IssuanceError>
where
    I: IntoIterator<Item = &'a str>,
{
    next_sequence(prefix, identifiers).map(|sequence| prefix.identifier(sequence))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix_2024() -> EnrollmentPrefix {
        EnrollmentPrefix::try_for_year(2024).expect("valid year")
    }

    #[test]
    fn empty_prefix_starts_at_one() {
        let next = next_identifier(&prefix_2024(), []).expect("capacity left");
        assert_eq!(next.as_str(), "20241110001");
    }

    #[test]
    fn increments_the_highest_sequence() {
        let existing = [
            "20241110001",
            "20241110002",
            "20241110003",
            "20241110004",
            "20241110005",
        ];
        let next = next_identifier(&prefix_2024(), existing).expect("capacity left");
        assert_eq!(next.as_str(), "20241110006");
    }

    #[test]
    fn gaps_do_not_get_refilled() {
        let existing = ["20241110002", "20241110040", "20241110007"];
        assert_eq!(next_sequence(&prefix_2024(), existing), Ok(41));
    }

    #[test]
    fn other_years_are_ignored() {
        let existing = ["20231110090", "20251110003", "20241110004"];
        assert_eq!(next_sequence(&prefix_2024(), existing), Ok(5));
    }

    #[test]
    fn malformed_suffixes_are_skipped() {
        let existing = ["2024111000x", "2024111abcd", "2024111-12a", "20241110003"];
        assert_eq!(next_sequence(&prefix_2024(), existing), Ok(4));
    }

    #[test]
    fn only_malformed_values_behave_like_an_empty_prefix() {
        let existing = ["2024111-12a", "2024111ñ"];
        assert_eq!(next_sequence(&prefix_2024(), existing), Ok(1));
    }

    #[test]
    fn legacy_identifiers_use_their_last_four_characters() {
        assert_eq!(sequence_number(&prefix_2024(), "202411100012"), Some(12));
        assert_eq!(sequence_number(&prefix_2024(), "2024111012"), Some(1012));
        assert_eq!(next_sequence(&prefix_2024(), ["2024111012"]), Ok(1013));
    }

    #[test]
    fn refuses_to_wrap_past_9999() {
        let existing = ["20241119999"];
        assert_eq!(
            next_sequence(&prefix_2024(), existing),
            Err(IssuanceError::CapacityExceeded {
                prefix: "2024111".to_string(),
                max: 9999,
            })
        );
    }

    #[test]
    fn rejects_years_outside_four_digits() {
        assert_eq!(
            EnrollmentPrefix::try_for_year(12_024),
            Err(IssuanceError::InvalidYear(12_024))
        );
    }
}
