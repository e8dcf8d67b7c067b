//! Field-level checks shared by the registration, training and calendar forms.

/// A rejected form field and the reason shown back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Trim `value` and require its length (in characters) to fall within `min..=max`.
pub fn trimmed_text(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min {
        let message = if min == 1 {
            "must not be empty".to_string()
        } else {
            format!("must have at least {min} characters")
        };
        return Err(ValidationError::new(field, message));
    }
    if len > max {
        return Err(ValidationError::new(
            field,
            format!("must have at most {max} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Like [`trimmed_text`] but maps blank input to `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => trimmed_text(field, text, 1, max).map(Some),
    }
}

pub fn email(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let address = trimmed_text(field, value, 1, max)?;
    match address.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && domain.contains('.') && !domain.contains('@') =>
        {
            Ok(address)
        }
        _ => Err(ValidationError::new(field, "must be a valid e-mail address")),
    }
}

pub fn within<T>(field: &'static str, value: T, min: T, max: T) -> Result<T, ValidationError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min {
        return Err(ValidationError::new(
            field,
            format!("must be at least {min}"),
        ));
    }
    if value > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max}"),
        ));
    }
    Ok(value)
}

/// Case-insensitive substring match used by the list filters.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_text_counts_characters_after_trimming() {
        assert_eq!(
            trimmed_text("name", "  Leg day ", 3, 100).expect("valid"),
            "Leg day"
        );
        let err = trimmed_text("name", "  ab  ", 3, 100).expect_err("too short");
        assert_eq!(err.field, "name");
        assert!(err.message.contains("at least 3"));
    }

    #[test]
    fn optional_text_treats_blank_as_missing() {
        assert_eq!(optional_text("full_name", Some("   "), 50), Ok(None));
        assert_eq!(optional_text("full_name", None, 50), Ok(None));
        assert!(optional_text("full_name", Some(&"x".repeat(51)), 50).is_err());
    }

    #[test]
    fn email_requires_local_part_and_domain() {
        assert!(email("email", "ana@gym.example", 100).is_ok());
        assert!(email("email", "@gym.example", 100).is_err());
        assert!(email("email", "ana@localhost", 100).is_err());
        assert!(email("email", "ana", 100).is_err());
    }

    #[test]
    fn within_reports_the_violated_bound() {
        assert_eq!(within("sets", 10u32, 1, 50), Ok(10));
        assert!(within("sets", 0u32, 1, 50)
            .expect_err("below range")
            .message
            .contains("at least 1"));
        assert!(within("sets", 51u32, 1, 50)
            .expect_err("above range")
            .message
            .contains("at most 50"));
    }

    #[test]
    fn filter_match_ignores_case() {
        assert!(contains_ignore_case("Maria Clara", "clara"));
        assert!(!contains_ignore_case("Maria Clara", "joana"));
    }
}
