//! Custom field validators for the create/edit forms. These mirror the
//! backend's rules for UX only; the server remains the authority.

use validator::{ValidateEmail, ValidationError};

fn fail(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Required text field; whitespace-only counts as empty.
pub fn required_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(fail("required", "Name is required"));
    }
    Ok(())
}

pub fn required_movie_title(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(fail("required", "Movie title is required"));
    }
    Ok(())
}

pub fn required_cinema_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(fail("required", "Cinema name is required"));
    }
    Ok(())
}

/// Optional email; empty passes, anything else must look like an
/// address.
pub fn optional_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_email() {
        return Ok(());
    }
    Err(fail("email", "Invalid email"))
}

/// Strips everything that is not a digit, `+`, parentheses, space or
/// dash.
pub fn norm_phone(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '(' | ')' | ' ' | '-'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Optional phone; after normalization at least 7 characters.
pub fn optional_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    if norm_phone(value).len() < 7 {
        return Err(fail("phone", "Phone looks too short"));
    }
    Ok(())
}

pub fn norm_postcode(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Optional postcode; after normalization at least 4 characters.
pub fn optional_postcode(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    if norm_postcode(value).len() < 4 {
        return Err(fail("postcode", "Postcode looks too short"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_must_not_be_blank() {
        assert!(required_name("Odeon").is_ok());
        let err = required_name("   ").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Name is required"));
    }

    #[test]
    fn empty_email_passes_bad_email_fails() {
        assert!(optional_email("").is_ok());
        assert!(optional_email("manager@cinema.com").is_ok());
        assert!(optional_email("not-an-email").is_err());
    }

    #[test]
    fn phone_is_normalized_before_length_check() {
        assert!(optional_phone("+44 20 7946 0991").is_ok());
        assert!(optional_phone("abc123").is_err());
        assert!(optional_phone("").is_ok());
    }

    #[test]
    fn postcode_uppercased_and_length_checked() {
        assert_eq!(norm_postcode(" w12 7gf "), "W12 7GF");
        assert!(optional_postcode("W1").is_err());
        assert!(optional_postcode("W12 7GF").is_ok());
    }
}
