//! Common validation utilities.

use validator::ValidationError;

use crate::phone::digits_only;

/// Maximum length of a wish, in characters.
pub const MAX_WISH_CONTENT_CHARS: usize = 280;

/// Minimum number of digits a guest mobile number must carry.
const MIN_MOBILE_DIGITS: usize = 7;

/// Maximum number of digits a guest mobile number may carry (E.164).
const MAX_MOBILE_DIGITS: usize = 15;

lazy_static::lazy_static! {
    /// Characters hosts commonly type into a phone field.
    static ref MOBILE_INPUT_REGEX: regex::Regex =
        regex::Regex::new(r"^[0-9+\-\s().]+$").unwrap();
}

/// Validates wish content: non-empty after trimming and at most 280 characters.
///
/// Length is counted in Unicode scalar values so that emoji and non-Latin
/// scripts are not penalised for their UTF-8 width.
pub fn validate_wish_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        let mut err = ValidationError::new("wish_content_empty");
        err.message = Some("Please write a wish before sending".into());
        return Err(err);
    }

    if content.chars().count() > MAX_WISH_CONTENT_CHARS {
        let mut err = ValidationError::new("wish_content_length");
        err.message = Some(
            format!(
                "Wishes can be at most {} characters",
                MAX_WISH_CONTENT_CHARS
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates a free-text mobile number as typed by a host.
pub fn validate_mobile_input(mobile: &str) -> Result<(), ValidationError> {
    if !MOBILE_INPUT_REGEX.is_match(mobile) {
        let mut err = ValidationError::new("mobile_format");
        err.message = Some("Mobile number contains invalid characters".into());
        return Err(err);
    }

    let digits = digits_only(mobile).len();
    if !(MIN_MOBILE_DIGITS..=MAX_MOBILE_DIGITS).contains(&digits) {
        let mut err = ValidationError::new("mobile_length");
        err.message = Some(
            format!(
                "Mobile number must have between {} and {} digits",
                MIN_MOBILE_DIGITS, MAX_MOBILE_DIGITS
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates that a display name is not blank.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value cannot be blank".into());
        return Err(err);
    }
    Ok(())
}
