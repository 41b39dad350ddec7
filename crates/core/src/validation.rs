//! Input validation helpers shared by request DTOs.

use validator::ValidationErrors;

use crate::error::CoreError;

/// Minimum password length enforced on registration and password change.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Flatten `validator` errors into one human-readable message.
///
/// Fields are reported in alphabetical order so messages are stable.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .map(|(field, errs)| {
            let detail = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "is invalid".to_string());
            format!("{field} {detail}")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Require a non-blank text value, returning it trimmed.
pub fn require_text<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::Validation(format!("{field} is required"))),
    }
}

/// Unwrap an optional value that must be present.
pub fn required<T>(field: &str, value: Option<T>) -> Result<T, CoreError> {
    value.ok_or_else(|| CoreError::Validation(format!("{field} is required")))
}

/// Validate that a password meets minimum strength requirements.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), CoreError> {
    if password.chars().count() < min_length {
        return Err(CoreError::Validation(format!(
            "Password must be at least {min_length} characters long"
        )));
    }
    Ok(())
}

/// Reject values that are empty after trimming. For `#[validate(custom(...))]`.
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("is required".into());
        return Err(err);
    }
    Ok(())
}
