/// Form validation
///
/// Field-level checks shared by the auth, onboarding and profile forms.
/// Errors are collected per field and surfaced as one validation error.
use crate::error::AmoraError;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use validator::{Validate, ValidateEmail, ValidationErrors};

/// Digits required in a phone number
pub const PHONE_DIGITS: usize = 10;

/// Digits in a one-time code
pub const OTP_DIGITS: usize = 6;

/// Minimum member age
pub const MINIMUM_AGE: u32 = 18;

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collected field errors for one form
#[derive(Debug, Default, Clone)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Fold the errors reported by a `validator` derive
    pub fn extend_from(&mut self, errors: ValidationErrors) {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        for (field, list) in fields {
            for error in list {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                self.push(&field, message);
            }
        }
    }

    /// Run a `validator` derive and collect its errors
    pub fn check<T: Validate>(&mut self, form: &T) {
        if let Err(errors) = form.validate() {
            self.extend_from(errors);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// `Ok(())` when nothing was collected
    pub fn into_result(self) -> Result<(), AmoraError> {
        if self.errors.is_empty() {
            return Ok(());
        }

        let message = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(AmoraError::Validation(message))
    }
}

/// Strip everything but ASCII digits
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// A phone number is valid when it carries exactly ten digits
pub fn is_valid_phone(phone: &str) -> bool {
    digits_only(phone).len() == PHONE_DIGITS
}

pub fn is_valid_email(email: &str) -> bool {
    email.trim().to_string().validate_email()
}

/// One-time codes are exactly six digits
pub fn is_valid_otp(code: &str) -> bool {
    code.len() == OTP_DIGITS && code.chars().all(|c| c.is_ascii_digit())
}

/// Full years between `birth_date` and `today`
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

pub fn require(errors: &mut FieldErrors, field: &str, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.push(field, format!("{} is required", label));
    }
}

pub fn require_phone(errors: &mut FieldErrors, field: &str, phone: &str) {
    if !is_valid_phone(phone) {
        errors.push(field, "Phone number must be 10 digits");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_accepts_ten_digits() {
        for phone in ["5551234567", "(555) 123-4567", "555.123.4567", " 555 123 4567 "] {
            assert!(is_valid_phone(phone), "{} should be valid", phone);
        }
    }

    #[test]
    fn test_phone_rejects_other_lengths() {
        for phone in ["", "555123456", "55512345678", "+1 555 123 4567", "phone"] {
            assert!(!is_valid_phone(phone), "{} should be invalid", phone);
        }
    }

    #[test]
    fn test_phone_digit_counts() {
        for len in 0..20 {
            let phone: String = "9".repeat(len);
            assert_eq!(is_valid_phone(&phone), len == PHONE_DIGITS);
            let padded = format!("-{}-", phone.chars().map(|c| format!("{} ", c)).collect::<String>());
            assert_eq!(is_valid_phone(&padded), len == PHONE_DIGITS);
        }
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("sam@example.com"));
        assert!(!is_valid_email("sam@"));
        assert!(!is_valid_email("not an email"));
    }

    #[test]
    fn test_otp() {
        assert!(is_valid_otp("123456"));
        assert!(!is_valid_otp("12345"));
        assert!(!is_valid_otp("12a456"));
    }

    #[test]
    fn test_age() {
        let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2018, 6, 14).unwrap()), 17);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2018, 6, 15).unwrap()), 18);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()), 0);
    }

    #[test]
    fn test_errors_join() {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", "  ", "Name");
        require_phone(&mut errors, "phone", "123");

        let err = errors.into_result().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("name: Name is required"));
        assert!(message.contains("phone: Phone number must be 10 digits"));
    }
}
