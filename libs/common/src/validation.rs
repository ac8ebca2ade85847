//! Input validation utilities
//!
//! Pattern matchers are compiled once into a [`Validators`] value at startup
//! and shared by reference with whoever validates input.

use chrono::NaiveDate;
use regex::Regex;

use crate::error::ServiceError;

/// Minimum length of a full name
pub const MIN_FULL_NAME_LEN: usize = 5;
/// Minimum length of a password at registration
pub const MIN_PASSWORD_LEN: usize = 5;
/// Minimum length of a password when an account is updated
pub const MIN_UPDATED_PASSWORD_LEN: usize = 8;
/// Minimum length of stall and product names
pub const MIN_CATALOG_NAME_LEN: usize = 5;

const EMAIL_PATTERN: &str = r"^[^\s@]+@([^\s@.,]+\.)+[^\s@.,]{2,}$";
const PHONE_PATTERN: &str = r"^(\+62|62)?[\s-]?0?8[1-9]\d[\s-]?\d{4}[\s-]?\d{2,5}$";
const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// Compiled input patterns
#[derive(Debug, Clone)]
pub struct Validators {
    email: Regex,
    phone: Regex,
    date: Regex,
}

impl Validators {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            phone: Regex::new(PHONE_PATTERN)?,
            date: Regex::new(DATE_PATTERN)?,
        })
    }

    /// Single `@`, no whitespace, dotted domain with a 2+ character TLD
    pub fn is_valid_email(&self, email: &str) -> bool {
        self.email.is_match(email)
    }

    /// Indonesian mobile number, optionally prefixed with `+62`/`62`
    pub fn is_valid_phone(&self, phone: &str) -> bool {
        self.phone.is_match(phone)
    }

    /// Calendar date written as `YYYY-MM-DD`
    pub fn is_valid_date(&self, date: &str) -> bool {
        self.require_date(date).is_ok()
    }

    pub fn require_email(&self, email: &str) -> Result<(), ServiceError> {
        if self.is_valid_email(email) {
            Ok(())
        } else {
            Err(ServiceError::invalid("invalid email format"))
        }
    }

    pub fn require_phone(&self, phone: &str) -> Result<(), ServiceError> {
        if self.is_valid_phone(phone) {
            Ok(())
        } else {
            Err(ServiceError::invalid("invalid phone number"))
        }
    }

    pub fn require_date(&self, date: &str) -> Result<NaiveDate, ServiceError> {
        if !self.date.is_match(date) {
            return Err(ServiceError::invalid("date must be written as YYYY-MM-DD"));
        }
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ServiceError::invalid(format!("{date} is not a calendar date")))
    }
}

/// Reject `value` when it has fewer than `min` characters
pub fn require_min_len(field: &str, value: &str, min: usize) -> Result<(), ServiceError> {
    if value.chars().count() < min {
        return Err(ServiceError::invalid(format!(
            "{field} must be at least {min} characters long"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validators() -> Validators {
        Validators::new().unwrap()
    }

    #[test]
    fn accepts_well_formed_emails() {
        let v = validators();
        assert!(v.is_valid_email("budi@example.com"));
        assert!(v.is_valid_email("siti.rahma@mail.co.id"));
    }

    #[test]
    fn rejects_malformed_emails() {
        let v = validators();
        assert!(!v.is_valid_email("budi"));
        assert!(!v.is_valid_email("budi@@example.com"));
        assert!(!v.is_valid_email("budi@example"));
        assert!(!v.is_valid_email("budi @example.com"));
        assert!(!v.is_valid_email("budi@example.c"));
        assert!(!v.is_valid_email(""));
    }

    #[test]
    fn accepts_indonesian_mobile_numbers() {
        let v = validators();
        assert!(v.is_valid_phone("081234567890"));
        assert!(v.is_valid_phone("+6281234567890"));
        assert!(v.is_valid_phone("6281234567890"));
        assert!(v.is_valid_phone("0812-3456-7890"));
    }

    #[test]
    fn rejects_other_numbers() {
        let v = validators();
        assert!(!v.is_valid_phone("0212345678"));
        assert!(!v.is_valid_phone("12345"));
        assert!(!v.is_valid_phone("phone"));
        assert!(!v.is_valid_phone(""));
    }

    #[test]
    fn dates_must_be_real_iso_days() {
        let v = validators();
        assert!(v.is_valid_date("1998-02-14"));
        assert!(!v.is_valid_date("14-02-1998"));
        assert!(!v.is_valid_date("1998-02-30"));
        assert!(!v.is_valid_date("x1998-02-14"));
        assert_eq!(
            v.require_date("2000-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2000, 2, 29).unwrap()
        );
        assert!(matches!(
            v.require_date("2001-02-29"),
            Err(ServiceError::InvalidRequest(_))
        ));
    }

    #[test]
    fn min_len_counts_characters() {
        assert!(require_min_len("full name", "Budi", MIN_FULL_NAME_LEN).is_err());
        assert!(require_min_len("full name", "Budi S", MIN_FULL_NAME_LEN).is_ok());
        assert!(matches!(
            require_min_len("password", "abcd", MIN_PASSWORD_LEN),
            Err(ServiceError::InvalidRequest(_))
        ));
    }
}
