use once_cell::sync::Lazy;
use regex::Regex;

use super::{digits_only, RawSubmission};
use crate::error::ValidationError;

pub const MIN_PHONE_DIGITS: usize = 9;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(e) => Err(e),
        }
    }
}

/// Checks consent, full name, email, then phone; stops at the first failure.
pub fn validate(submission: &RawSubmission) -> ValidationResult {
    match check(submission) {
        Ok(()) => ValidationResult::Valid,
        Err(e) => ValidationResult::Invalid(e),
    }
}

fn check(submission: &RawSubmission) -> Result<(), ValidationError> {
    if !submission.terms_accepted() {
        return Err(ValidationError::TermsNotAccepted);
    }

    if submission.full_name().trim().is_empty() {
        return Err(ValidationError::MissingFullName);
    }

    let email = submission.email();
    if !email.is_empty() && !is_valid_email(email) {
        return Err(ValidationError::MalformedEmail);
    }

    let phone = submission.phone();
    if !phone.is_empty() && digits_only(phone).len() < MIN_PHONE_DIGITS {
        return Err(ValidationError::PhoneTooShort);
    }

    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
