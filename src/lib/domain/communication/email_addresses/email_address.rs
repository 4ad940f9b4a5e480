//! Email Address

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r#"^(([^<>()\[\]\\.,;:\t\n\x0B\x0C\r @"]+(\.[^<>()\[\]\\.,;:\t\n\x0B\x0C\r @"]+)*)|("[^\n\r\x{85}\x{2028}\x{2029}]+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#
    )
    .unwrap();
}

use std::fmt;

use thiserror::Error;

/// An error that can occur when validating an email address
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailAddressError {
    /// The email address does not match the address grammar
    #[error("invalid email address \"{0}\"")]
    InvalidEmailAddress(String),
}

/// Checks `raw` against the address grammar without allocating a value.
///
/// The whole string must match; surrounding whitespace is not trimmed.
pub fn validate_address(raw: &str) -> Result<(), EmailAddressError> {
    if !EMAIL_REGEX.is_match(raw) {
        return Err(EmailAddressError::InvalidEmailAddress(raw.to_string()));
    }

    Ok(())
}

/// An email address that passed [`validate_address`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new email address
    pub fn new(raw: &str) -> Result<Self, EmailAddressError> {
        validate_address(raw)?;

        Ok(Self(raw.to_string()))
    }

    /// Create an email address without validating it
    #[cfg(test)]
    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.to_string())
    }

    /// The address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}
