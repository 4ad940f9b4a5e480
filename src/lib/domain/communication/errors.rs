//! Error types for the email module

use thiserror::Error;
use tracing::debug;

use crate::domain::communication::email_addresses::EmailAddressError;

/// Mail dispatch errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// A recipient or sender address failed validation; nothing was sent
    #[error("invalid email address \"{0}\"")]
    InvalidAddress(String),

    /// The transport could not build or deliver the message
    #[error("an error occurred while sending the email")]
    SendFailure(#[source] anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::SendFailure(err)
    }
}

impl From<EmailAddressError> for MailerError {
    fn from(err: EmailAddressError) -> Self {
        debug!("EmailAddressError -> MailerError");

        match err {
            EmailAddressError::InvalidEmailAddress(address) => MailerError::InvalidAddress(address),
        }
    }
}

impl From<lettre::error::Error> for MailerError {
    fn from(err: lettre::error::Error) -> Self {
        debug!("lettre::error::Error -> MailerError");

        MailerError::SendFailure(err.into())
    }
}

impl From<lettre::transport::smtp::Error> for MailerError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        debug!("lettre::transport::smtp::Error -> MailerError");

        MailerError::SendFailure(err.into())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_invalid_address_keeps_the_address() {
        let err = MailerError::from(EmailAddressError::InvalidEmailAddress("b@bad".to_string()));

        assert!(matches!(&err, MailerError::InvalidAddress(address) if address == "b@bad"));
        assert_eq!(err.to_string(), "invalid email address \"b@bad\"");
    }

    #[test]
    fn test_anyhow_error_is_a_send_failure() {
        let err = MailerError::from(anyhow!("connection refused"));

        assert!(matches!(err, MailerError::SendFailure(_)));
        assert_eq!(
            std::error::Error::source(&err).map(|e| e.to_string()),
            Some("connection refused".to_string())
        );
    }
}
