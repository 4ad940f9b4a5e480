//! Mail transport module

mod message;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::errors::MailerError;

pub use message::{Attachment, Message};

/// Mail transport
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send a fully built message
    ///
    /// # Arguments
    /// * `message` - The [`Message`] to deliver. Its addresses are already validated.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] once the transport accepted the message,
    /// or an [`Err`] containing [`MailerError::SendFailure`] if it did not.
    async fn send(&self, message: &Message) -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    #[async_trait]
    impl Mailer for Mailer {
        async fn send(&self, message: &Message) -> Result<(), MailerError>;
    }
}

#[cfg(test)]
pub mod tests {
    pub use super::MockMailer;
}
