//! Email message

use crate::domain::communication::email_addresses::EmailAddress;

/// A single named binary attachment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// The file name shown to the recipient
    pub name: String,

    /// The attachment content, sent as-is
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Create a new attachment
    pub fn new(name: &str, bytes: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }
}

/// Email message handed to a [`Mailer`](super::Mailer)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// The recipients of the email, never empty
    pub to: Vec<EmailAddress>,

    /// The sender of the email
    pub from: EmailAddress,

    /// The subject of the email
    pub subject: String,

    /// The body of the email
    pub body: String,

    /// Whether `body` is HTML rather than plain text
    pub is_html: bool,

    /// Optional attachment; its presence makes the message multipart
    pub attachment: Option<Attachment>,
}

impl Message {
    /// Whether the message is sent as `multipart/mixed`
    pub fn is_multipart(&self) -> bool {
        self.attachment.is_some()
    }
}
