//! Templated mail request

use crate::domain::communication::{mailer::Attachment, templates::TemplateContext};

/// A templated email to render and send in the background
#[derive(Clone, Debug, Default)]
pub struct TemplateMail {
    /// Comma-separated recipient list
    pub to: String,

    /// The subject of the email
    pub subject: String,

    /// The template to render into the HTML body
    pub template: String,

    /// Variables and marker delimiters used to render `template`
    pub context: TemplateContext,

    /// Attachment file name, ignored when blank
    pub attachment_name: Option<String>,

    /// Attachment content, required together with `attachment_name`
    pub attachment_bytes: Option<Vec<u8>>,
}

impl TemplateMail {
    /// Creates a templated email without an attachment
    pub fn new(to: &str, subject: &str, template: &str, context: TemplateContext) -> Self {
        Self {
            to: to.to_string(),
            subject: subject.to_string(),
            template: template.to_string(),
            context,
            attachment_name: None,
            attachment_bytes: None,
        }
    }

    /// Adds an attachment
    pub fn with_attachment(mut self, name: &str, bytes: &[u8]) -> Self {
        self.attachment_name = Some(name.to_string());
        self.attachment_bytes = Some(bytes.to_vec());
        self
    }

    /// Moves the attachment out, if the name is non-blank and bytes are present
    pub fn take_attachment(&mut self) -> Option<Attachment> {
        match (self.attachment_name.take(), self.attachment_bytes.take()) {
            (Some(name), Some(bytes)) if !name.trim().is_empty() => Some(Attachment { name, bytes }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail() -> TemplateMail {
        TemplateMail::new(
            "a@example.com",
            "subject",
            "template",
            TemplateContext::default(),
        )
    }

    #[test]
    fn test_no_attachment_by_default() {
        assert_eq!(mail().take_attachment(), None);
    }

    #[test]
    fn test_attachment_with_name_and_bytes() {
        let mut mail = mail().with_attachment("report.pdf", b"%PDF");

        assert_eq!(
            mail.take_attachment(),
            Some(Attachment::new("report.pdf", b"%PDF"))
        );
        assert_eq!(mail.attachment_bytes, None);
        assert_eq!(mail.take_attachment(), None);
    }

    #[test]
    fn test_blank_name_disables_attachment() {
        assert_eq!(
            mail().with_attachment("  ", b"%PDF").take_attachment(),
            None
        );
    }

    #[test]
    fn test_name_without_bytes_disables_attachment() {
        let mut mail = mail();
        mail.attachment_name = Some("report.pdf".to_string());

        assert_eq!(mail.take_attachment(), None);
    }

    #[test]
    fn test_empty_bytes_still_attach() {
        let attachment = mail().with_attachment("empty.txt", b"").take_attachment();

        assert_eq!(attachment, Some(Attachment::new("empty.txt", b"")));
    }
}
