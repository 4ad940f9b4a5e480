//! Mail dispatcher service

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, error, info_span, Instrument};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::{
    email_addresses::{parse_recipients, EmailAddress},
    errors::MailerError,
    mailer::{Attachment, Mailer, Message},
    templates::render,
};

use super::TemplateMail;

/// Mail dispatcher
#[async_trait]
pub trait MailDispatcher: Clone + Send + Sync + 'static {
    /// Sends an email with a single body part.
    ///
    /// # Arguments
    /// * `to` - Comma-separated recipients; every one must be valid or nothing is sent.
    /// * `subject` - The subject of the email.
    /// * `content` - The body of the email.
    /// * `is_html` - Whether `content` is HTML rather than plain text.
    ///
    /// # Returns
    /// - [`Ok`] once the transport accepted the message.
    /// - [`Err`] with [`MailerError::InvalidAddress`] if a recipient is invalid,
    ///   or [`MailerError::SendFailure`] if the transport failed.
    async fn send_mail(
        &self,
        to: &str,
        subject: &str,
        content: &str,
        is_html: bool,
    ) -> Result<(), MailerError>;

    /// Sends an HTML email with one binary attachment as `multipart/mixed`.
    ///
    /// # Arguments
    /// * `to` - Comma-separated recipients; every one must be valid or nothing is sent.
    /// * `subject` - The subject of the email.
    /// * `content` - The HTML body of the email.
    /// * `attachment_name` - The file name of the attachment.
    /// * `attachment_bytes` - The attachment content, sent unchanged.
    ///
    /// # Returns
    /// The same as [`MailDispatcher::send_mail`].
    async fn send_html_and_attachment_mail(
        &self,
        to: &str,
        subject: &str,
        content: &str,
        attachment_name: &str,
        attachment_bytes: &[u8],
    ) -> Result<(), MailerError>;

    /// Renders a template and sends it on a background task.
    ///
    /// The mail goes out with an attachment when [`TemplateMail::take_attachment`]
    /// returns one, and as a plain HTML mail otherwise. Failures are logged from
    /// the task and never reach the caller; awaiting the returned handle only
    /// waits for the attempt to finish.
    ///
    /// Must be called from within a tokio runtime.
    fn send_template_mail(&self, mail: TemplateMail) -> JoinHandle<()>;
}

#[cfg(test)]
mock! {
    pub MailDispatcher {}

    impl Clone for MailDispatcher {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl MailDispatcher for MailDispatcher {
        async fn send_mail(
            &self,
            to: &str,
            subject: &str,
            content: &str,
            is_html: bool,
        ) -> Result<(), MailerError>;
        async fn send_html_and_attachment_mail(
            &self,
            to: &str,
            subject: &str,
            content: &str,
            attachment_name: &str,
            attachment_bytes: &[u8],
        ) -> Result<(), MailerError>;
        fn send_template_mail(&self, mail: TemplateMail) -> JoinHandle<()>;
    }
}

/// Mail dispatcher implementation
pub struct MailDispatcherImpl<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
    from: EmailAddress,
}

impl<M> MailDispatcherImpl<M>
where
    M: Mailer,
{
    /// Creates a new mail dispatcher sending as `from`.
    pub fn new(mailer: Arc<M>, from: EmailAddress) -> Self {
        Self { mailer, from }
    }

    /// The address every message is sent from
    pub fn from_address(&self) -> &EmailAddress {
        &self.from
    }

    fn message(
        &self,
        to: &str,
        subject: &str,
        content: &str,
        is_html: bool,
        attachment: Option<Attachment>,
    ) -> Result<Message, MailerError> {
        let to = parse_recipients(to)?;

        Ok(Message {
            to,
            from: self.from.clone(),
            subject: subject.to_string(),
            body: content.to_string(),
            is_html,
            attachment,
        })
    }

    async fn send_with_attachment(
        &self,
        to: &str,
        subject: &str,
        content: &str,
        attachment: Attachment,
    ) -> Result<(), MailerError> {
        let size = attachment.bytes.len();
        let message = self.message(to, subject, content, true, Some(attachment))?;

        debug!(
            "sending email with a {} byte attachment to {} recipient(s)",
            size,
            message.to.len()
        );

        self.mailer.send(&message).await
    }

    async fn dispatch_template_mail(&self, mut mail: TemplateMail) -> Result<(), MailerError> {
        let content = render(&mail.template, &mail.context);

        match mail.take_attachment() {
            Some(attachment) => {
                debug!("sending templated email with attachment {}", attachment.name);

                self.send_with_attachment(&mail.to, &mail.subject, &content, attachment)
                    .await
            }
            None => {
                debug!("sending templated email");

                self.send_mail(&mail.to, &mail.subject, &content, true)
                    .await
            }
        }
    }
}

impl<M> Clone for MailDispatcherImpl<M>
where
    M: Mailer,
{
    fn clone(&self) -> Self {
        Self {
            mailer: Arc::clone(&self.mailer),
            from: self.from.clone(),
        }
    }
}

impl<M> fmt::Debug for MailDispatcherImpl<M>
where
    M: Mailer,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailDispatcherImpl")
            .field("mailer", &"Mailer")
            .field("from", &self.from)
            .finish()
    }
}

#[async_trait]
impl<M> MailDispatcher for MailDispatcherImpl<M>
where
    M: Mailer,
{
    async fn send_mail(
        &self,
        to: &str,
        subject: &str,
        content: &str,
        is_html: bool,
    ) -> Result<(), MailerError> {
        let message = self.message(to, subject, content, is_html, None)?;

        debug!("sending email to {} recipient(s)", message.to.len());

        self.mailer.send(&message).await
    }

    async fn send_html_and_attachment_mail(
        &self,
        to: &str,
        subject: &str,
        content: &str,
        attachment_name: &str,
        attachment_bytes: &[u8],
    ) -> Result<(), MailerError> {
        let attachment = Attachment::new(attachment_name, attachment_bytes);

        self.send_with_attachment(to, subject, content, attachment)
            .await
    }

    fn send_template_mail(&self, mail: TemplateMail) -> JoinHandle<()> {
        let dispatcher = self.clone();
        let span = info_span!("send_template_mail", to = %mail.to, subject = %mail.subject);

        tokio::spawn(
            async move {
                if let Err(err) = dispatcher.dispatch_template_mail(mail).await {
                    error!(error = ?err, "templated email was not sent: {err}");
                }
            }
            .instrument(span),
        )
    }
}
