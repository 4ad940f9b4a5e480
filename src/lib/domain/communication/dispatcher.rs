//! Mail dispatch module

mod service;
mod template_mail;

pub use service::{MailDispatcher, MailDispatcherImpl};
pub use template_mail::TemplateMail;

#[cfg(test)]
pub mod tests {
    pub use super::service::MockMailDispatcher;
}
