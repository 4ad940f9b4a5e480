//! Outgoing email: address validation, templates and dispatch.

pub mod dispatcher;
pub mod email_addresses;
pub mod errors;
pub mod mailer;
pub mod templates;
