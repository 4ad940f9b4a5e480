//! Email addresses module.

mod email_address;
mod recipients;

pub use email_address::{validate_address, EmailAddress, EmailAddressError};
pub use recipients::parse_recipients;
