//! Recipient list parsing

use super::{EmailAddress, EmailAddressError};

/// Splits a comma-separated recipient list and validates every address.
///
/// Only the empty fragments at the end of the list are dropped, so
/// `"a@example.com,"` yields one recipient while `"a@example.com,,b@example.com"`
/// fails on the empty fragment in the middle. A list with no addresses left
/// after dropping fails as an empty address.
///
/// # Returns
/// - [`Ok`] with the addresses in their original order.
/// - [`Err`] with the first address that does not validate.
pub fn parse_recipients(to: &str) -> Result<Vec<EmailAddress>, EmailAddressError> {
    let mut fragments: Vec<&str> = to.split(',').collect();

    while fragments.last().is_some_and(|fragment| fragment.is_empty()) {
        fragments.pop();
    }

    if fragments.is_empty() {
        return Err(EmailAddressError::InvalidEmailAddress(String::new()));
    }

    fragments.into_iter().map(EmailAddress::new).collect()
}
