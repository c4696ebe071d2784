//! Author name validation.
//!
//! Names are dot-separated labels in the style of DNS names (`mdt`,
//! `mdt.dlog`). Each label:
//! - is 1 to 63 characters long
//! - uses only lowercase ASCII letters, digits and `-`
//! - does not start or end with `-`
//!
//! The whole name is at most 253 characters.

use crate::error::{NameError, NameResult};

/// Longest allowed label.
pub const MAX_LABEL_LEN: usize = 63;

/// Longest allowed name, dots included.
pub const MAX_NAME_LEN: usize = 253;

fn invalid(name: &str, reason: impl Into<String>) -> NameError {
    NameError::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate an author name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use dlog_names::names::validate_name;
///
/// assert!(validate_name("mdt").is_ok());
/// assert!(validate_name("mdt.dlog").is_ok());
/// assert!(validate_name("").is_err());
/// assert!(validate_name("Upper").is_err());
/// ```
pub fn validate_name(name: &str) -> NameResult<()> {
    if name.is_empty() {
        return Err(invalid(name, "name must not be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid(
            name,
            format!("longer than {MAX_NAME_LEN} characters"),
        ));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(invalid(name, "labels must not be empty"));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(invalid(
                name,
                format!("label {label:?} is longer than {MAX_LABEL_LEN} characters"),
            ));
        }
        if let Some(ch) = label
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(invalid(name, format!("contains forbidden character: {ch:?}")));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid(
                name,
                format!("label {label:?} must not start or end with '-'"),
            ));
        }
    }

    Ok(())
}
