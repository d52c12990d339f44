//! Local request checks run before anything goes on the wire.

use crate::error::{Error, Result};

/// Reject empty or whitespace-only strings.
pub(crate) fn non_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::validation(field, "must not be empty"))
    } else {
        Ok(())
    }
}

/// Reject IDs that cannot stand as a single URL path segment.
///
/// Other characters are percent-encoded when the URL is built, but `.` and
/// `..` would be dropped from the path entirely.
pub(crate) fn path_id(field: &'static str, value: &str) -> Result<()> {
    non_blank(field, value)?;
    if matches!(value, "." | "..") {
        Err(Error::validation(field, "is not a valid ID"))
    } else {
        Ok(())
    }
}

/// Reject a missing required value.
pub(crate) fn present<T>(field: &'static str, value: &Option<T>) -> Result<()> {
    match value {
        Some(_) => Ok(()),
        None => Err(Error::validation(field, "is required")),
    }
}
