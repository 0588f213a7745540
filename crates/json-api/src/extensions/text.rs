//! Request field validation.

use salvo::prelude::StatusError;

/// Reject blank request fields with a 400 naming the field.
pub(crate) trait TextExt {
    fn non_blank_or_400(&self, field: &str) -> Result<&str, StatusError>;
}

impl TextExt for str {
    fn non_blank_or_400(&self, field: &str) -> Result<&str, StatusError> {
        let trimmed = self.trim();

        if trimmed.is_empty() {
            return Err(StatusError::bad_request().brief(format!("{field} is required")));
        }

        Ok(trimmed)
    }
}
