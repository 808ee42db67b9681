//! Plaintext metadata validation.
//!
//! Runs once, at registration. Stored records are never re-validated.

use crate::error::ValidationError;

/// Borrowed view of the plaintext fields of a registration.
#[derive(Debug, Clone, Copy)]
pub struct BookMetadata<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub publisher: &'a str,
    pub genre: &'a str,
}

/// Validate book metadata.
///
/// - The title must be non-empty.
/// - No field may exceed `max_bytes` bytes.
///
/// Author, publisher, and genre may be empty.
pub fn validate_metadata(meta: &BookMetadata<'_>, max_bytes: usize) -> Result<(), ValidationError> {
    if meta.title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    for (field, value) in [
        ("title", meta.title),
        ("author", meta.author),
        ("publisher", meta.publisher),
        ("genre", meta.genre),
    ] {
        if value.len() > max_bytes {
            return Err(ValidationError::FieldTooLong {
                field,
                len: value.len(),
                max: max_bytes,
            });
        }
    }

    Ok(())
}
