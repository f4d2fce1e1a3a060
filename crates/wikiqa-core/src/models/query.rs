use crate::error::{Result, WikiqaError};

/// Trim a caller-supplied question and reject it when nothing is left
pub fn validate_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(WikiqaError::EmptyQuery);
    }
    Ok(trimmed)
}
