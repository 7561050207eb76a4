//! Input validation helpers shared by the services.

use crate::error::{DomainError, DomainResult};

/// Trim `value` and require the result to be non-empty.
pub fn require_trimmed(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_owned())
}

/// Syntactic email check: non-empty local part, one `@`, dotted domain.
///
/// Deliberately permissive; the authentication provider is the authority on
/// deliverability.
pub fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
