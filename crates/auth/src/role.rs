use serde::{Deserialize, Serialize};

/// Role label drawn from an institution's catalog.
///
/// Labels are opaque strings. Comparisons are ASCII case-insensitive; the
/// stored casing is preserved and never normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive label comparison (ASCII).
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl core::fmt::Display for RoleName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoleName {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_case_insensitive_and_preserves_casing() {
        let role = RoleName::new("Admin");
        assert!(role.matches("admin"));
        assert!(role.matches("ADMIN"));
        assert!(!role.matches("administrator"));
        assert_eq!(role.as_str(), "Admin");
    }
}
