use core::str::FromStr;

use serde::{Deserialize, Serialize};

use casedesk_core::{DomainError, InstitutionId, UserId};

use crate::role::RoleName;

/// User classification, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Manager,
    Regular,
}

impl UserType {
    pub fn is_manager(self) -> bool {
        matches!(self, Self::Manager)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Regular => "regular",
        }
    }
}

impl FromStr for UserType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manager" => Ok(Self::Manager),
            "regular" => Ok(Self::Regular),
            other => Err(DomainError::validation(format!(
                "userType must be 'manager' or 'regular', got '{other}'"
            ))),
        }
    }
}

/// A user's membership in one institution.
///
/// At most one membership exists per `(user, institution)` pair.
/// `is_manager` is true iff the user appears in the institution's
/// `managerIds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub institution_id: InstitutionId,
    pub role: RoleName,
    pub is_manager: bool,
}

/// The `users` collection document.
///
/// The stored document additionally carries the legacy scalar mirrors
/// (`roleName`, `institutionId`, `userRole`) for pre-migration readers;
/// they are write-only and absent from this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    pub full_name: String,
    pub user_type: UserType,
    #[serde(default)]
    pub memberships: Vec<Membership>,
}

impl User {
    pub const COLLECTION: &'static str = "users";

    pub fn membership_in(&self, institution_id: &InstitutionId) -> Option<&Membership> {
        self.memberships
            .iter()
            .find(|m| &m.institution_id == institution_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_parses_case_insensitively() {
        assert_eq!("Manager".parse::<UserType>().unwrap(), UserType::Manager);
        assert_eq!(" regular ".parse::<UserType>().unwrap(), UserType::Regular);
        assert!("admin".parse::<UserType>().is_err());
    }

    #[test]
    fn user_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(UserType::Regular).unwrap(),
            serde_json::json!("regular")
        );
    }

    #[test]
    fn membership_serializes_with_camel_case_fields() {
        let membership = Membership {
            institution_id: InstitutionId::from("i1"),
            role: RoleName::new("HR"),
            is_manager: false,
        };
        assert_eq!(
            serde_json::to_value(&membership).unwrap(),
            serde_json::json!({"institutionId": "i1", "role": "HR", "isManager": false})
        );
    }
}
