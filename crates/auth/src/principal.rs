use casedesk_core::{InstitutionId, UserId};

use crate::user::{Membership, User, UserType};

/// Request-scoped view of the authenticated user.
///
/// Rebuilt from the `users` document on every call and never cached beyond
/// the request boundary, so authorization always sees current memberships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub user_type: UserType,
    pub memberships: Vec<Membership>,
}

impl Principal {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            user_type: user.user_type,
            memberships: user.memberships.clone(),
        }
    }

    pub fn membership_in(&self, institution_id: &InstitutionId) -> Option<&Membership> {
        self.memberships
            .iter()
            .find(|m| &m.institution_id == institution_id)
    }
}
