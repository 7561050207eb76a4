//! Authorization predicates.
//!
//! Pure policy checks: no IO, no panics, no caching. Services evaluate them
//! per call against the caller's [`Principal`] and freshly read snapshots of
//! the target documents; snapshot fields are passed in narrowly so this
//! crate stays storage-free.

use casedesk_core::{InstitutionId, UserId};

use crate::principal::Principal;
use crate::user::UserType;

/// Only managers may create institutions.
pub fn may_create_institution(principal: &Principal) -> bool {
    principal.user_type == UserType::Manager
}

/// Manager authority over a specific institution: the caller appears in its
/// `managerIds`.
pub fn may_manage_institution(principal: &Principal, manager_ids: &[UserId]) -> bool {
    manager_ids.contains(&principal.user_id)
}

/// Joining requires at least one open (non-manager) role and no existing
/// membership in the institution.
pub fn may_join_institution(
    principal: &Principal,
    institution_id: &InstitutionId,
    open_roles: usize,
) -> bool {
    open_roles > 0 && principal.membership_in(institution_id).is_none()
}

/// Submitting requires a non-manager membership in the institution.
pub fn may_submit_report(principal: &Principal, institution_id: &InstitutionId) -> bool {
    principal
        .membership_in(institution_id)
        .is_some_and(|m| !m.is_manager)
}

/// Authors read their own reports; managers read any report in their
/// institutions.
pub fn may_read_report(principal: &Principal, author: &UserId, manager_ids: &[UserId]) -> bool {
    author == &principal.user_id || may_manage_institution(principal, manager_ids)
}

/// Only managers of the report's institution may update it.
pub fn may_update_report(principal: &Principal, manager_ids: &[UserId]) -> bool {
    may_manage_institution(principal, manager_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::RoleName;
    use crate::user::Membership;

    fn principal(user_type: UserType, memberships: Vec<Membership>) -> Principal {
        Principal {
            user_id: UserId::from("u1"),
            user_type,
            memberships,
        }
    }

    fn membership(institution: &str, role: &str, is_manager: bool) -> Membership {
        Membership {
            institution_id: InstitutionId::from(institution),
            role: RoleName::new(role),
            is_manager,
        }
    }

    #[test]
    fn only_managers_create_institutions() {
        assert!(may_create_institution(&principal(UserType::Manager, vec![])));
        assert!(!may_create_institution(&principal(UserType::Regular, vec![])));
    }

    #[test]
    fn management_requires_membership_in_manager_ids() {
        let p = principal(UserType::Manager, vec![]);
        assert!(may_manage_institution(&p, &[UserId::from("u1")]));
        assert!(!may_manage_institution(&p, &[UserId::from("u2")]));
        assert!(!may_manage_institution(&p, &[]));
    }

    #[test]
    fn joining_requires_open_role_and_no_membership() {
        let inst = InstitutionId::from("i1");
        let fresh = principal(UserType::Regular, vec![]);
        assert!(may_join_institution(&fresh, &inst, 2));
        assert!(!may_join_institution(&fresh, &inst, 0));

        let joined = principal(UserType::Regular, vec![membership("i1", "HR", false)]);
        assert!(!may_join_institution(&joined, &inst, 2));
        // A membership elsewhere does not block joining this institution.
        let elsewhere = principal(UserType::Regular, vec![membership("i2", "HR", false)]);
        assert!(may_join_institution(&elsewhere, &inst, 2));
    }

    #[test]
    fn submitting_requires_non_manager_membership() {
        let inst = InstitutionId::from("i1");
        let member = principal(UserType::Regular, vec![membership("i1", "HR", false)]);
        assert!(may_submit_report(&member, &inst));

        let manager = principal(UserType::Manager, vec![membership("i1", "Owner", true)]);
        assert!(!may_submit_report(&manager, &inst));

        let outsider = principal(UserType::Regular, vec![membership("i2", "HR", false)]);
        assert!(!may_submit_report(&outsider, &inst));
    }

    #[test]
    fn authors_and_managers_read_reports() {
        let p = principal(UserType::Regular, vec![]);
        assert!(may_read_report(&p, &UserId::from("u1"), &[]));
        assert!(!may_read_report(&p, &UserId::from("u9"), &[]));
        assert!(may_read_report(&p, &UserId::from("u9"), &[UserId::from("u1")]));
    }

    #[test]
    fn updates_are_manager_only() {
        let p = principal(UserType::Regular, vec![]);
        assert!(!may_update_report(&p, &[UserId::from("u9")]));
        assert!(may_update_report(&p, &[UserId::from("u1")]));
    }
}
