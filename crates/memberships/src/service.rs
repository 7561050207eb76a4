//! Joining institutions and listing memberships.

use casedesk_auth::{Membership, Principal, User, authorize};
use casedesk_core::{DomainError, InstitutionId, UserId};
use casedesk_institutions::Institution;
use casedesk_store::{DocumentStore, FieldPatch, StoreError, StoredDocument, from_document};

use crate::error::MembershipError;

/// Command: JoinInstitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinInstitution {
    pub institution_id: InstitutionId,
    /// Requested role label, resolved case-insensitively against the
    /// institution's catalog.
    pub role: String,
}

pub struct MembershipService<S> {
    store: S,
}

impl<S> MembershipService<S>
where
    S: DocumentStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Append a non-manager membership to the caller's `users` document.
    ///
    /// Duplicate checks run against a fresh read of the user document, not
    /// the caller-supplied principal, so a stale principal cannot slip in a
    /// second membership.
    pub async fn join_institution(
        &self,
        principal: &Principal,
        cmd: JoinInstitution,
    ) -> Result<Membership, MembershipError> {
        let institution = self.load_institution(&cmd.institution_id).await?;

        let fields = self
            .store
            .get(User::COLLECTION, principal.user_id.as_str())
            .await?
            .ok_or(DomainError::NotFound)?;
        let mut user: User = from_document(fields)?;

        let fresh = Principal::from_user(&user);
        if !authorize::may_join_institution(
            &fresh,
            &cmd.institution_id,
            institution.open_roles().count(),
        ) {
            // An existing membership is idempotency feedback; anything else
            // is a permission failure.
            if fresh.membership_in(&cmd.institution_id).is_some() {
                return Err(DomainError::AlreadyJoined.into());
            }
            return Err(DomainError::PermissionDenied.into());
        }

        let role = institution.resolve_join_role(&cmd.role)?;
        let membership = Membership {
            institution_id: cmd.institution_id.clone(),
            role,
            is_manager: false,
        };
        user.memberships.push(membership.clone());

        let memberships = serde_json::to_value(&user.memberships)
            .map_err(|e| StoreError::encode(e.to_string()))?;
        // Legacy userRole/institutionId mirrors are best-effort state for
        // pre-migration readers; the memberships array is authoritative.
        let patch = FieldPatch::new()
            .set("memberships", memberships)
            .set("userRole", membership.role.as_str())
            .set("institutionId", membership.institution_id.as_str());
        self.store
            .update(User::COLLECTION, principal.user_id.as_str(), patch)
            .await?;

        tracing::info!(
            user_id = %principal.user_id,
            institution_id = %membership.institution_id,
            role = %membership.role,
            "user joined institution"
        );
        Ok(membership)
    }

    /// Stored memberships in insertion order.
    pub async fn list_memberships(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Membership>, MembershipError> {
        let fields = self
            .store
            .get(User::COLLECTION, user_id.as_str())
            .await?
            .ok_or(DomainError::NotFound)?;
        let user: User = from_document(fields)?;
        Ok(user.memberships)
    }

    async fn load_institution(
        &self,
        institution_id: &InstitutionId,
    ) -> Result<Institution, MembershipError> {
        match self
            .store
            .get(Institution::COLLECTION, institution_id.as_str())
            .await?
        {
            Some(fields) => Ok(Institution::from_stored(StoredDocument {
                id: institution_id.as_str().to_owned(),
                fields,
            })?),
            None => Err(DomainError::NotFound.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;

    use casedesk_auth::UserType;
    use casedesk_institutions::{CreateInstitution, InstitutionService};
    use casedesk_store::{InMemoryDocumentStore, to_document};

    struct Fixture {
        store: Arc<InMemoryDocumentStore>,
        institutions: InstitutionService<Arc<InMemoryDocumentStore>>,
        memberships: MembershipService<Arc<InMemoryDocumentStore>>,
    }

    impl Fixture {
        async fn new() -> Self {
            let store = Arc::new(InMemoryDocumentStore::new());
            Self {
                institutions: InstitutionService::new(store.clone()),
                memberships: MembershipService::new(store.clone()),
                store,
            }
        }

        async fn seed_user(&self, id: &str, user_type: UserType) -> Principal {
            let user = User {
                user_id: UserId::from(id),
                email: format!("{id}@example.com"),
                full_name: id.to_owned(),
                user_type,
                memberships: Vec::new(),
            };
            self.store
                .set(User::COLLECTION, id, to_document(&user).unwrap())
                .await
                .unwrap();
            Principal::from_user(&user)
        }

        async fn seed_institution(&self, manager: &Principal, name: &str, roles: &str) -> InstitutionId {
            self.institutions
                .create_institution(
                    manager,
                    CreateInstitution {
                        name: name.to_owned(),
                        roles_input: roles.to_owned(),
                        occurred_at: Utc::now(),
                    },
                )
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn joining_records_a_non_manager_membership() {
        let fx = Fixture::new().await;
        let alice = fx.seed_user("u-alice", UserType::Manager).await;
        let bob = fx.seed_user("u-bob", UserType::Regular).await;
        let acme = fx.seed_institution(&alice, "Acme", "Owner, HR, Ops").await;

        let membership = fx
            .memberships
            .join_institution(
                &bob,
                JoinInstitution {
                    institution_id: acme.clone(),
                    role: "hr".to_owned(),
                },
            )
            .await
            .unwrap();

        // The catalog's stored casing wins over the requested one.
        assert_eq!(membership.role.as_str(), "HR");
        assert!(!membership.is_manager);

        let listed = fx.memberships.list_memberships(&bob.user_id).await.unwrap();
        assert_eq!(listed, vec![membership]);
    }

    #[tokio::test]
    async fn joining_twice_is_already_joined_and_does_not_mutate() {
        let fx = Fixture::new().await;
        let alice = fx.seed_user("u-alice", UserType::Manager).await;
        let bob = fx.seed_user("u-bob", UserType::Regular).await;
        let acme = fx.seed_institution(&alice, "Acme", "Owner, HR").await;

        let join = |role: &str| JoinInstitution {
            institution_id: acme.clone(),
            role: role.to_owned(),
        };
        fx.memberships.join_institution(&bob, join("HR")).await.unwrap();

        // Second attempt fails even with a stale principal that predates the
        // first join.
        let err = fx
            .memberships
            .join_institution(&bob, join("HR"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MembershipError::Domain(DomainError::AlreadyJoined)
        ));
        assert_eq!(
            fx.memberships.list_memberships(&bob.user_id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn manager_role_cannot_be_joined() {
        let fx = Fixture::new().await;
        let alice = fx.seed_user("u-alice", UserType::Manager).await;
        let carol = fx.seed_user("u-carol", UserType::Regular).await;
        let acme = fx.seed_institution(&alice, "Acme", "Owner, HR").await;

        let err = fx
            .memberships
            .join_institution(
                &carol,
                JoinInstitution {
                    institution_id: acme,
                    role: "Owner".to_owned(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MembershipError::Domain(DomainError::InvalidRole(_))
        ));
    }

    #[tokio::test]
    async fn institution_with_only_the_manager_role_rejects_joins() {
        let fx = Fixture::new().await;
        let alice = fx.seed_user("u-alice", UserType::Manager).await;
        let bob = fx.seed_user("u-bob", UserType::Regular).await;
        let solo = fx.seed_institution(&alice, "Solo", "Owner").await;

        let err = fx
            .memberships
            .join_institution(
                &bob,
                JoinInstitution {
                    institution_id: solo,
                    role: "Owner".to_owned(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MembershipError::Domain(DomainError::PermissionDenied)
        ));
    }

    #[tokio::test]
    async fn unknown_institution_is_not_found() {
        let fx = Fixture::new().await;
        let bob = fx.seed_user("u-bob", UserType::Regular).await;
        let err = fx
            .memberships
            .join_institution(
                &bob,
                JoinInstitution {
                    institution_id: InstitutionId::from("nope"),
                    role: "HR".to_owned(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::Domain(DomainError::NotFound)));
    }

    #[tokio::test]
    async fn memberships_list_in_insertion_order() {
        let fx = Fixture::new().await;
        let alice = fx.seed_user("u-alice", UserType::Manager).await;
        let bob = fx.seed_user("u-bob", UserType::Regular).await;
        let acme = fx.seed_institution(&alice, "Acme", "Owner, HR").await;
        let beta = fx.seed_institution(&alice, "Beta", "Chief, Staff").await;

        fx.memberships
            .join_institution(
                &bob,
                JoinInstitution {
                    institution_id: acme.clone(),
                    role: "HR".to_owned(),
                },
            )
            .await
            .unwrap();
        fx.memberships
            .join_institution(
                &bob,
                JoinInstitution {
                    institution_id: beta.clone(),
                    role: "Staff".to_owned(),
                },
            )
            .await
            .unwrap();

        let listed = fx.memberships.list_memberships(&bob.user_id).await.unwrap();
        let order: Vec<_> = listed.iter().map(|m| m.institution_id.clone()).collect();
        assert_eq!(order, vec![acme, beta]);
    }
}
