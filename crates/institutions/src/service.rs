//! Institution operations: creation, role-catalog growth, lookup, listing.

use chrono::{DateTime, Utc};
use serde_json::Value;

use casedesk_auth::{Membership, Principal, RoleName, User, authorize};
use casedesk_core::{DomainError, InstitutionId, UserId};
use casedesk_store::{DocumentStore, FieldPatch, Predicate, from_document};

use crate::error::InstitutionError;
use crate::institution::Institution;
use crate::roles::{parse_role_input, partition_new_roles};

/// Command: CreateInstitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInstitution {
    pub name: String,
    /// Comma-separated role labels; the first becomes the manager's role.
    pub roles_input: String,
    pub occurred_at: DateTime<Utc>,
}

/// Result of a role-catalog extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAddition {
    pub added: Vec<RoleName>,
    pub duplicates: Vec<RoleName>,
}

impl RoleAddition {
    /// True when every submitted label already existed and nothing was
    /// written.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty()
    }
}

pub struct InstitutionService<S> {
    store: S,
}

impl<S> InstitutionService<S>
where
    S: DocumentStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist a new institution, then append the creator's manager
    /// membership to their `users` document.
    ///
    /// The two writes are not transactional: if the membership update fails
    /// the institution stays in place and the error names it so the caller
    /// can reconcile.
    pub async fn create_institution(
        &self,
        principal: &Principal,
        cmd: CreateInstitution,
    ) -> Result<InstitutionId, InstitutionError> {
        if !authorize::may_create_institution(principal) {
            return Err(DomainError::PermissionDenied.into());
        }
        let roles = parse_role_input(&cmd.roles_input);
        if roles.is_empty() {
            return Err(DomainError::validation("at least one role is required").into());
        }

        let institution =
            Institution::create(&cmd.name, roles, principal.user_id.clone(), cmd.occurred_at)?;
        let id = self
            .store
            .add(Institution::COLLECTION, institution.to_document()?)
            .await?;
        let institution_id = InstitutionId::from(id);

        let membership = Membership {
            institution_id: institution_id.clone(),
            role: institution.manager_role_name.clone(),
            is_manager: true,
        };
        if let Err(source) = self.append_creator_membership(&principal.user_id, &membership).await {
            tracing::warn!(
                institution_id = %institution_id,
                user_id = %principal.user_id,
                error = %source,
                "institution created but creator membership update failed"
            );
            return Err(InstitutionError::PartialSuccess {
                institution_id,
                source,
            });
        }

        tracing::info!(institution_id = %institution_id, name = %institution.institution_name, "institution created");
        Ok(institution_id)
    }

    /// Extend the role catalog. Labels already present (case-insensitively)
    /// are reported back as duplicates; when nothing is new, no write is
    /// issued. The write is an idempotent array union, so concurrent calls
    /// against the same institution cannot lose additions.
    pub async fn add_roles(
        &self,
        principal: &Principal,
        institution_id: &InstitutionId,
        roles_input: &str,
    ) -> Result<RoleAddition, InstitutionError> {
        let institution = self.get(institution_id).await?;
        if !authorize::may_manage_institution(principal, &institution.manager_ids) {
            return Err(DomainError::PermissionDenied.into());
        }
        let parsed = parse_role_input(roles_input);
        if parsed.is_empty() {
            return Err(DomainError::validation("at least one role is required").into());
        }

        let (added, duplicates) = partition_new_roles(&institution.roles, parsed);
        if added.is_empty() {
            return Ok(RoleAddition { added, duplicates });
        }

        let values = added
            .iter()
            .map(|r| Value::String(r.as_str().to_owned()))
            .collect();
        self.store
            .update(
                Institution::COLLECTION,
                institution_id.as_str(),
                FieldPatch::new().array_union("roles", values),
            )
            .await?;

        tracing::debug!(institution_id = %institution_id, added = added.len(), "roles added");
        Ok(RoleAddition { added, duplicates })
    }

    /// First institution whose name matches case-insensitively. A full
    /// collection scan: the store has no name index.
    pub async fn find_by_name(&self, name: &str) -> Result<Institution, InstitutionError> {
        let all = self.store.query(Institution::COLLECTION, &[]).await?;
        for stored in all {
            let institution = Institution::from_stored(stored)?;
            if institution.matches_name(name) {
                return Ok(institution);
            }
        }
        Err(DomainError::NotFound.into())
    }

    pub async fn list(&self) -> Result<Vec<Institution>, InstitutionError> {
        let all = self.store.query(Institution::COLLECTION, &[]).await?;
        all.into_iter()
            .map(|stored| Institution::from_stored(stored).map_err(InstitutionError::from))
            .collect()
    }

    pub async fn list_managed_by(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Institution>, InstitutionError> {
        let hits = self
            .store
            .query(
                Institution::COLLECTION,
                &[Predicate::where_array_contains(
                    "managerIds",
                    user_id.as_str(),
                )],
            )
            .await?;
        hits.into_iter()
            .map(|stored| Institution::from_stored(stored).map_err(InstitutionError::from))
            .collect()
    }

    pub async fn get(&self, institution_id: &InstitutionId) -> Result<Institution, InstitutionError> {
        match self
            .store
            .get(Institution::COLLECTION, institution_id.as_str())
            .await?
        {
            Some(fields) => Ok(Institution::from_stored(casedesk_store::StoredDocument {
                id: institution_id.as_str().to_owned(),
                fields,
            })?),
            None => Err(DomainError::NotFound.into()),
        }
    }

    /// Read-modify-write of the creator's membership array, plus the legacy
    /// `roleName`/`institutionId` mirrors for pre-migration readers.
    async fn append_creator_membership(
        &self,
        user_id: &UserId,
        membership: &Membership,
    ) -> Result<(), casedesk_store::StoreError> {
        let fields = self
            .store
            .get(User::COLLECTION, user_id.as_str())
            .await?
            .ok_or_else(|| {
                casedesk_store::StoreError::missing_document(User::COLLECTION, user_id.as_str())
            })?;
        let mut user: User = from_document(fields)?;
        user.memberships.push(membership.clone());

        let memberships = serde_json::to_value(&user.memberships)
            .map_err(|e| casedesk_store::StoreError::encode(e.to_string()))?;
        let patch = FieldPatch::new()
            .set("memberships", memberships)
            .set("roleName", membership.role.as_str())
            .set("institutionId", membership.institution_id.as_str());
        self.store
            .update(User::COLLECTION, user_id.as_str(), patch)
            .await
    }
}
