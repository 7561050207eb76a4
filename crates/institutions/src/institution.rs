use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use casedesk_auth::RoleName;
use casedesk_core::{DomainError, DomainResult, InstitutionId, UserId, validation};
use casedesk_store::{Document, StoreError, StoredDocument, from_document, to_document};

use crate::roles::dedup_roles;

/// The `institutions` collection document.
///
/// Invariants held from construction onward:
/// - `institution_name` is non-empty after trimming;
/// - `manager_ids` is non-empty;
/// - `roles` is non-empty and case-insensitively distinct;
/// - `manager_role_name` appears in `roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    /// Store-assigned; not part of the document body.
    #[serde(skip)]
    pub institution_id: InstitutionId,
    pub institution_name: String,
    pub manager_ids: Vec<UserId>,
    pub manager_role_name: RoleName,
    pub roles: Vec<RoleName>,
    /// Milliseconds since epoch.
    pub created_at: i64,
}

impl Institution {
    pub const COLLECTION: &'static str = "institutions";

    /// Validate and assemble a new institution. The first role becomes the
    /// creating manager's role.
    pub fn create(
        name: &str,
        roles: Vec<RoleName>,
        manager: UserId,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let institution_name = validation::require_trimmed("institutionName", name)?;
        let roles = dedup_roles(roles);
        let Some(manager_role_name) = roles.first().cloned() else {
            return Err(DomainError::validation("at least one role is required"));
        };
        Ok(Self {
            institution_id: InstitutionId::default(),
            institution_name,
            manager_ids: vec![manager],
            manager_role_name,
            roles,
            created_at: created_at.timestamp_millis(),
        })
    }

    pub fn is_managed_by(&self, user_id: &UserId) -> bool {
        self.manager_ids.contains(user_id)
    }

    /// Case-insensitive full-string name match (lookup contract).
    pub fn matches_name(&self, name: &str) -> bool {
        self.institution_name.eq_ignore_ascii_case(name.trim())
    }

    /// Roles a regular user may take; the manager role is reserved.
    pub fn open_roles(&self) -> impl Iterator<Item = &RoleName> {
        self.roles
            .iter()
            .filter(|r| !r.matches(self.manager_role_name.as_str()))
    }

    /// Resolve a requested join role against the catalog, returning the
    /// catalog's stored casing.
    pub fn resolve_join_role(&self, requested: &str) -> DomainResult<RoleName> {
        let Some(role) = self.roles.iter().find(|r| r.matches(requested)) else {
            return Err(DomainError::invalid_role(format!(
                "role '{requested}' does not exist in this institution"
            )));
        };
        if role.matches(self.manager_role_name.as_str()) {
            return Err(DomainError::invalid_role(format!(
                "role '{requested}' is reserved for institution managers"
            )));
        }
        Ok(role.clone())
    }

    /// Document body including the legacy scalar `managerId` mirror for
    /// pre-migration readers. The mirror is write-only.
    pub fn to_document(&self) -> Result<Document, StoreError> {
        let mut fields = to_document(self)?;
        if let Some(first) = self.manager_ids.first() {
            fields.insert(
                "managerId".to_owned(),
                Value::String(first.as_str().to_owned()),
            );
        }
        Ok(fields)
    }

    pub fn from_stored(stored: StoredDocument) -> Result<Self, StoreError> {
        let mut institution: Self = from_document(stored.fields)?;
        institution.institution_id = InstitutionId::from(stored.id);
        Ok(institution)
    }
}
