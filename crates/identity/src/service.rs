//! Registration, sign-in, and principal resolution.

use serde_json::Value;

use casedesk_auth::{Principal, User, UserType};
use casedesk_core::{DomainError, UserId, validation};
use casedesk_store::{Document, DocumentStore, from_document, to_document};

use crate::error::IdentityError;
use crate::provider::{AuthProvider, SessionToken};

/// Providers reject shorter passwords; checked here so the credential is
/// never provisioned for an input that cannot succeed.
const MIN_PASSWORD_LEN: usize = 6;

/// Command: Register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub user_type: UserType,
}

/// A successful sign-in: the open session plus the user's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub session: crate::provider::AuthSession,
    pub user: User,
}

pub struct IdentityService<S, P> {
    store: S,
    provider: P,
}

impl<S, P> IdentityService<S, P>
where
    S: DocumentStore,
    P: AuthProvider,
{
    pub fn new(store: S, provider: P) -> Self {
        Self { store, provider }
    }

    /// Provision a credential, then persist the `users` document.
    ///
    /// The two writes are not transactional: a store failure after the
    /// credential exists surfaces [`IdentityError::OrphanedCredential`] and
    /// leaves the credential in place.
    pub async fn register(&self, cmd: Register) -> Result<UserId, IdentityError> {
        let email = validation::require_trimmed("email", &cmd.email)?;
        if !validation::is_valid_email(&email) {
            return Err(DomainError::validation("email address is not valid").into());
        }
        let full_name = validation::require_trimmed("fullName", &cmd.full_name)?;
        if cmd.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ))
            .into());
        }

        let user_id = self.provider.create_user(&email, &cmd.password).await?;
        let user = User {
            user_id: user_id.clone(),
            email,
            full_name,
            user_type: cmd.user_type,
            memberships: Vec::new(),
        };

        match self
            .store
            .set(User::COLLECTION, user_id.as_str(), registration_document(&user)?)
            .await
        {
            Ok(()) => {
                tracing::info!(user_id = %user_id, user_type = user.user_type.as_str(), "user registered");
                Ok(user_id)
            }
            Err(source) => {
                tracing::warn!(user_id = %user_id, error = %source, "profile write failed after credential creation");
                Err(IdentityError::OrphanedCredential { user_id, source })
            }
        }
    }

    /// Authenticate and load the profile. A credential without a profile is
    /// signed out again and fails with [`IdentityError::MissingProfile`].
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, IdentityError> {
        let session = self.provider.sign_in(email.trim(), password).await?;
        match self.store.get(User::COLLECTION, session.user_id.as_str()).await? {
            Some(fields) => {
                let user: User = from_document(fields)?;
                Ok(SignedIn { session, user })
            }
            None => {
                tracing::warn!(user_id = %session.user_id, "credential authenticated but no profile exists");
                self.provider.sign_out(&session.token).await?;
                Err(IdentityError::MissingProfile)
            }
        }
    }

    pub async fn sign_out(&self, token: &SessionToken) -> Result<(), IdentityError> {
        self.provider.sign_out(token).await?;
        Ok(())
    }

    /// Resolve a bearer token to a fresh [`Principal`].
    pub async fn authenticate(&self, token: &SessionToken) -> Result<Principal, IdentityError> {
        match self.provider.current_user(token).await? {
            Some(user_id) => self.load_principal(&user_id).await,
            None => Err(crate::provider::ProviderError::InvalidCredentials.into()),
        }
    }

    /// Read the `users` document and build the request-scoped principal.
    /// Never cached; callers re-invoke per request.
    pub async fn load_principal(&self, user_id: &UserId) -> Result<Principal, IdentityError> {
        let user = self.get_user(user_id).await?;
        Ok(Principal::from_user(&user))
    }

    pub async fn get_user(&self, user_id: &UserId) -> Result<User, IdentityError> {
        match self.store.get(User::COLLECTION, user_id.as_str()).await? {
            Some(fields) => Ok(from_document(fields)?),
            None => Err(DomainError::NotFound.into()),
        }
    }
}

/// Registration document: the user shape plus the nulled legacy mirrors
/// older readers expect. Mirrors are write-only.
fn registration_document(user: &User) -> Result<Document, IdentityError> {
    let mut fields = to_document(user)?;
    fields.insert("roleName".to_owned(), Value::Null);
    fields.insert("institutionId".to_owned(), Value::Null);
    fields.insert("userRole".to_owned(), Value::Null);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use casedesk_store::{
        Document, FieldPatch, InMemoryDocumentStore, Predicate, StoreError, StoredDocument,
    };

    use crate::memory::InMemoryAuthProvider;

    fn service() -> IdentityService<Arc<InMemoryDocumentStore>, Arc<InMemoryAuthProvider>> {
        IdentityService::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(InMemoryAuthProvider::new()),
        )
    }

    fn register_cmd(email: &str) -> Register {
        Register {
            email: email.to_owned(),
            password: "secret1".to_owned(),
            full_name: "Alice Example".to_owned(),
            user_type: UserType::Manager,
        }
    }

    #[tokio::test]
    async fn register_persists_profile_with_empty_memberships() {
        let svc = service();
        let user_id = svc.register(register_cmd("alice@x.com")).await.unwrap();

        let user = svc.get_user(&user_id).await.unwrap();
        assert_eq!(user.email, "alice@x.com");
        assert_eq!(user.full_name, "Alice Example");
        assert_eq!(user.user_type, UserType::Manager);
        assert!(user.memberships.is_empty());
    }

    #[tokio::test]
    async fn register_writes_nulled_legacy_mirrors() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let svc = IdentityService::new(store.clone(), Arc::new(InMemoryAuthProvider::new()));
        let user_id = svc.register(register_cmd("alice@x.com")).await.unwrap();

        let fields = store.get(User::COLLECTION, user_id.as_str()).await.unwrap().unwrap();
        assert_eq!(fields["roleName"], Value::Null);
        assert_eq!(fields["institutionId"], Value::Null);
        assert_eq!(fields["userRole"], Value::Null);
    }

    #[tokio::test]
    async fn register_rejects_bad_inputs_before_touching_the_provider() {
        let svc = service();
        for (email, password, full_name) in [
            ("not-an-email", "secret1", "Alice"),
            ("alice@x.com", "short", "Alice"),
            ("alice@x.com", "secret1", "   "),
        ] {
            let err = svc
                .register(Register {
                    email: email.to_owned(),
                    password: password.to_owned(),
                    full_name: full_name.to_owned(),
                    user_type: UserType::Regular,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, IdentityError::Domain(DomainError::Validation(_))));
        }
        // No credential was created, so the address is still free.
        svc.register(register_cmd("alice@x.com")).await.unwrap();
    }

    #[tokio::test]
    async fn sign_in_returns_session_and_profile() {
        let svc = service();
        let user_id = svc.register(register_cmd("alice@x.com")).await.unwrap();

        let signed_in = svc.sign_in("alice@x.com", "secret1").await.unwrap();
        assert_eq!(signed_in.user.user_id, user_id);

        let principal = svc.authenticate(&signed_in.session.token).await.unwrap();
        assert_eq!(principal.user_id, user_id);
        assert_eq!(principal.user_type, UserType::Manager);
    }

    #[tokio::test]
    async fn credential_without_profile_is_signed_out() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let provider = Arc::new(InMemoryAuthProvider::new());
        provider.create_user("ghost@x.com", "secret1").await.unwrap();
        let svc = IdentityService::new(store, provider.clone());

        let err = svc.sign_in("ghost@x.com", "secret1").await.unwrap_err();
        assert!(matches!(err, IdentityError::MissingProfile));
        // The session opened during sign-in must be gone again.
        let direct = provider.sign_in("ghost@x.com", "secret1").await.unwrap();
        svc.sign_out(&direct.token).await.unwrap();
        assert_eq!(provider.current_user(&direct.token).await.unwrap(), None);
    }

    /// Store whose writes always fail; reads succeed with nothing.
    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn get(&self, _: &str, _: &str) -> Result<Option<Document>, StoreError> {
            Ok(None)
        }

        async fn add(&self, _: &str, _: Document) -> Result<String, StoreError> {
            Err(StoreError::backend("write refused"))
        }

        async fn set(&self, _: &str, _: &str, _: Document) -> Result<(), StoreError> {
            Err(StoreError::backend("write refused"))
        }

        async fn update(&self, _: &str, _: &str, _: FieldPatch) -> Result<(), StoreError> {
            Err(StoreError::backend("write refused"))
        }

        async fn query(&self, _: &str, _: &[Predicate]) -> Result<Vec<StoredDocument>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn profile_write_failure_surfaces_orphaned_credential() {
        let provider = Arc::new(InMemoryAuthProvider::new());
        let svc = IdentityService::new(FailingStore, provider.clone());

        let err = svc.register(register_cmd("alice@x.com")).await.unwrap_err();
        let IdentityError::OrphanedCredential { user_id, .. } = err else {
            panic!("expected OrphanedCredential, got {err:?}");
        };
        // The credential survives for later reconciliation.
        let session = provider.sign_in("alice@x.com", "secret1").await.unwrap();
        assert_eq!(session.user_id, user_id);
    }
}
