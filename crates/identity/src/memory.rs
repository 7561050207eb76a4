//! In-memory authentication provider.
//!
//! Dev/test stand-in for an external hosted provider. Credentials live in
//! process memory; hashing and lockout policy are the hosted provider's
//! concern, not modeled here.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use casedesk_core::UserId;

use crate::provider::{AuthProvider, AuthSession, ProviderError, SessionToken};

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    password: String,
}

#[derive(Debug, Default)]
pub struct InMemoryAuthProvider {
    // Keyed by lowercased email; providers treat addresses
    // case-insensitively.
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<String, UserId>>,
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_failure() -> ProviderError {
        ProviderError::Unavailable("lock poisoned".to_owned())
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn create_user(&self, email: &str, password: &str) -> Result<UserId, ProviderError> {
        let key = email.trim().to_ascii_lowercase();
        let mut accounts = self.accounts.write().map_err(|_| Self::lock_failure())?;
        if accounts.contains_key(&key) {
            return Err(ProviderError::EmailTaken);
        }
        let user_id = UserId::new(Uuid::now_v7().to_string());
        accounts.insert(
            key,
            Account {
                user_id: user_id.clone(),
                password: password.to_owned(),
            },
        );
        Ok(user_id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ProviderError> {
        let key = email.trim().to_ascii_lowercase();
        let user_id = {
            let accounts = self.accounts.read().map_err(|_| Self::lock_failure())?;
            let account = accounts.get(&key).ok_or(ProviderError::InvalidCredentials)?;
            if account.password != password {
                return Err(ProviderError::InvalidCredentials);
            }
            account.user_id.clone()
        };

        let token = SessionToken::new(Uuid::now_v7().to_string());
        let mut sessions = self.sessions.write().map_err(|_| Self::lock_failure())?;
        sessions.insert(token.as_str().to_owned(), user_id.clone());
        Ok(AuthSession { user_id, token })
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<(), ProviderError> {
        let mut sessions = self.sessions.write().map_err(|_| Self::lock_failure())?;
        sessions.remove(token.as_str());
        Ok(())
    }

    async fn current_user(&self, token: &SessionToken) -> Result<Option<UserId>, ProviderError> {
        let sessions = self.sessions.read().map_err(|_| Self::lock_failure())?;
        Ok(sessions.get(token.as_str()).cloned())
    }
}
