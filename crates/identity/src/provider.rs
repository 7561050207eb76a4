//! Authentication provider contract.
//!
//! The provider owns credentials and sessions; the core never sees
//! passwords beyond passing them through. Every method is a suspension
//! point; cancellation is by dropping the returned future.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use casedesk_core::UserId;

/// Opaque bearer token identifying a live provider session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An authenticated provider session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: UserId,
    pub token: SessionToken,
}

/// Authentication provider failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("authentication provider failure: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Provision a credential; returns the provider-assigned user id.
    async fn create_user(&self, email: &str, password: &str) -> Result<UserId, ProviderError>;

    /// Authenticate and open a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ProviderError>;

    /// Terminate a session. Unknown tokens succeed (idempotent).
    async fn sign_out(&self, token: &SessionToken) -> Result<(), ProviderError>;

    /// Resolve a session token to its user, if the session is live.
    async fn current_user(&self, token: &SessionToken) -> Result<Option<UserId>, ProviderError>;
}

#[async_trait]
impl<P> AuthProvider for Arc<P>
where
    P: AuthProvider + ?Sized,
{
    async fn create_user(&self, email: &str, password: &str) -> Result<UserId, ProviderError> {
        (**self).create_user(email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ProviderError> {
        (**self).sign_in(email, password).await
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<(), ProviderError> {
        (**self).sign_out(token).await
    }

    async fn current_user(&self, token: &SessionToken) -> Result<Option<UserId>, ProviderError> {
        (**self).current_user(token).await
    }
}
