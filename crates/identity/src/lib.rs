//! `casedesk-identity` — authentication provider boundary and the identity
//! service.
//!
//! Binds an authenticated credential to a `users` document and produces the
//! request-scoped [`casedesk_auth::Principal`] every other service consumes.

pub mod error;
pub mod memory;
pub mod provider;
pub mod service;

pub use error::IdentityError;
pub use memory::InMemoryAuthProvider;
pub use provider::{AuthProvider, AuthSession, ProviderError, SessionToken};
pub use service::{IdentityService, Register, SignedIn};
