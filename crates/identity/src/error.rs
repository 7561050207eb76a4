use thiserror::Error;

use casedesk_core::{DomainError, UserId};
use casedesk_store::StoreError;

use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The credential was provisioned but the profile write failed. The
    /// credential is left in place; retrying the profile write under the
    /// same id is safe.
    #[error("credential {user_id} provisioned but profile write failed")]
    OrphanedCredential {
        user_id: UserId,
        #[source]
        source: StoreError,
    },

    /// The credential authenticates but no `users` document exists. The
    /// session is closed before this is surfaced.
    #[error("no profile exists for this account")]
    MissingProfile,
}
