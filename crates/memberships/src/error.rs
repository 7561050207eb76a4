use thiserror::Error;

use casedesk_core::DomainError;
use casedesk_store::StoreError;

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
