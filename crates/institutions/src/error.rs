use thiserror::Error;

use casedesk_core::{DomainError, InstitutionId};
use casedesk_store::StoreError;

#[derive(Debug, Error)]
pub enum InstitutionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The institution document was written but the creator's membership
    /// update failed. `institution_id` names the surviving write so the
    /// caller can reconcile; the membership update is keyed on the user id
    /// and safe to retry.
    #[error("institution {institution_id} created but creator membership update failed")]
    PartialSuccess {
        institution_id: InstitutionId,
        #[source]
        source: StoreError,
    },
}
