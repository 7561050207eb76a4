//! Application wiring: store, provider, services, router.

use std::sync::Arc;

use axum::{Extension, Router};

use casedesk_identity::{IdentityService, InMemoryAuthProvider};
use casedesk_institutions::InstitutionService;
use casedesk_memberships::MembershipService;
use casedesk_reports::ReportService;
use casedesk_store::InMemoryDocumentStore;

pub mod dto;
pub mod errors;
pub mod routes;

pub type Store = Arc<InMemoryDocumentStore>;
pub type Provider = Arc<InMemoryAuthProvider>;

/// Service wiring shared by all handlers.
pub struct AppServices {
    pub identity: IdentityService<Store, Provider>,
    pub institutions: InstitutionService<Store>,
    pub memberships: MembershipService<Store>,
    pub reports: ReportService<Store>,
}

/// Build the application with in-memory infrastructure (dev/test).
pub fn build_app() -> Router {
    let store: Store = Arc::new(InMemoryDocumentStore::new());
    let provider: Provider = Arc::new(InMemoryAuthProvider::new());
    build_app_with(store, provider)
}

pub fn build_app_with(store: Store, provider: Provider) -> Router {
    let services = Arc::new(AppServices {
        identity: IdentityService::new(store.clone(), provider.clone()),
        institutions: InstitutionService::new(store.clone()),
        memberships: MembershipService::new(store.clone()),
        reports: ReportService::new(store),
    });

    let protected = Router::new()
        .merge(routes::identity::protected_router())
        .merge(routes::institutions::router())
        .merge(routes::memberships::router())
        .merge(routes::reports::router())
        .layer(axum::middleware::from_fn_with_state(
            services.clone(),
            crate::middleware::auth_middleware,
        ));

    Router::new()
        .merge(routes::identity::public_router())
        .merge(protected)
        .layer(Extension(services))
}
