use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use casedesk_core::{InstitutionId, UserId};
use casedesk_memberships::JoinInstitution;

use crate::app::{AppServices, dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/institutions/:id/join", post(join_institution))
        .route("/users/:id/memberships", get(list_memberships))
}

async fn join_institution(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::JoinInstitutionRequest>,
) -> axum::response::Response {
    let cmd = JoinInstitution {
        institution_id: InstitutionId::from(id),
        role: body.role,
    };
    match services
        .memberships
        .join_institution(principal.principal(), cmd)
        .await
    {
        Ok(membership) => (
            StatusCode::CREATED,
            Json(dto::MembershipResponse::from(membership)),
        )
            .into_response(),
        Err(e) => errors::membership_error_to_response(e),
    }
}

async fn list_memberships(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.memberships.list_memberships(&UserId::from(id)).await {
        Ok(memberships) => Json(
            memberships
                .into_iter()
                .map(dto::MembershipResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::membership_error_to_response(e),
    }
}
