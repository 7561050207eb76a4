use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use casedesk_core::InstitutionId;
use casedesk_institutions::CreateInstitution;

use crate::app::{AppServices, dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/institutions", post(create_institution).get(list_institutions))
        .route("/institutions/find", get(find_institution))
        .route("/institutions/managed", get(list_managed))
        .route("/institutions/:id", get(get_institution))
        .route("/institutions/:id/roles", post(add_roles))
}

async fn create_institution(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateInstitutionRequest>,
) -> axum::response::Response {
    let cmd = CreateInstitution {
        name: body.name,
        roles_input: body.roles,
        occurred_at: Utc::now(),
    };
    match services
        .institutions
        .create_institution(principal.principal(), cmd)
        .await
    {
        Ok(id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({"institutionId": id.as_str()})),
        )
            .into_response(),
        Err(e) => errors::institution_error_to_response(e),
    }
}

async fn add_roles(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AddRolesRequest>,
) -> axum::response::Response {
    match services
        .institutions
        .add_roles(principal.principal(), &InstitutionId::from(id), &body.roles)
        .await
    {
        Ok(outcome) => Json(dto::RoleAdditionResponse::from(outcome)).into_response(),
        Err(e) => errors::institution_error_to_response(e),
    }
}

async fn find_institution(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::FindInstitutionQuery>,
) -> axum::response::Response {
    match services.institutions.find_by_name(&query.name).await {
        Ok(institution) => Json(dto::InstitutionResponse::from(institution)).into_response(),
        Err(e) => errors::institution_error_to_response(e),
    }
}

async fn list_institutions(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.institutions.list().await {
        Ok(institutions) => Json(
            institutions
                .into_iter()
                .map(dto::InstitutionResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::institution_error_to_response(e),
    }
}

async fn list_managed(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services
        .institutions
        .list_managed_by(&principal.principal().user_id)
        .await
    {
        Ok(institutions) => Json(
            institutions
                .into_iter()
                .map(dto::InstitutionResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::institution_error_to_response(e),
    }
}

async fn get_institution(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.institutions.get(&InstitutionId::from(id)).await {
        Ok(institution) => Json(dto::InstitutionResponse::from(institution)).into_response(),
        Err(e) => errors::institution_error_to_response(e),
    }
}
