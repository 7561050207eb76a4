use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};

use casedesk_auth::UserType;
use casedesk_core::UserId;
use casedesk_identity::{Register, SessionToken};

use crate::app::{AppServices, dto, errors};
use crate::context::PrincipalContext;
use crate::middleware::extract_bearer;

pub fn public_router() -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/sign-out", post(sign_out))
}

pub fn protected_router() -> Router {
    Router::new()
        .route("/me", get(me))
        .route("/users/:id", get(get_user))
}

async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let user_type: UserType = match body.user_type.parse() {
        Ok(t) => t,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .identity
        .register(Register {
            email: body.email,
            password: body.password,
            full_name: body.full_name,
            user_type,
        })
        .await
    {
        Ok(user_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({"userId": user_id.as_str()})),
        )
            .into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}

async fn sign_in(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SignInRequest>,
) -> axum::response::Response {
    match services.identity.sign_in(&body.email, &body.password).await {
        Ok(signed_in) => Json(serde_json::json!({
            "token": signed_in.session.token.as_str(),
            "userId": signed_in.user.user_id.as_str(),
            "userType": signed_in.user.user_type.as_str(),
            "fullName": signed_in.user.full_name,
        }))
        .into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}

async fn sign_out(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let token = match extract_bearer(&headers) {
        Ok(token) => token,
        Err(status) => return status.into_response(),
    };
    match services.identity.sign_out(&SessionToken::new(token)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}

async fn me(Extension(principal): Extension<PrincipalContext>) -> axum::response::Response {
    Json(dto::PrincipalResponse::from(principal.principal())).into_response()
}

async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.identity.get_user(&UserId::from(id)).await {
        Ok(user) => Json(dto::UserResponse::from(user)).into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}
