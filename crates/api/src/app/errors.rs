use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use casedesk_core::DomainError;
use casedesk_identity::{IdentityError, ProviderError};
use casedesk_institutions::InstitutionError;
use casedesk_memberships::MembershipError;
use casedesk_reports::ReportError;
use casedesk_store::StoreError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::PermissionDenied => {
            json_error(StatusCode::FORBIDDEN, "forbidden", "permission denied")
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::AlreadyJoined => json_error(
            StatusCode::CONFLICT,
            "already_joined",
            "already joined this institution",
        ),
        DomainError::InvalidRole(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_role", msg),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::MissingDocument { .. } => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        other => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            other.to_string(),
        ),
    }
}

pub fn provider_error_to_response(err: ProviderError) -> axum::response::Response {
    match err {
        ProviderError::EmailTaken => {
            json_error(StatusCode::CONFLICT, "email_taken", err.to_string())
        }
        ProviderError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", err.to_string())
        }
        ProviderError::Unavailable(msg) => {
            json_error(StatusCode::BAD_GATEWAY, "identity_provider_error", msg)
        }
    }
}

pub fn identity_error_to_response(err: IdentityError) -> axum::response::Response {
    match err {
        IdentityError::Domain(e) => domain_error_to_response(e),
        IdentityError::Provider(e) => provider_error_to_response(e),
        IdentityError::Store(e) => store_error_to_response(e),
        IdentityError::OrphanedCredential { .. } => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "partial_success",
            err.to_string(),
        ),
        IdentityError::MissingProfile => {
            json_error(StatusCode::UNAUTHORIZED, "missing_profile", err.to_string())
        }
    }
}

pub fn institution_error_to_response(err: InstitutionError) -> axum::response::Response {
    match err {
        InstitutionError::Domain(e) => domain_error_to_response(e),
        InstitutionError::Store(e) => store_error_to_response(e),
        InstitutionError::PartialSuccess { .. } => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "partial_success",
            err.to_string(),
        ),
    }
}

pub fn membership_error_to_response(err: MembershipError) -> axum::response::Response {
    match err {
        MembershipError::Domain(e) => domain_error_to_response(e),
        MembershipError::Store(e) => store_error_to_response(e),
    }
}

pub fn report_error_to_response(err: ReportError) -> axum::response::Response {
    match err {
        ReportError::Domain(e) => domain_error_to_response(e),
        ReportError::Store(e) => store_error_to_response(e),
    }
}
