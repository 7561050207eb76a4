use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use casedesk_core::{InstitutionId, ReportId};
use casedesk_reports::{ReportStatus, StatusFilter, SubmitReport, UpdateReport};

use crate::app::{AppServices, dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/reports", post(submit_report))
        .route("/reports/mine", get(list_my_reports))
        .route("/reports/:id", get(get_report).patch(update_report))
        .route("/institutions/:id/reports", get(list_all_reports))
        .route("/institutions/:id/reports/statistics", get(report_statistics))
}

async fn submit_report(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::SubmitReportRequest>,
) -> axum::response::Response {
    let cmd = SubmitReport {
        institution_id: InstitutionId::from(body.institution_id),
        title: body.title,
        description: body.description,
        occurred_at: Utc::now(),
    };
    match services.reports.submit_report(principal.principal(), cmd).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({"reportId": id.as_str()})),
        )
            .into_response(),
        Err(e) => errors::report_error_to_response(e),
    }
}

async fn get_report(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services
        .reports
        .get_report(principal.principal(), &ReportId::from(id))
        .await
    {
        Ok(report) => Json(dto::ReportResponse::from(report)).into_response(),
        Err(e) => errors::report_error_to_response(e),
    }
}

async fn update_report(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateReportRequest>,
) -> axum::response::Response {
    let status: ReportStatus = match body.status.parse() {
        Ok(status) => status,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let cmd = UpdateReport {
        status,
        manager_response: body.manager_response,
        occurred_at: Utc::now(),
    };
    match services
        .reports
        .update_report(principal.principal(), &ReportId::from(id), cmd)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::report_error_to_response(e),
    }
}

async fn list_my_reports(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::MyReportsQuery>,
) -> axum::response::Response {
    match services
        .reports
        .list_my_reports(
            principal.principal(),
            &InstitutionId::from(query.institution_id),
        )
        .await
    {
        Ok(reports) => Json(
            reports
                .into_iter()
                .map(dto::ReportResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::report_error_to_response(e),
    }
}

async fn list_all_reports(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Query(query): Query<dto::AllReportsQuery>,
) -> axum::response::Response {
    let filter: StatusFilter = match query.status.as_deref() {
        None => StatusFilter::All,
        Some(raw) => match raw.parse() {
            Ok(filter) => filter,
            Err(e) => return errors::domain_error_to_response(e),
        },
    };
    match services
        .reports
        .list_all_reports(principal.principal(), &InstitutionId::from(id), filter)
        .await
    {
        Ok(reports) => Json(
            reports
                .into_iter()
                .map(dto::ReportResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::report_error_to_response(e),
    }
}

async fn report_statistics(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services
        .reports
        .report_statistics(principal.principal(), &InstitutionId::from(id))
        .await
    {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => errors::report_error_to_response(e),
    }
}
