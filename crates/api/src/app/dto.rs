//! Request/response DTOs and mapping to/from domain types.

use serde::{Deserialize, Serialize};

use casedesk_auth::{Membership, Principal, User};
use casedesk_institutions::{Institution, RoleAddition};
use casedesk_reports::Report;

// ── Requests ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// `manager` or `regular`.
    pub user_type: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateInstitutionRequest {
    pub name: String,
    /// Comma-separated role labels; the first becomes the manager's role.
    pub roles: String,
}

#[derive(Debug, Deserialize)]
pub struct AddRolesRequest {
    pub roles: String,
}

#[derive(Debug, Deserialize)]
pub struct FindInstitutionQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinInstitutionRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportRequest {
    pub institution_id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
    pub status: String,
    #[serde(default)]
    pub manager_response: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyReportsQuery {
    pub institution_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AllReportsQuery {
    /// Status name or the `all` sentinel; absent means `all`.
    pub status: Option<String>,
}

// ── Responses ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionResponse {
    pub institution_id: String,
    pub institution_name: String,
    pub manager_ids: Vec<String>,
    pub manager_role_name: String,
    pub roles: Vec<String>,
    pub created_at: i64,
}

impl From<Institution> for InstitutionResponse {
    fn from(inst: Institution) -> Self {
        Self {
            institution_id: inst.institution_id.into_inner(),
            institution_name: inst.institution_name,
            manager_ids: inst.manager_ids.into_iter().map(|id| id.into_inner()).collect(),
            manager_role_name: inst.manager_role_name.as_str().to_owned(),
            roles: inst.roles.iter().map(|r| r.as_str().to_owned()).collect(),
            created_at: inst.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoleAdditionResponse {
    pub added: Vec<String>,
    pub duplicates: Vec<String>,
}

impl From<RoleAddition> for RoleAdditionResponse {
    fn from(outcome: RoleAddition) -> Self {
        Self {
            added: outcome.added.iter().map(|r| r.as_str().to_owned()).collect(),
            duplicates: outcome
                .duplicates
                .iter()
                .map(|r| r.as_str().to_owned())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub institution_id: String,
    pub role: String,
    pub is_manager: bool,
}

impl From<Membership> for MembershipResponse {
    fn from(m: Membership) -> Self {
        Self {
            institution_id: m.institution_id.into_inner(),
            role: m.role.as_str().to_owned(),
            is_manager: m.is_manager,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub report_id: String,
    pub user_id: String,
    pub institution_id: String,
    pub institution_name: String,
    pub user_role: String,
    pub title: String,
    pub description: String,
    pub status: &'static str,
    pub manager_response: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            report_id: report.report_id.into_inner(),
            user_id: report.user_id.into_inner(),
            institution_id: report.institution_id.into_inner(),
            institution_name: report.institution_name,
            user_role: report.user_role.as_str().to_owned(),
            title: report.title,
            description: report.description,
            status: report.status.as_str(),
            manager_response: report.manager_response,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub user_type: &'static str,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id.into_inner(),
            email: user.email,
            full_name: user.full_name,
            user_type: user.user_type.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalResponse {
    pub user_id: String,
    pub user_type: &'static str,
    pub memberships: Vec<MembershipResponse>,
}

impl From<&Principal> for PrincipalResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            user_id: principal.user_id.as_str().to_owned(),
            user_type: principal.user_type.as_str(),
            memberships: principal
                .memberships
                .iter()
                .cloned()
                .map(MembershipResponse::from)
                .collect(),
        }
    }
}
