use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use casedesk_auth::RoleName;
use casedesk_core::{DomainResult, InstitutionId, ReportId, UserId, validation};
use casedesk_store::{Document, StoreError, StoredDocument, from_document, to_document};

use crate::status::ReportStatus;

/// The `reports` collection document.
///
/// `institution_name` and `user_role` are denormalized at submission so
/// reads never need a join; they are snapshots, not references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Store-assigned; not part of the document body.
    #[serde(skip)]
    pub report_id: ReportId,
    pub user_id: UserId,
    pub institution_id: InstitutionId,
    pub institution_name: String,
    pub user_role: RoleName,
    pub title: String,
    pub description: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub manager_response: String,
    /// Milliseconds since epoch; absent fields read as 0 for ordering.
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Report {
    pub const COLLECTION: &'static str = "reports";

    /// Validate inputs and assemble a pending report.
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        user_id: UserId,
        institution_id: InstitutionId,
        institution_name: String,
        user_role: RoleName,
        title: &str,
        description: &str,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let title = validation::require_trimmed("title", title)?;
        let description = validation::require_trimmed("description", description)?;
        let millis = occurred_at.timestamp_millis();
        Ok(Self {
            report_id: ReportId::default(),
            user_id,
            institution_id,
            institution_name,
            user_role,
            title,
            description,
            status: ReportStatus::Pending,
            manager_response: String::new(),
            created_at: millis,
            updated_at: millis,
        })
    }

    pub fn to_document(&self) -> Result<Document, StoreError> {
        to_document(self)
    }

    pub fn from_stored(stored: StoredDocument) -> Result<Self, StoreError> {
        let mut report: Self = from_document(stored.fields)?;
        report.report_id = ReportId::from(stored.id);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casedesk_core::DomainError;

    fn submit(title: &str, description: &str) -> DomainResult<Report> {
        Report::submit(
            UserId::from("u-bob"),
            InstitutionId::from("i-acme"),
            "Acme".to_owned(),
            RoleName::new("HR"),
            title,
            description,
            Utc::now(),
        )
    }

    #[test]
    fn submission_starts_pending_with_empty_response() {
        let report = submit("Broken chair", "Chair in room 3 is broken").unwrap();
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.manager_response, "");
        assert_eq!(report.created_at, report.updated_at);
    }

    #[test]
    fn blank_title_or_description_is_rejected() {
        assert!(matches!(submit("  ", "desc").unwrap_err(), DomainError::Validation(_)));
        assert!(matches!(submit("title", " ").unwrap_err(), DomainError::Validation(_)));
    }

    #[test]
    fn document_round_trip_restores_the_id_from_the_store() {
        let report = submit("Broken chair", "Chair in room 3 is broken").unwrap();
        let fields = report.to_document().unwrap();
        assert_eq!(fields["institutionName"], serde_json::json!("Acme"));
        assert_eq!(fields["status"], serde_json::json!("pending"));

        let restored = Report::from_stored(StoredDocument {
            id: "r-1".to_owned(),
            fields,
        })
        .unwrap();
        assert_eq!(restored.report_id, ReportId::from("r-1"));
        assert_eq!(restored.title, report.title);
    }

    #[test]
    fn missing_timestamps_read_as_zero() {
        let mut fields = submit("t", "d").unwrap().to_document().unwrap();
        fields.remove("createdAt");
        fields.remove("updatedAt");
        let restored = Report::from_stored(StoredDocument {
            id: "r-1".to_owned(),
            fields,
        })
        .unwrap();
        assert_eq!(restored.created_at, 0);
        assert_eq!(restored.updated_at, 0);
    }

    #[test]
    fn out_of_domain_status_fails_decoding() {
        let mut fields = submit("t", "d").unwrap().to_document().unwrap();
        fields.insert("status".to_owned(), serde_json::json!("escalated"));
        let err = Report::from_stored(StoredDocument {
            id: "r-1".to_owned(),
            fields,
        })
        .unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
