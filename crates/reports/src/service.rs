//! Report operations: submission, triage, listings, statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use casedesk_auth::{Principal, authorize};
use casedesk_core::{DomainError, InstitutionId, ReportId};
use casedesk_institutions::Institution;
use casedesk_store::{DocumentStore, FieldPatch, Predicate, StoredDocument};

use crate::error::ReportError;
use crate::report::Report;
use crate::status::{ReportStatus, StatusFilter};

/// Command: SubmitReport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    pub institution_id: InstitutionId,
    pub title: String,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateReport. Status and response are the only mutable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub status: ReportStatus,
    /// May be empty; stored as-is.
    pub manager_response: String,
    pub occurred_at: DateTime<Utc>,
}

/// Per-status counts for one institution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportStatistics {
    pub total: usize,
    pub pending: usize,
    pub investigating: usize,
    pub verified: usize,
    pub rejected: usize,
}

impl ReportStatistics {
    fn record(&mut self, status: ReportStatus) {
        self.total += 1;
        match status {
            ReportStatus::Pending => self.pending += 1,
            ReportStatus::Investigating => self.investigating += 1,
            ReportStatus::Verified => self.verified += 1,
            ReportStatus::Rejected => self.rejected += 1,
        }
    }
}

pub struct ReportService<S> {
    store: S,
}

impl<S> ReportService<S>
where
    S: DocumentStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist a pending report, snapshotting the author's role and the
    /// institution's name at submission time.
    pub async fn submit_report(
        &self,
        principal: &Principal,
        cmd: SubmitReport,
    ) -> Result<ReportId, ReportError> {
        if !authorize::may_submit_report(principal, &cmd.institution_id) {
            return Err(DomainError::PermissionDenied.into());
        }
        let role = principal
            .membership_in(&cmd.institution_id)
            .map(|m| m.role.clone())
            .ok_or(DomainError::PermissionDenied)?;

        let institution = self.load_institution(&cmd.institution_id).await?;
        let report = Report::submit(
            principal.user_id.clone(),
            cmd.institution_id,
            institution.institution_name,
            role,
            &cmd.title,
            &cmd.description,
            cmd.occurred_at,
        )?;
        let id = self
            .store
            .add(Report::COLLECTION, report.to_document()?)
            .await?;

        tracing::info!(report_id = %id, institution_id = %report.institution_id, "report submitted");
        Ok(ReportId::from(id))
    }

    /// Set status and manager response; `updatedAt` follows. A single
    /// atomic document update.
    pub async fn update_report(
        &self,
        principal: &Principal,
        report_id: &ReportId,
        cmd: UpdateReport,
    ) -> Result<(), ReportError> {
        let report = self.load_report(report_id).await?;
        let institution = self.load_institution(&report.institution_id).await?;
        if !authorize::may_update_report(principal, &institution.manager_ids) {
            return Err(DomainError::PermissionDenied.into());
        }

        let patch = FieldPatch::new()
            .set("status", cmd.status.as_str())
            .set("managerResponse", cmd.manager_response.as_str())
            .set("updatedAt", cmd.occurred_at.timestamp_millis());
        self.store
            .update(Report::COLLECTION, report_id.as_str(), patch)
            .await?;

        tracing::info!(report_id = %report_id, status = %cmd.status, "report updated");
        Ok(())
    }

    /// Single-report fetch for the author or a manager of its institution.
    pub async fn get_report(
        &self,
        principal: &Principal,
        report_id: &ReportId,
    ) -> Result<Report, ReportError> {
        let report = self.load_report(report_id).await?;
        let institution = self.load_institution(&report.institution_id).await?;
        if !authorize::may_read_report(principal, &report.user_id, &institution.manager_ids) {
            return Err(DomainError::PermissionDenied.into());
        }
        Ok(report)
    }

    /// The caller's own reports in one institution, newest first.
    pub async fn list_my_reports(
        &self,
        principal: &Principal,
        institution_id: &InstitutionId,
    ) -> Result<Vec<Report>, ReportError> {
        let hits = self
            .store
            .query(
                Report::COLLECTION,
                &[
                    Predicate::where_equal("userId", principal.user_id.as_str()),
                    Predicate::where_equal("institutionId", institution_id.as_str()),
                ],
            )
            .await?;
        let mut reports = decode_reports(hits)?;
        sort_newest_first(&mut reports);
        Ok(reports)
    }

    /// Every report in an institution, optionally filtered by status,
    /// newest first. Manager-only.
    pub async fn list_all_reports(
        &self,
        principal: &Principal,
        institution_id: &InstitutionId,
        filter: StatusFilter,
    ) -> Result<Vec<Report>, ReportError> {
        let institution = self.load_institution(institution_id).await?;
        if !authorize::may_manage_institution(principal, &institution.manager_ids) {
            return Err(DomainError::PermissionDenied.into());
        }

        let hits = self
            .store
            .query(
                Report::COLLECTION,
                &[Predicate::where_equal("institutionId", institution_id.as_str())],
            )
            .await?;
        let mut reports = decode_reports(hits)?;
        reports.retain(|r| filter.matches(r.status));
        sort_newest_first(&mut reports);
        Ok(reports)
    }

    /// Counts by status plus total. Manager-only; computed client-side, the
    /// store has no aggregation primitive.
    pub async fn report_statistics(
        &self,
        principal: &Principal,
        institution_id: &InstitutionId,
    ) -> Result<ReportStatistics, ReportError> {
        let institution = self.load_institution(institution_id).await?;
        if !authorize::may_manage_institution(principal, &institution.manager_ids) {
            return Err(DomainError::PermissionDenied.into());
        }

        let hits = self
            .store
            .query(
                Report::COLLECTION,
                &[Predicate::where_equal("institutionId", institution_id.as_str())],
            )
            .await?;
        let mut stats = ReportStatistics::default();
        for report in decode_reports(hits)? {
            stats.record(report.status);
        }
        Ok(stats)
    }

    async fn load_report(&self, report_id: &ReportId) -> Result<Report, ReportError> {
        match self.store.get(Report::COLLECTION, report_id.as_str()).await? {
            Some(fields) => Ok(Report::from_stored(StoredDocument {
                id: report_id.as_str().to_owned(),
                fields,
            })?),
            None => Err(DomainError::NotFound.into()),
        }
    }

    async fn load_institution(
        &self,
        institution_id: &InstitutionId,
    ) -> Result<Institution, ReportError> {
        match self
            .store
            .get(Institution::COLLECTION, institution_id.as_str())
            .await?
        {
            Some(fields) => Ok(Institution::from_stored(StoredDocument {
                id: institution_id.as_str().to_owned(),
                fields,
            })?),
            None => Err(DomainError::NotFound.into()),
        }
    }
}

fn decode_reports(hits: Vec<StoredDocument>) -> Result<Vec<Report>, ReportError> {
    hits.into_iter()
        .map(|stored| Report::from_stored(stored).map_err(ReportError::from))
        .collect()
}

/// In-memory descending `createdAt` sort; the store promises no ordering.
fn sort_newest_first(reports: &mut [Report]) {
    reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
