//! `casedesk-reports` — report submission and triage.

pub mod error;
pub mod report;
pub mod service;
pub mod status;

pub use error::ReportError;
pub use report::Report;
pub use service::{ReportService, ReportStatistics, SubmitReport, UpdateReport};
pub use status::{ReportStatus, StatusFilter};
