//! `casedesk-memberships` — attaching users to institutions.

pub mod error;
pub mod service;

pub use error::MembershipError;
pub use service::{JoinInstitution, MembershipService};
