//! `casedesk-institutions` — institutions and their role catalogs.

pub mod error;
pub mod institution;
pub mod roles;
pub mod service;

pub use error::InstitutionError;
pub use institution::Institution;
pub use service::{CreateInstitution, InstitutionService, RoleAddition};
