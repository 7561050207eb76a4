//! `casedesk-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod principal;
pub mod role;
pub mod user;

pub use authorize::{
    may_create_institution, may_join_institution, may_manage_institution, may_read_report,
    may_submit_report, may_update_report,
};
pub use principal::Principal;
pub use role::RoleName;
pub use user::{Membership, User, UserType};
