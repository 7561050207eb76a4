//! Role-catalog input handling.
//!
//! Role input arrives as a comma-separated string. Labels are compared ASCII
//! case-insensitively; the first casing seen wins and is stored.

use casedesk_auth::RoleName;

/// Split on `,`, trim each segment, drop empties.
pub fn parse_role_input(input: &str) -> Vec<RoleName> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RoleName::new)
        .collect()
}

/// Drop case-insensitive repeats, keeping the first casing seen.
pub fn dedup_roles(roles: Vec<RoleName>) -> Vec<RoleName> {
    let mut out: Vec<RoleName> = Vec::with_capacity(roles.len());
    for role in roles {
        if !out.iter().any(|seen| seen.matches(role.as_str())) {
            out.push(role);
        }
    }
    out
}

/// Split `candidates` into additions and duplicates against `existing`.
/// A candidate repeating an earlier candidate counts as a duplicate too.
pub fn partition_new_roles(
    existing: &[RoleName],
    candidates: Vec<RoleName>,
) -> (Vec<RoleName>, Vec<RoleName>) {
    let mut added: Vec<RoleName> = Vec::new();
    let mut duplicates: Vec<RoleName> = Vec::new();
    for candidate in candidates {
        let known = existing
            .iter()
            .chain(added.iter())
            .any(|r| r.matches(candidate.as_str()));
        if known {
            duplicates.push(candidate);
        } else {
            added.push(candidate);
        }
    }
    (added, duplicates)
}
