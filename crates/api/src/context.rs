use casedesk_auth::Principal;

/// Authenticated principal for a request.
///
/// Rebuilt by the auth middleware on every call from the bearer token and a
/// fresh `users` read; never cached across requests.
#[derive(Debug, Clone)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
