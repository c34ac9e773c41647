use tap_core::config::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user: String,
    pub role: Role,
}

use crate::error::AuthError;

/// Endpoint handlers that mutate state require `role == admin`; reads
/// allow either role (spec §4.8 step 5).
pub fn require_role(principal: &Principal, minimum: Role) -> Result<(), AuthError> {
    match minimum {
        Role::Viewer => Ok(()),
        Role::Admin if principal.role == Role::Admin => Ok(()),
        Role::Admin => Err(AuthError::Forbidden),
    }
}

#[cfg(test)]
#[path = "principal_tests.rs"]
mod tests;
