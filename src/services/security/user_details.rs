use std::collections::HashSet;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_USER: &str = "USER";
pub const ROLE_SERVICE: &str = "SERVICE";

/// Resolved identity of an authenticated request.
///
/// Produced once per request by the authentication stage and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetails {
    pub id: i64,
    pub login: String,
    pub roles: HashSet<String>,
}

impl UserDetails {
    pub fn new<I, R>(id: i64, login: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            id,
            login: login.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Any-of match, exact and case-sensitive.
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.roles.contains(*role))
    }
}
