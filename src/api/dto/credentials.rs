/*
 * Responsibility
 * - request/response DTOs for registration (/api/users) and login (/tokens)
 * - both take the same {login, password} body
 */
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsRequest {
    /// Err carries the name of the missing parameter.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.login.trim().is_empty() {
            return Err("login");
        }
        if self.password.is_empty() {
            return Err("password");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
