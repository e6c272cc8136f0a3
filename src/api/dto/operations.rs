/*
 * Responsibility
 * - body of POST /operations (written by a SERVICE caller on behalf of a user)
 * - the list itself is passed through as stored, [{icon, title, url}]
 */
use serde::Deserialize;

use crate::repos::operation_repo::OperationEntry;

#[derive(Debug, Deserialize)]
pub struct SaveOperationsRequest {
    // 0 (or missing) means "not provided".
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub operations: Vec<OperationEntry>,
}

impl SaveOperationsRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.user_id == 0 {
            return Err("User ID");
        }

        Ok(())
    }
}
