use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::repos::card_repo::CardRow;

#[derive(Debug, Serialize)]
pub struct CardsResponse {
    pub cards: Vec<CardResponse>,
}

#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub id: i64,
    pub number: String,
    pub balance: i64,
    pub issuer: String,
    pub holder: String,
    pub user_id: i64,
    pub status: String,
    pub created: DateTime<Utc>,
}

impl From<CardRow> for CardResponse {
    fn from(row: CardRow) -> Self {
        Self {
            id: row.id,
            number: row.number,
            balance: row.balance,
            issuer: row.issuer,
            holder: row.holder,
            user_id: row.user_id,
            status: row.status,
            created: row.created,
        }
    }
}
