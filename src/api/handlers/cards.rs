/*
 * Responsibility
 * - GET /cards for an authenticated caller
 *   - USER: own cards
 *   - ADMIN (without USER): every card
 *   - anyone else: 403
 */
use axum::{Json, extract::State};

use crate::{
    api::{
        dto::cards::{CardResponse, CardsResponse},
        extractors::CurrentUser,
    },
    error::AppError,
    repos::card_repo,
    services::security::{ROLE_ADMIN, ROLE_USER},
    state::AppState,
};

const CARDS_LIMIT: i64 = 50;

pub async fn list_cards(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<CardsResponse>, AppError> {
    let rows = if user.has_any_role(&[ROLE_USER]) {
        card_repo::list_by_user(&state.db, user.id, CARDS_LIMIT).await?
    } else if user.has_any_role(&[ROLE_ADMIN]) {
        card_repo::list_all(&state.db, CARDS_LIMIT).await?
    } else {
        return Err(AppError::Forbidden);
    };

    Ok(Json(CardsResponse {
        cards: rows.into_iter().map(CardResponse::from).collect(),
    }))
}
