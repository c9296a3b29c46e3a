use crate::catalog::{DetailRecord, RankRecord, SearchRecord};
use crate::dtos::{CollectionStats, GameResponse, PersonalFieldsRequest, SearchParams};
use crate::models::Game;
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

fn game_not_found(id: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Game {} not found", id))
}

/// Pulls the game from BoardGameGeek and stores it with the caller's fields.
pub async fn import_game(
    State(state): State<AppState>,
    Path(bgg_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<PersonalFieldsRequest>,
) -> Result<(StatusCode, Json<GameResponse>), AppError> {
    let details = state.catalog.get_details(bgg_id).await?;
    let game = state
        .games
        .insert(Game::from_catalog(details, req.into()))
        .await?;

    Ok((StatusCode::CREATED, Json(game.into())))
}

pub async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<GameResponse>>, AppError> {
    let games = state.games.find_all().await?;
    Ok(Json(games.into_iter().map(Into::into).collect()))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    let game = state
        .games
        .find_by_id(&id)
        .await?
        .ok_or_else(|| game_not_found(&id))?;
    Ok(Json(game.into()))
}

pub async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<PersonalFieldsRequest>,
) -> Result<Json<GameResponse>, AppError> {
    let game = state
        .games
        .update_personal(&id, req.into())
        .await?
        .ok_or_else(|| game_not_found(&id))?;
    Ok(Json(game.into()))
}

pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    let game = state
        .games
        .delete(&id)
        .await?
        .ok_or_else(|| game_not_found(&id))?;
    tracing::info!(game_id = %id, "Game removed from collection");
    Ok(Json(game.into()))
}

pub async fn collection_stats(
    State(state): State<AppState>,
) -> Result<Json<CollectionStats>, AppError> {
    Ok(Json(state.games.stats().await?))
}

/// Substring search over the local rank index; no network call.
pub async fn search_ranks(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<RankRecord>> {
    Json(state.ranks.search(&params.query).into_iter().cloned().collect())
}

pub async fn get_rank(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RankRecord>, AppError> {
    state
        .ranks
        .get_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No ranked game with id {}", id)))
}

pub async fn search_bgg(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchRecord>>, AppError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("query must not be empty")));
    }
    Ok(Json(state.catalog.search(query).await?))
}

pub async fn bgg_details(
    State(state): State<AppState>,
    Path(bgg_id): Path<i64>,
) -> Result<Json<DetailRecord>, AppError> {
    Ok(Json(state.catalog.get_details(bgg_id).await?))
}
