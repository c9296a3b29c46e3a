use crate::dtos::{BoundsParams, CreateLocationRequest, LocationResponse, UpdateLocationRequest};
use crate::models::Location;
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

fn location_not_found(id: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Location {} not found", id))
}

pub async fn create_location(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateLocationRequest>,
) -> Result<(StatusCode, Json<LocationResponse>), AppError> {
    let location = state.locations.insert(Location::from(req)).await?;
    Ok((StatusCode::CREATED, Json(location.into())))
}

pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<LocationResponse>>, AppError> {
    let locations = state.locations.find_all().await?;
    Ok(Json(locations.into_iter().map(Into::into).collect()))
}

pub async fn locations_in_bounds(
    State(state): State<AppState>,
    Query(params): Query<BoundsParams>,
) -> Result<Json<Vec<LocationResponse>>, AppError> {
    params.validate()?;
    let venue_types = params
        .venue_types()
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e)))?;

    let locations = state
        .locations
        .find_in_bounds(&params.bounds(), &venue_types)
        .await?;
    Ok(Json(locations.into_iter().map(Into::into).collect()))
}

pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LocationResponse>, AppError> {
    let location = state
        .locations
        .find_by_id(&id)
        .await?
        .ok_or_else(|| location_not_found(&id))?;
    Ok(Json(location.into()))
}

pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateLocationRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    let location = state
        .locations
        .update(&id, req)
        .await?
        .ok_or_else(|| location_not_found(&id))?;
    Ok(Json(location.into()))
}

pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LocationResponse>, AppError> {
    let location = state
        .locations
        .delete(&id)
        .await?
        .ok_or_else(|| location_not_found(&id))?;
    Ok(Json(location.into()))
}
