use crate::dtos::{CreateEventRequest, EventResponse, UpdateEventRequest};
use crate::models::Event;
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

fn event_not_found(id: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Event {} not found", id))
}

pub async fn create_event(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let event = state.events.insert(Event::from(req)).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventResponse>>, AppError> {
    let events = state.events.find_all().await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state
        .events
        .find_by_id(&id)
        .await?
        .ok_or_else(|| event_not_found(&id))?;
    Ok(Json(event.into()))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state
        .events
        .update(&id, req)
        .await?
        .ok_or_else(|| event_not_found(&id))?;
    Ok(Json(event.into()))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state
        .events
        .delete(&id)
        .await?
        .ok_or_else(|| event_not_found(&id))?;
    Ok(Json(event.into()))
}
