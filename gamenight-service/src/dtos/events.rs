use crate::models::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// `startTime`/`endTime` are RFC 3339 timestamps.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Game is required"))]
    pub game_id: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 100, message = "Max players must be between 1 and 100"))]
    pub max_players: Option<i32>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl From<CreateEventRequest> for Event {
    fn from(req: CreateEventRequest) -> Self {
        let mut event = Event::new(req.title, req.game_id, req.location_id, req.start_time);
        event.end_time = req.end_time;
        event.max_players = req.max_players;
        event.description = req.description;
        event.color = req.color;
        event
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Game is required"))]
    pub game_id: Option<String>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 100, message = "Max players must be between 1 and 100"))]
    pub max_players: Option<i32>,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub game_id: String,
    pub location_id: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub max_players: Option<i32>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            game_id: event.game_id,
            location_id: event.location_id,
            start_time: event.start_time.to_rfc3339(),
            end_time: event.end_time.map(|t| t.to_rfc3339()),
            max_players: event.max_players,
            description: event.description,
            color: event.color,
            created_at: event.created_at.to_rfc3339(),
            updated_at: event.updated_at.to_rfc3339(),
        }
    }
}
