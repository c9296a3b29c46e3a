use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled game night: one game at one location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub game_id: String,
    pub location_id: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub start_time: DateTime<Utc>,
    #[serde(default, with = "optional_bson_datetime")]
    pub end_time: Option<DateTime<Utc>>,
    pub max_players: Option<i32>,
    pub description: Option<String>,
    pub color: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        title: String,
        game_id: String,
        location_id: String,
        start_time: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            game_id,
            location_id,
            start_time,
            end_time: None,
            max_players: None,
            description: None,
            color: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// `Option<DateTime<Utc>>` stored as a BSON datetime or null.
pub(crate) mod optional_bson_datetime {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value
            .map(bson::DateTime::from_chrono)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Ok(Option::<bson::DateTime>::deserialize(deserializer)?.map(|dt| dt.to_chrono()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mongodb::bson;

    #[test]
    fn end_time_round_trips_through_bson() {
        let start = Utc.with_ymd_and_hms(2026, 3, 14, 19, 0, 0).unwrap();
        let mut event = Event::new(
            "Catan night".to_string(),
            "game-1".to_string(),
            "loc-1".to_string(),
            start,
        );
        event.end_time = Some(start + chrono::Duration::hours(3));

        let doc = bson::to_document(&event).unwrap();
        assert!(matches!(doc.get("end_time"), Some(bson::Bson::DateTime(_))));

        let back: Event = bson::from_document(doc).unwrap();
        assert_eq!(back.start_time, start);
        assert_eq!(back.end_time, event.end_time);
    }

    #[test]
    fn missing_end_time_reads_as_none() {
        let start = Utc.with_ymd_and_hms(2026, 3, 14, 19, 0, 0).unwrap();
        let event = Event::new("t".into(), "g".into(), "l".into(), start);

        let mut doc = bson::to_document(&event).unwrap();
        doc.remove("end_time");

        let back: Event = bson::from_document(doc).unwrap();
        assert_eq!(back.end_time, None);
    }
}
