use crate::catalog::DetailRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A board game in the collection: BGG metadata plus the owner's own fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub bgg_id: Option<i64>,
    pub year_published: Option<i32>,
    pub min_players: Option<i32>,
    pub max_players: Option<i32>,
    pub playing_time: Option<i32>,
    pub min_age: Option<i32>,
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub mechanics: Vec<String>,
    pub publisher: Option<String>,
    #[serde(default)]
    pub owned: bool,
    pub notes: Option<String>,
    pub complexity: Option<i32>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Fields the owner controls; everything else comes from BGG.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalFields {
    pub owned: Option<bool>,
    pub notes: Option<String>,
    pub complexity: Option<i32>,
}

impl Game {
    pub fn from_catalog(details: DetailRecord, personal: PersonalFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: details.name,
            bgg_id: Some(details.bgg_id),
            year_published: details.year_published,
            min_players: details.min_players,
            max_players: details.max_players,
            playing_time: details.playing_time,
            min_age: details.min_age,
            description: details.description,
            categories: details.categories,
            mechanics: details.mechanics,
            publisher: details.publisher,
            owned: personal.owned.unwrap_or(false),
            notes: personal.notes,
            complexity: personal.complexity,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> DetailRecord {
        DetailRecord {
            bgg_id: 13,
            name: "Catan".to_string(),
            year_published: Some(1995),
            min_players: Some(3),
            max_players: Some(4),
            playing_time: Some(120),
            min_age: Some(10),
            description: None,
            categories: vec!["Strategy".to_string(), "Economic".to_string()],
            mechanics: vec![],
            publisher: Some("KOSMOS".to_string()),
        }
    }

    #[test]
    fn import_merges_personal_fields() {
        let game = Game::from_catalog(
            details(),
            PersonalFields {
                owned: Some(true),
                notes: Some("Family favourite".to_string()),
                complexity: Some(2),
            },
        );

        assert_eq!(game.bgg_id, Some(13));
        assert_eq!(game.name, "Catan");
        assert!(game.owned);
        assert_eq!(game.complexity, Some(2));
        assert_eq!(game.categories, vec!["Strategy", "Economic"]);
        assert_eq!(game.created_at, game.updated_at);
    }

    #[test]
    fn owned_defaults_to_false() {
        let game = Game::from_catalog(details(), PersonalFields::default());
        assert!(!game.owned);
        assert!(game.notes.is_none());
    }
}
