use crate::models::{Game, PersonalFields};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Owner-editable fields, used both when importing and when patching a game.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PersonalFieldsRequest {
    pub owned: Option<bool>,
    pub notes: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Complexity must be between 1 and 5"))]
    pub complexity: Option<i32>,
}

impl From<PersonalFieldsRequest> for PersonalFields {
    fn from(req: PersonalFieldsRequest) -> Self {
        Self {
            owned: req.owned,
            notes: req.notes,
            complexity: req.complexity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgg_id: Option<i64>,
    pub year_published: Option<i32>,
    pub min_players: Option<i32>,
    pub max_players: Option<i32>,
    pub playing_time: Option<i32>,
    pub min_age: Option<i32>,
    pub description: Option<String>,
    pub categories: Vec<String>,
    pub mechanics: Vec<String>,
    pub publisher: Option<String>,
    pub owned: bool,
    pub notes: Option<String>,
    pub complexity: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Game> for GameResponse {
    fn from(game: Game) -> Self {
        Self {
            id: game.id,
            name: game.name,
            bgg_id: game.bgg_id,
            year_published: game.year_published,
            min_players: game.min_players,
            max_players: game.max_players,
            playing_time: game.playing_time,
            min_age: game.min_age,
            description: game.description,
            categories: game.categories,
            mechanics: game.mechanics,
            publisher: game.publisher,
            owned: game.owned,
            notes: game.notes,
            complexity: game.complexity,
            created_at: game.created_at.to_rfc3339(),
            updated_at: game.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedCount {
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrowthPoint {
    pub x: String,
    pub y: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub games_by_category: Vec<NamedCount>,
    pub complexity_distribution: Vec<NamedCount>,
    pub collection_growth: Vec<GrowthPoint>,
    pub total_games: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_outside_one_to_five_is_rejected() {
        for complexity in [0, 6, -1] {
            let req = PersonalFieldsRequest {
                complexity: Some(complexity),
                ..Default::default()
            };
            let errors = req.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("complexity"));
        }
    }

    #[test]
    fn empty_personal_fields_are_valid() {
        assert!(PersonalFieldsRequest::default().validate().is_ok());

        let req = PersonalFieldsRequest {
            complexity: Some(5),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn stats_serialize_in_camel_case() {
        let stats = CollectionStats {
            games_by_category: vec![],
            complexity_distribution: vec![],
            collection_growth: vec![GrowthPoint {
                x: "2026-01".to_string(),
                y: 2,
            }],
            total_games: 2,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalGames"], 2);
        assert_eq!(json["collectionGrowth"][0]["x"], "2026-01");
    }
}
