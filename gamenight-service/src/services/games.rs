use super::database::MongoDb;
use crate::dtos::{CollectionStats, GrowthPoint, NamedCount};
use crate::models::{Game, PersonalFields};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Collection,
};
use service_core::error::AppError;
use std::collections::BTreeMap;

#[derive(Clone)]
pub struct GameRepository {
    collection: Collection<Game>,
}

impl GameRepository {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            collection: db.games(),
        }
    }

    pub async fn insert(&self, game: Game) -> Result<Game, AppError> {
        self.collection.insert_one(&game, None).await?;
        tracing::info!(game_id = %game.id, bgg_id = ?game.bgg_id, name = %game.name, "Game added to collection");
        Ok(game)
    }

    pub async fn find_all(&self) -> Result<Vec<Game>, AppError> {
        let cursor = self.collection.find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Game>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    /// Applies the provided personal fields and returns the updated game.
    pub async fn update_personal(
        &self,
        id: &str,
        fields: PersonalFields,
    ) -> Result<Option<Game>, AppError> {
        let mut set = Document::new();
        if let Some(owned) = fields.owned {
            set.insert("owned", owned);
        }
        if let Some(notes) = fields.notes {
            set.insert("notes", notes);
        }
        if let Some(complexity) = fields.complexity {
            set.insert("complexity", complexity);
        }
        set.insert("updated_at", mongodb::bson::DateTime::now());

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await?)
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Game>, AppError> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "_id": id }, None)
            .await?)
    }

    pub async fn stats(&self) -> Result<CollectionStats, AppError> {
        let games = self.find_all().await?;
        Ok(compute_stats(&games))
    }
}

pub fn complexity_label(level: i32) -> &'static str {
    match level {
        1 => "Light",
        2 => "Light-Medium",
        3 => "Medium",
        4 => "Medium-Heavy",
        5 => "Heavy",
        _ => "Unknown",
    }
}

/// Aggregates the dashboard figures for a collection.
///
/// Categories and complexities are listed in first-seen order. Growth is
/// bucketed by UTC calendar month of `created_at`, ascending.
pub fn compute_stats(games: &[Game]) -> CollectionStats {
    let mut categories: Vec<NamedCount> = Vec::new();
    let mut complexities: Vec<(i32, u64)> = Vec::new();
    let mut growth: BTreeMap<String, u64> = BTreeMap::new();

    for game in games {
        for category in &game.categories {
            match categories.iter_mut().find(|c| &c.name == category) {
                Some(entry) => entry.value += 1,
                None => categories.push(NamedCount {
                    name: category.clone(),
                    value: 1,
                }),
            }
        }

        if let Some(level) = game.complexity {
            match complexities.iter_mut().find(|(l, _)| *l == level) {
                Some((_, count)) => *count += 1,
                None => complexities.push((level, 1)),
            }
        }

        let month = game.created_at.format("%Y-%m").to_string();
        *growth.entry(month).or_insert(0) += 1;
    }

    CollectionStats {
        games_by_category: categories,
        complexity_distribution: complexities
            .into_iter()
            .map(|(level, value)| NamedCount {
                name: format!("{} - {}", level, complexity_label(level)),
                value,
            })
            .collect(),
        collection_growth: growth
            .into_iter()
            .map(|(x, y)| GrowthPoint { x, y })
            .collect(),
        total_games: games.len() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DetailRecord;
    use chrono::{TimeZone, Utc};

    fn game(categories: &[&str], complexity: Option<i32>, year: i32, month: u32) -> Game {
        let mut game = Game::from_catalog(
            DetailRecord {
                bgg_id: 1,
                name: "Test".to_string(),
                year_published: None,
                min_players: None,
                max_players: None,
                playing_time: None,
                min_age: None,
                description: None,
                categories: categories.iter().map(|c| c.to_string()).collect(),
                mechanics: vec![],
                publisher: None,
            },
            PersonalFields {
                complexity,
                ..Default::default()
            },
        );
        game.created_at = Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap();
        game
    }

    #[test]
    fn empty_collection() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total_games, 0);
        assert!(stats.games_by_category.is_empty());
        assert!(stats.complexity_distribution.is_empty());
        assert!(stats.collection_growth.is_empty());
    }

    #[test]
    fn counts_categories_in_first_seen_order() {
        let games = [
            game(&["Strategy", "Economic"], None, 2026, 1),
            game(&["Party"], None, 2026, 1),
            game(&["Economic"], None, 2026, 1),
        ];

        let stats = compute_stats(&games);
        let names: Vec<_> = stats
            .games_by_category
            .iter()
            .map(|c| (c.name.as_str(), c.value))
            .collect();
        assert_eq!(names, vec![("Strategy", 1), ("Economic", 2), ("Party", 1)]);
    }

    #[test]
    fn labels_complexity_levels() {
        let games = [
            game(&[], Some(3), 2026, 1),
            game(&[], Some(1), 2026, 1),
            game(&[], Some(3), 2026, 1),
            game(&[], None, 2026, 1),
        ];

        let stats = compute_stats(&games);
        assert_eq!(
            stats.complexity_distribution,
            vec![
                NamedCount {
                    name: "3 - Medium".to_string(),
                    value: 2
                },
                NamedCount {
                    name: "1 - Light".to_string(),
                    value: 1
                },
            ]
        );
        assert_eq!(complexity_label(4), "Medium-Heavy");
        assert_eq!(complexity_label(9), "Unknown");
    }

    #[test]
    fn growth_is_sorted_by_month() {
        let games = [
            game(&[], None, 2026, 3),
            game(&[], None, 2025, 12),
            game(&[], None, 2026, 3),
            game(&[], None, 2026, 1),
        ];

        let stats = compute_stats(&games);
        assert_eq!(
            stats.collection_growth,
            vec![
                GrowthPoint { x: "2025-12".to_string(), y: 1 },
                GrowthPoint { x: "2026-01".to_string(), y: 1 },
                GrowthPoint { x: "2026-03".to_string(), y: 2 },
            ]
        );
        assert_eq!(stats.total_games, 4);
    }
}
