use super::database::MongoDb;
use crate::dtos::UpdateEventRequest;
use crate::models::Event;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct EventRepository {
    collection: Collection<Event>,
}

impl EventRepository {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            collection: db.events(),
        }
    }

    pub async fn insert(&self, event: Event) -> Result<Event, AppError> {
        self.collection.insert_one(&event, None).await?;
        tracing::info!(event_id = %event.id, start_time = %event.start_time, "Event scheduled");
        Ok(event)
    }

    /// All events, earliest start first.
    pub async fn find_all(&self) -> Result<Vec<Event>, AppError> {
        let options = FindOptions::builder().sort(doc! { "start_time": 1 }).build();
        let cursor = self.collection.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    pub async fn update(
        &self,
        id: &str,
        changes: UpdateEventRequest,
    ) -> Result<Option<Event>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": update_document(changes) },
                options,
            )
            .await?)
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Event>, AppError> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "_id": id }, None)
            .await?)
    }
}

fn update_document(changes: UpdateEventRequest) -> Document {
    let mut set = Document::new();
    if let Some(title) = changes.title {
        set.insert("title", title);
    }
    if let Some(game_id) = changes.game_id {
        set.insert("game_id", game_id);
    }
    if let Some(location_id) = changes.location_id {
        set.insert("location_id", location_id);
    }
    if let Some(start_time) = changes.start_time {
        set.insert("start_time", bson::DateTime::from_chrono(start_time));
    }
    if let Some(end_time) = changes.end_time {
        set.insert("end_time", bson::DateTime::from_chrono(end_time));
    }
    if let Some(max_players) = changes.max_players {
        set.insert("max_players", max_players);
    }
    if let Some(description) = changes.description {
        set.insert("description", description);
    }
    if let Some(color) = changes.color {
        set.insert("color", color);
    }
    set.insert("updated_at", bson::DateTime::now());
    set
}
