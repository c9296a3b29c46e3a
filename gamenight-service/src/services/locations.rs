use super::database::MongoDb;
use crate::dtos::UpdateLocationRequest;
use crate::models::{Bounds, Location, VenueType};
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Collection,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct LocationRepository {
    collection: Collection<Location>,
}

impl LocationRepository {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            collection: db.locations(),
        }
    }

    pub async fn insert(&self, location: Location) -> Result<Location, AppError> {
        self.collection.insert_one(&location, None).await?;
        tracing::info!(location_id = %location.id, name = %location.name, "Location created");
        Ok(location)
    }

    pub async fn find_all(&self) -> Result<Vec<Location>, AppError> {
        let cursor = self.collection.find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Location>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    /// Locations inside `bounds`, optionally restricted to `venue_types`.
    pub async fn find_in_bounds(
        &self,
        bounds: &Bounds,
        venue_types: &[VenueType],
    ) -> Result<Vec<Location>, AppError> {
        let filter = bounds_filter(bounds, venue_types);
        let cursor = self.collection.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn update(
        &self,
        id: &str,
        changes: UpdateLocationRequest,
    ) -> Result<Option<Location>, AppError> {
        let set = update_document(changes)?;
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await?)
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Location>, AppError> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "_id": id }, None)
            .await?)
    }
}

fn bounds_filter(bounds: &Bounds, venue_types: &[VenueType]) -> Document {
    let mut filter = doc! {
        "latitude": { "$gte": bounds.sw_lat, "$lte": bounds.ne_lat },
        "longitude": { "$gte": bounds.sw_lng, "$lte": bounds.ne_lng },
    };
    if !venue_types.is_empty() {
        let types: Vec<&str> = venue_types.iter().map(VenueType::as_str).collect();
        filter.insert("venue_type", doc! { "$in": types });
    }
    filter
}

fn update_document(changes: UpdateLocationRequest) -> Result<Document, AppError> {
    let mut set = Document::new();
    if let Some(name) = changes.name {
        set.insert("name", name);
    }
    if let Some(latitude) = changes.latitude {
        set.insert("latitude", latitude);
    }
    if let Some(longitude) = changes.longitude {
        set.insert("longitude", longitude);
    }
    if let Some(address) = changes.address {
        set.insert("address", address);
    }
    if let Some(venue_type) = changes.venue_type {
        set.insert("venue_type", venue_type.as_str());
    }
    if let Some(capacity) = changes.capacity {
        set.insert("capacity", capacity);
    }
    if let Some(amenities) = changes.amenities {
        set.insert(
            "amenities",
            bson::to_bson(&amenities).map_err(|e| AppError::InternalError(e.into()))?,
        );
    }
    if let Some(description) = changes.description {
        set.insert("description", description);
    }
    if let Some(host_name) = changes.host_name {
        set.insert("host_name", host_name);
    }
    set.insert("updated_at", bson::DateTime::now());
    Ok(set)
}
