use crate::models::{Bounds, Location, VenueType};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
    pub address: Option<String>,
    pub venue_type: Option<VenueType>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub description: Option<String>,
    pub host_name: Option<String>,
}

impl From<CreateLocationRequest> for Location {
    fn from(req: CreateLocationRequest) -> Self {
        let mut location = Location::new(req.name, req.latitude, req.longitude);
        location.address = req.address;
        location.venue_type = req.venue_type;
        location.capacity = req.capacity;
        location.amenities = req.amenities.unwrap_or_default();
        location.description = req.description;
        location.host_name = req.host_name;
        location
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub venue_type: Option<VenueType>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub description: Option<String>,
    pub host_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BoundsParams {
    #[validate(range(min = -90.0, max = 90.0))]
    pub sw_lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub sw_lng: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub ne_lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub ne_lng: f64,
    /// Comma-separated venue types, e.g. `cafe,store`.
    pub venue_type: Option<String>,
}

impl BoundsParams {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            sw_lat: self.sw_lat,
            sw_lng: self.sw_lng,
            ne_lat: self.ne_lat,
            ne_lng: self.ne_lng,
        }
    }

    /// Parsed venue-type filter; empty means no filter.
    pub fn venue_types(&self) -> Result<Vec<VenueType>, String> {
        self.venue_type
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<VenueType>)
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub venue_type: Option<VenueType>,
    pub capacity: Option<i32>,
    pub amenities: Vec<String>,
    pub description: Option<String>,
    pub host_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            name: location.name,
            latitude: location.latitude,
            longitude: location.longitude,
            address: location.address,
            venue_type: location.venue_type,
            capacity: location.capacity,
            amenities: location.amenities,
            description: location.description,
            host_name: location.host_name,
            created_at: location.created_at.to_rfc3339(),
            updated_at: location.updated_at.to_rfc3339(),
        }
    }
}
