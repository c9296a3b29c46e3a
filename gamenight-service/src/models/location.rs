use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VenueType {
    Cafe,
    Store,
    Home,
    PublicSpace,
    Other,
}

impl VenueType {
    pub const ALL: [VenueType; 5] = [
        VenueType::Cafe,
        VenueType::Store,
        VenueType::Home,
        VenueType::PublicSpace,
        VenueType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VenueType::Cafe => "cafe",
            VenueType::Store => "store",
            VenueType::Home => "home",
            VenueType::PublicSpace => "public_space",
            VenueType::Other => "other",
        }
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VenueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VenueType::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("Invalid venue type: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub venue_type: Option<VenueType>,
    pub capacity: Option<i32>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub description: Option<String>,
    pub host_name: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Location {
    pub fn new(name: String, latitude: f64, longitude: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            latitude,
            longitude,
            address: None,
            venue_type: None,
            capacity: None,
            amenities: Vec::new(),
            description: None,
            host_name: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Axis-aligned map viewport, south-west to north-east corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub sw_lat: f64,
    pub sw_lng: f64,
    pub ne_lat: f64,
    pub ne_lng: f64,
}

impl Bounds {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.sw_lat..=self.ne_lat).contains(&latitude)
            && (self.sw_lng..=self.ne_lng).contains(&longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venue_type_round_trips_through_str() {
        for venue in VenueType::ALL {
            assert_eq!(venue.as_str().parse::<VenueType>(), Ok(venue));
        }
        assert!("bar".parse::<VenueType>().is_err());
        assert!("Cafe".parse::<VenueType>().is_err());
    }

    #[test]
    fn venue_type_serializes_snake_case() {
        let json = serde_json::to_string(&VenueType::PublicSpace).unwrap();
        assert_eq!(json, "\"public_space\"");
    }

    #[test]
    fn bounds_are_inclusive() {
        let bounds = Bounds {
            sw_lat: 40.0,
            sw_lng: -74.1,
            ne_lat: 40.9,
            ne_lng: -73.7,
        };
        assert!(bounds.contains(40.0, -74.1));
        assert!(bounds.contains(40.7, -73.9));
        assert!(!bounds.contains(41.0, -73.9));
        assert!(!bounds.contains(40.7, -73.0));
    }
}
