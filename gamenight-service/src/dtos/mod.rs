pub mod auth;
pub mod events;
pub mod games;
pub mod locations;

pub use auth::VerifyTokenRequest;
pub use events::{CreateEventRequest, EventResponse, UpdateEventRequest};
pub use games::{
    CollectionStats, GameResponse, GrowthPoint, NamedCount, PersonalFieldsRequest, SearchParams,
};
pub use locations::{BoundsParams, CreateLocationRequest, LocationResponse, UpdateLocationRequest};
