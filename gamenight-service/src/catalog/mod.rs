pub mod client;
pub mod error;
pub mod rank_index;
pub mod throttle;
pub mod xml;

pub use client::BggClient;
pub use error::CatalogError;
pub use rank_index::{RankIndex, RankRecord};
pub use throttle::RequestThrottle;
pub use xml::{DetailRecord, SearchRecord};
