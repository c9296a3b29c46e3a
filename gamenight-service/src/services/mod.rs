pub mod database;
pub mod events;
pub mod games;
pub mod locations;
pub mod metrics;

pub use database::MongoDb;
pub use events::EventRepository;
pub use games::{compute_stats, GameRepository};
pub use locations::LocationRepository;
pub use metrics::{get_metrics, init_metrics};
