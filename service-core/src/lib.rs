//! service-core: shared infrastructure for the GameNight Hub services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
