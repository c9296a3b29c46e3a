pub mod auth;
pub mod events;
pub mod games;
pub mod health;
pub mod locations;
