pub mod event;
pub mod game;
pub mod location;

pub use event::Event;
pub use game::{Game, PersonalFields};
pub use location::{Bounds, Location, VenueType};
