pub mod location;

pub use location::{Coordinates, LocationState};
