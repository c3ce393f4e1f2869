pub mod forms;

pub use forms::{EventForm, TravelForm};
