mod advisor_panel;
mod input_bar;
mod location_input;
mod message_list;

pub use advisor_panel::{EventAdvisorPanel, TravelAdvisorPanel};
pub use input_bar::InputBar;
pub use location_input::LocationInput;
pub use message_list::MessageList;
