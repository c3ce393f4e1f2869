pub mod client;
pub mod geocode;
pub mod pipeline;
pub mod types;

pub use client::ApiClient;
pub use geocode::GeocodeClient;
pub use pipeline::{ApiCommand, ApiEvent, ApiPipeline};
pub use types::{
    Advice, ChatReply, EventAdviceRequest, EventType, HistoryMessage, TravelAdviceRequest,
    VehicleType,
};
