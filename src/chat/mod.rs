pub mod session;
pub mod types;

pub use session::{Conversation, Phase};
pub use types::{ChatMessage, Role};
