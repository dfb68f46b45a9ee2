pub mod models;
pub mod progress;

pub use models::{ChannelMessage, Guild, GuildMember, GuildResponse, MessageResponse};
pub use progress::FetchProgress;
