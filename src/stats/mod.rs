pub mod discord;
pub mod hypixel;
pub mod wrapped;

pub use discord::{DiscordStats, UserMessageStats};
pub use hypixel::MemberXpStats;
pub use wrapped::WrappedSummary;
