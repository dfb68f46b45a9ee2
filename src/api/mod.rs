pub mod discord_client;
pub mod handlers;
pub mod hypixel_client;
pub mod models;
pub mod mojang_client;
pub mod routes;

pub use discord_client::DiscordClient;
pub use hypixel_client::HypixelClient;
pub use mojang_client::MojangClient;
