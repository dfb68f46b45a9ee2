use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "guild-wrapped stats backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Fetch guild data from Hypixel and message history from Discord into the cache
    Ingest,
    /// Calculate wrapped statistics from cached data and store them in the database
    Process,
    /// Print the Wordle leaderboard report from cached messages
    Report,
}
