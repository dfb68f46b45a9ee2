use anyhow::Result;

use guild_wrapped::cli::Command;
use guild_wrapped::{handle_ingest, handle_process, handle_report, handle_serve, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Ingest => handle_ingest(),
        Command::Process => handle_process(),
        Command::Report => handle_report(),
    }
}
