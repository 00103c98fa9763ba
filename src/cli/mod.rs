// CLI module for running the server and administrative operations

pub mod create_account;

use clap::{Parser, Subcommand};

pub use create_account::CreateAccountArgs;

/// Gatekeeper authentication service
#[derive(Parser, Debug)]
#[command(name = "gatekeeper")]
#[command(about = "Gatekeeper authentication service", long_about = None)]
pub struct Cli {
    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Create an account in the account database
    CreateAccount(CreateAccountArgs),
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
