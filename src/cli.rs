use clap::{Parser, Subcommand};

/// Tokend — bearer token lifecycle service
#[derive(Parser)]
#[command(name = "tokend", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Manage bearer tokens
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// Inspect the audit trail
    Audit {
        /// User whose audit entries to list
        #[arg(long)]
        user_id: String,
    },
}

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Issue a new token for a user (prints the raw secret once)
    Generate {
        #[arg(long)]
        user_id: String,
    },
    /// Rotate a token, retiring the old value
    Rotate {
        /// The current raw token value
        #[arg(long)]
        token: String,
    },
    /// Permanently invalidate a token
    Invalidate {
        /// The raw token value
        #[arg(long)]
        token: String,
    },
    /// List a user's tokens
    List {
        #[arg(long)]
        user_id: String,
        /// Only show active tokens
        #[arg(long)]
        active: bool,
    },
}
