use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "trackbuddy")]
#[command(about = "TrackBuddy - habit and journal tracking server", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database URL (in-memory store when unset)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start API server
    Serve {
        /// Port to listen on (defaults to PORT or 5000)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Initialize database
    InitDb,

    /// Mint a session token for a user
    Token {
        /// User ID
        user_id: Uuid,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_command() {
        let user = Uuid::new_v4();
        let cli = Cli::try_parse_from(["trackbuddy", "token", &user.to_string()]).unwrap();

        assert!(matches!(cli.command, Commands::Token { user_id } if user_id == user));
    }

    #[test]
    fn test_rejects_malformed_user_id() {
        assert!(Cli::try_parse_from(["trackbuddy", "token", "nope"]).is_err());
    }

    #[test]
    fn test_parse_serve_port() {
        let cli = Cli::try_parse_from(["trackbuddy", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080) }));
    }
}
