//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod config;
pub mod context;
pub mod login;
pub mod logout;
pub mod password;
pub mod routes;
pub mod signup;
pub mod status;
pub mod visit;

pub use args::OutputFormat;
pub use context::CommandContext;

/// sessiongate - session-gated navigation for a FastAPI dashboard backend
#[derive(Parser, Debug)]
#[command(name = "sessiongate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, json)
    #[arg(
        long,
        global = true,
        env = "SESSIONGATE_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "SESSIONGATE_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Backend base URL (e.g. http://localhost:8000)
    #[arg(long, global = true, env = "SESSIONGATE_API_HOST", hide_env = true)]
    pub api_host: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "SESSIONGATE_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with email and password
    Login {
        /// Account email (prompted when omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,

        /// Account password (prompted when omitted)
        #[arg(long, short = 'p', env = "SESSIONGATE_PASSWORD", hide_env = true)]
        password: Option<String>,
    },

    /// Create an account
    Signup {
        /// Account email
        #[arg(long, short = 'e')]
        email: String,

        /// Display name
        #[arg(long)]
        full_name: Option<String>,

        /// Account password (prompted when omitted)
        #[arg(long, short = 'p', env = "SESSIONGATE_PASSWORD", hide_env = true)]
        password: Option<String>,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Validate the stored session and show who is signed in
    Status,

    /// Navigate to a path and report what the route gate does
    Visit {
        /// Path to open, e.g. /items or /login
        path: String,
    },

    /// List known routes and their access class
    Routes,

    /// Request a password recovery email
    Recover {
        /// Account email
        email: String,
    },

    /// Set a new password using a recovery token
    ResetPassword {
        /// Token from the recovery email
        #[arg(long)]
        token: String,

        /// New password (prompted when omitted)
        #[arg(long, env = "SESSIONGATE_NEW_PASSWORD", hide_env = true)]
        new_password: Option<String>,
    },

    /// Inspect or change the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   sessiongate completion bash > /etc/bash_completion.d/sessiongate
  zsh:    sessiongate completion zsh > \"${fpath[1]}/_sessiongate\"
  fish:   sessiongate completion fish > ~/.config/fish/completions/sessiongate.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Persist the backend URL to the config file
    SetHost {
        /// Backend base URL
        url: String,
    },

    /// Persist the post-signup behaviour
    SetSignupPolicy {
        #[arg(value_enum)]
        policy: args::SignupPolicyArg,
    },
}
