//! sessiongate - session-gated navigation for a FastAPI dashboard backend

use clap::{CommandFactory, Parser};

mod auth;
mod cli;
mod client;
mod config;
mod error;
mod output;
mod route;
mod session;
mod store;

use cli::args::GlobalOptions;
use cli::{Cli, Commands, ConfigCommands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Login { email, password } => cli::login::run(&opts, email, password).await,
        Commands::Signup {
            email,
            full_name,
            password,
        } => cli::signup::run(&opts, email, full_name, password).await,
        Commands::Logout => cli::logout::run(&opts),
        Commands::Status => cli::status::run(&opts).await,
        Commands::Visit { path } => cli::visit::run(&opts, &path).await,
        Commands::Routes => cli::routes::run(opts.format),
        Commands::Recover { email } => cli::password::recover(&opts, &email).await,
        Commands::ResetPassword {
            token,
            new_password,
        } => cli::password::reset(&opts, token, new_password).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Show => cli::config::show(&opts),
            ConfigCommands::SetHost { url } => cli::config::set_host(&opts, &url),
            ConfigCommands::SetSignupPolicy { policy } => {
                cli::config::set_signup_policy(&opts, policy.into())
            }
        },
        Commands::Completion { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "sessiongate",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
