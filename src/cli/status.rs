//! Status command implementation

use chrono::{DateTime, TimeDelta, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::output;
use crate::session::SessionState;

#[derive(Serialize)]
struct StatusReport<'a> {
    api_host: &'a str,
    token_file: String,
    #[serde(flatten)]
    session: &'a SessionState,
    token_expires_at: Option<DateTime<Utc>>,
}

/// Validate the stored session and report it
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let state = ctx.start().await;
    let expires_at = ctx.session.token_expiry();

    if ctx.format == OutputFormat::Json {
        return output::print_json(
            "status",
            &StatusReport {
                api_host: &ctx.api_host,
                token_file: ctx.store.path().display().to_string(),
                session: &state,
                token_expires_at: expires_at,
            },
        );
    }

    println!("{}\n", "Session Status".bold());
    println!("Config file: {}", ctx.config_path.display().to_string().cyan());
    println!("Backend: {}", ctx.api_host.cyan());
    println!("Token file: {}", ctx.store.path().display().to_string().dimmed());
    println!();

    match state.user.as_ref().filter(|_| state.is_authenticated()) {
        Some(user) => {
            println!(
                "{} Signed in as {} ({})",
                "✓".green(),
                user.display_name().bold(),
                user.email
            );
            if user.is_superuser {
                println!("  {}", "superuser".yellow());
            }
            if let Some(expires_at) = expires_at {
                let remaining = expires_at.signed_duration_since(Utc::now());
                println!("  {}", describe_expiry(remaining));
            }
        }
        None => {
            println!("{} Not signed in", "○".dimmed());
            println!("  → Run '{}' to sign in", "sessiongate login".cyan());
        }
    }
    println!();

    Ok(())
}

/// Human-readable remaining token lifetime. A server may still accept a
/// token past its `exp` when local expiry checks are off.
fn describe_expiry(remaining: TimeDelta) -> String {
    if remaining < TimeDelta::zero() {
        return "Token expired".to_string();
    }
    format!(
        "Token expires in {}h {}m",
        remaining.num_hours(),
        remaining.num_minutes() % 60
    )
}
