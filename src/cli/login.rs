//! Login command implementation

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};
use serde::Serialize;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::models::{Credentials, UserProfile};
use crate::error::Result;
use crate::output;
use crate::route::{GateDecision, Route};

#[derive(Serialize)]
pub(crate) struct AuthReport<'a> {
    pub user: Option<&'a UserProfile>,
    pub location: Route,
}

/// Prompt for whatever credentials were not given on the command line
fn collect_credentials(email: Option<String>, password: Option<String>) -> Result<Credentials> {
    let theme = ColorfulTheme::default();

    let email = match email {
        Some(email) => email,
        None => Input::with_theme(&theme)
            .with_prompt("Email")
            .interact_text()?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&theme)
            .with_prompt("Password")
            .interact()?,
    };

    Ok(Credentials::new(email.trim(), password))
}

/// Tell an already signed-in user why the form was skipped
pub(crate) fn report_already_signed_in(ctx: &CommandContext, command: &str) -> Result<()> {
    let state = ctx.session.get();
    if ctx.format == OutputFormat::Json {
        return output::print_json(
            command,
            &AuthReport {
                user: state.user.as_ref(),
                location: ctx.router.current(),
            },
        );
    }

    let name = state.user.as_ref().map(|u| u.email.as_str()).unwrap_or("unknown");
    println!(
        "{} Already signed in as {}. Run '{}' first.",
        "○".dimmed(),
        name.bold(),
        "sessiongate logout".cyan()
    );
    Ok(())
}

/// Run the login command
pub async fn run(opts: &GlobalOptions, email: Option<String>, password: Option<String>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    if let GateDecision::Redirect(_) = ctx.open(Route::Login).await {
        return report_already_signed_in(&ctx, "login");
    }

    let credentials = collect_credentials(email, password)?;
    let user = ctx.auth.login(&credentials).await?;

    if ctx.format == OutputFormat::Json {
        return output::print_json(
            "login",
            &AuthReport {
                user: Some(&user),
                location: ctx.router.current(),
            },
        );
    }

    println!(
        "{} Signed in as {}",
        "✓".green(),
        user.display_name().bold()
    );
    println!("  → {}", ctx.router.current().to_string().cyan());
    Ok(())
}
