//! Signup command implementation

use colored::Colorize;
use dialoguer::{Password, theme::ColorfulTheme};

use crate::auth::SignupOutcome;
use crate::cli::args::GlobalOptions;
use crate::cli::login::report_already_signed_in;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::models::Registration;
use crate::error::Result;
use crate::output;
use crate::route::{GateDecision, Route};

/// Run the signup command
pub async fn run(
    opts: &GlobalOptions,
    email: String,
    full_name: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    if let GateDecision::Redirect(_) = ctx.open(Route::Signup).await {
        return report_already_signed_in(&ctx, "signup");
    }

    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let registration = Registration {
        email: email.trim().to_string(),
        password,
        full_name: full_name.filter(|name| !name.trim().is_empty()),
    };
    let outcome = ctx.auth.signup(&registration).await?;

    if ctx.format == OutputFormat::Json {
        return output::print_json("signup", &outcome);
    }

    match outcome {
        SignupOutcome::SignedIn(user) => {
            println!(
                "{} Account created, signed in as {}",
                "✓".green(),
                user.display_name().bold()
            );
        }
        SignupOutcome::AwaitingLogin(user) => {
            println!("{} Account created for {}", "✓".green(), user.email.bold());
            println!("  → Run '{}' to sign in", "sessiongate login".cyan());
        }
    }
    Ok(())
}
