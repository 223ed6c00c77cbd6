//! Password recovery and reset commands

use colored::Colorize;
use dialoguer::{Password, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::cli::login::report_already_signed_in;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::models::{Message, NewPassword};
use crate::error::Result;
use crate::output;
use crate::route::{GateDecision, Route};

fn print_message(ctx: &CommandContext, command: &str, message: &Message) -> Result<()> {
    if ctx.format == OutputFormat::Json {
        return output::print_json(command, message);
    }
    println!("{} {}", "✓".green(), message.message);
    Ok(())
}

/// Run the recover command
pub async fn recover(opts: &GlobalOptions, email: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    if let GateDecision::Redirect(_) = ctx.open(Route::RecoverPassword).await {
        return report_already_signed_in(&ctx, "recover");
    }

    let message = ctx.auth.recover_password(email).await?;
    print_message(&ctx, "recover", &message)
}

/// Run the reset-password command
pub async fn reset(opts: &GlobalOptions, token: String, new_password: Option<String>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    if let GateDecision::Redirect(_) = ctx.open(Route::ResetPassword).await {
        return report_already_signed_in(&ctx, "reset-password");
    }

    let new_password = match new_password {
        Some(password) => password,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("New password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let message = ctx
        .auth
        .reset_password(&NewPassword {
            token,
            new_password,
        })
        .await?;
    print_message(&ctx, "reset-password", &message)
}
