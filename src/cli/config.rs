//! Configuration commands

use colored::Colorize;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::config::{Config, SignupPolicy};
use crate::error::{ConfigError, Result};
use crate::output;

#[derive(Serialize)]
struct ConfigReport<'a> {
    path: String,
    effective_api_host: String,
    effective_token_file: String,
    #[serde(flatten)]
    config: &'a Config,
}

/// Show the effective configuration
pub fn show(opts: &GlobalOptions) -> Result<()> {
    let path = Config::resolve_path(opts.config_ref())?;
    let config = Config::load_from(&path)?;
    let api_host = config.api_host(opts.api_host_ref());
    let token_file = config.token_path(&path).display().to_string();

    if opts.format == OutputFormat::Json {
        return output::print_json(
            "config",
            &ConfigReport {
                path: path.display().to_string(),
                effective_api_host: api_host,
                effective_token_file: token_file,
                config: &config,
            },
        );
    }

    let marker = if path.exists() { "" } else { " (not created yet)" };
    println!("Config file: {}{}", path.display().to_string().cyan(), marker.dimmed());
    println!("Backend: {}", api_host.cyan());
    println!("Token file: {}", token_file);
    println!("Signup policy: {}", signup_policy_label(config.signup_policy));
    println!(
        "Validation timeout: {}s",
        config.session.validation_timeout_secs
    );
    println!(
        "Local expiry check: {}",
        if config.session.check_token_expiry { "on" } else { "off" }
    );
    Ok(())
}

/// Persist the backend URL
pub fn set_host(opts: &GlobalOptions, url: &str) -> Result<()> {
    let url = validate_host(url)?;
    update(opts, |config| config.api_host = Some(url.clone()))?;
    println!("{} Backend set to {}", "✓".green(), url.cyan());
    Ok(())
}

/// Persist the post-signup behaviour
pub fn set_signup_policy(opts: &GlobalOptions, policy: SignupPolicy) -> Result<()> {
    update(opts, |config| config.signup_policy = policy)?;
    println!(
        "{} Signup policy set to {}",
        "✓".green(),
        signup_policy_label(policy).bold()
    );
    Ok(())
}

fn update(opts: &GlobalOptions, apply: impl FnOnce(&mut Config)) -> Result<()> {
    let path = Config::resolve_path(opts.config_ref())?;
    let mut config = Config::load_from(&path)?;
    apply(&mut config);
    config.save_to(&path)?;
    log::debug!("Saved configuration to {}", path.display());
    Ok(())
}

fn signup_policy_label(policy: SignupPolicy) -> &'static str {
    match policy {
        SignupPolicy::RedirectToLogin => "redirect_to_login",
        SignupPolicy::AutoLogin => "auto_login",
    }
}

fn validate_host(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Invalid(format!(
            "API host must start with http:// or https://, got '{}'",
            url
        ))
        .into());
    }
    Ok(url.to_string())
}
