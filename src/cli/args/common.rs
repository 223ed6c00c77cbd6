//! Common CLI types shared across commands

use crate::config::SignupPolicy;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - colored, human-oriented text
    #[default]
    Pretty,
    /// JSON format - structured for scripts
    Json,
}

/// Post-signup behaviour, as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SignupPolicyArg {
    /// Send new users to the login screen
    RedirectToLogin,
    /// Sign new users in straight away
    AutoLogin,
}

impl From<SignupPolicyArg> for SignupPolicy {
    fn from(arg: SignupPolicyArg) -> Self {
        match arg {
            SignupPolicyArg::RedirectToLogin => SignupPolicy::RedirectToLogin,
            SignupPolicyArg::AutoLogin => SignupPolicy::AutoLogin,
        }
    }
}
