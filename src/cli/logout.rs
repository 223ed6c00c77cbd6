//! Logout command implementation

use colored::Colorize;
use serde::Serialize;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::output;
use crate::route::Route;
use crate::session::SessionStatus;

#[derive(Serialize)]
struct LogoutReport {
    status: SessionStatus,
    location: Route,
}

/// Run the logout command. Purely local: the backend is never contacted.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.auth.logout();

    if ctx.format == OutputFormat::Json {
        return output::print_json(
            "logout",
            &LogoutReport {
                status: ctx.session.get().status,
                location: ctx.router.current(),
            },
        );
    }

    println!("{} Signed out", "✓".green());
    Ok(())
}
