//! Visit command implementation

use colored::Colorize;
use serde::Serialize;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::output;
use crate::route::{GateDecision, Navigation, Route, RouteClass};
use crate::session::SessionState;

#[derive(Serialize)]
struct VisitReport<'a> {
    requested: &'a str,
    route: Route,
    class: RouteClass,
    decision: GateDecision,
    location: Route,
    session: SessionState,
    history: Vec<Navigation>,
}

/// Open `path` through the route gate and report the outcome
pub async fn run(opts: &GlobalOptions, path: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let route = Route::from_path(path);
    let decision = ctx.open(route).await;
    let session = ctx.session.get();

    if ctx.format == OutputFormat::Json {
        return output::print_json(
            "visit",
            &VisitReport {
                requested: path,
                route,
                class: route.class(),
                decision,
                location: ctx.router.current(),
                session,
                history: ctx.router.commands(),
            },
        );
    }

    match decision {
        GateDecision::Render(route) => {
            println!("{} {} ({})", "✓".green(), route.title().bold(), route.path());
            if let Some(user) = &session.user {
                println!("  Signed in as {}", user.display_name());
            }
        }
        GateDecision::Redirect(target) => {
            println!(
                "{} {} redirected to {}",
                "→".yellow(),
                route.path(),
                target.path().bold()
            );
            let reason = match target {
                Route::Login => "sign in required",
                _ if route.requires_superuser() => "superuser required",
                _ => "already signed in",
            };
            println!("  {}", reason.dimmed());
        }
        // Not reachable once the session has resolved
        GateDecision::Loading => println!("{} Loading...", "○".dimmed()),
    }
    Ok(())
}
