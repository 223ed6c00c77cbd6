//! Routes command implementation

use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::{self, table};
use crate::route::{Route, RouteClass};

/// Route for table and JSON display
#[derive(Tabled, Serialize)]
struct RouteRow {
    #[tabled(rename = "PATH")]
    path: &'static str,
    #[tabled(rename = "SCREEN")]
    screen: &'static str,
    #[tabled(rename = "ACCESS")]
    access: RouteClass,
    #[tabled(rename = "SUPERUSER")]
    superuser: &'static str,
}

impl From<Route> for RouteRow {
    fn from(route: Route) -> Self {
        Self {
            path: route.path(),
            screen: route.title(),
            access: route.class(),
            superuser: if route.requires_superuser() { "yes" } else { "" },
        }
    }
}

/// List the route table. Needs neither config nor network.
pub fn run(format: OutputFormat) -> Result<()> {
    let rows: Vec<RouteRow> = Route::ALL.into_iter().map(RouteRow::from).collect();

    match format {
        OutputFormat::Pretty => println!("{}", table::format_table(&rows, "No routes.")),
        OutputFormat::Json => output::print_json("routes", &rows)?,
    }
    Ok(())
}
