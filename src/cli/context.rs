//! Command execution context
//!
//! Wires one "application start": config, backend client, token store,
//! session, router, route gate and auth actions, all sharing a single
//! session instance.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::auth::AuthActions;
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::BackendClient;
use crate::config::Config;
use crate::error::Result;
use crate::route::{GateDecision, HistoryRouter, Route, RouteGate};
use crate::session::{Session, SessionOptions, SessionState};
use crate::store::FileTokenStore;

pub struct CommandContext {
    /// Where the configuration was loaded from
    pub config_path: PathBuf,
    /// Effective backend URL
    pub api_host: String,
    /// Output format preference
    pub format: OutputFormat,
    pub store: Arc<FileTokenStore>,
    pub session: Arc<Session>,
    pub router: Arc<HistoryRouter>,
    pub gate: RouteGate,
    pub auth: AuthActions,
}

impl CommandContext {
    /// Build the context. Nothing touches the network until [`start`](Self::start)
    /// or an auth action runs.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config_path = Config::resolve_path(opts.config_ref())?;
        let config = Config::load_from(&config_path)?;
        let api_host = config.api_host(opts.api_host_ref());

        let api = Arc::new(BackendClient::new(&api_host)?);
        let store = Arc::new(FileTokenStore::new(config.token_path(&config_path)));
        log::debug!(
            "Using backend {} with token store {}",
            api_host,
            store.path().display()
        );

        let session = Arc::new(Session::new(
            api.clone(),
            store.clone(),
            SessionOptions::from(&config.session),
        ));
        let router = Arc::new(HistoryRouter::new(Route::Landing));
        let gate = RouteGate::new(session.clone(), router.clone());
        let auth = AuthActions::new(api, session.clone(), router.clone(), config.signup_policy);

        Ok(Self {
            config_path,
            api_host,
            format: opts.format,
            store,
            session,
            router,
            gate,
            auth,
        })
    }

    /// Resolve the session from the stored token, showing a spinner while loading
    pub async fn start(&self) -> SessionState {
        let spinner = (self.format == OutputFormat::Pretty).then(loading_spinner);

        self.session.initialize().await;
        let state = self.session.resolved().await;

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        state
    }

    /// Navigate to `route` while the session starts, and return the gate's verdict
    pub async fn open(&self, route: Route) -> GateDecision {
        let (decision, _) = tokio::join!(self.gate.visit(route), self.start());
        decision
    }
}

/// Placeholder shown while the session is `loading`
fn loading_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Checking session...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
