//! Route table and navigation
//!
//! Every screen of the dashboard is a [`Route`] variant with a static
//! [`RouteClass`]. Unknown paths resolve to [`Route::NotFound`], which is
//! neutral, so a lookup miss never hides a screen behind the login wall.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

pub mod gate;

pub use gate::{GateDecision, RouteGate};

/// What a route requires of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// Requires an authenticated session
    Protected,
    /// Only for signed-out users (login, signup, password recovery)
    Public,
    /// No requirement
    Neutral,
}

impl std::fmt::Display for RouteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RouteClass::Protected => "protected",
            RouteClass::Public => "public",
            RouteClass::Neutral => "neutral",
        };
        f.write_str(label)
    }
}

/// Screens known to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Landing,
    Dashboard,
    Items,
    Settings,
    Admin,
    Login,
    Signup,
    RecoverPassword,
    ResetPassword,
    NotFound,
}

impl Route {
    /// All routes, in menu order
    pub const ALL: [Route; 10] = [
        Route::Landing,
        Route::Dashboard,
        Route::Items,
        Route::Settings,
        Route::Admin,
        Route::Login,
        Route::Signup,
        Route::RecoverPassword,
        Route::ResetPassword,
        Route::NotFound,
    ];

    /// Where signed-out users are sent
    pub const LOGIN: Route = Route::Login;

    /// Where authenticated users land after sign-in or when bounced off a public route
    pub const HOME: Route = Route::Dashboard;

    /// Resolve a URL path. Query strings, fragments and trailing slashes are ignored.
    pub fn from_path(path: &str) -> Route {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        match path {
            "" => Route::Landing,
            "/dashboard" => Route::Dashboard,
            "/items" => Route::Items,
            "/settings" => Route::Settings,
            "/admin" => Route::Admin,
            "/login" => Route::Login,
            "/signup" => Route::Signup,
            "/recover-password" => Route::RecoverPassword,
            "/reset-password" => Route::ResetPassword,
            _ => Route::NotFound,
        }
    }

    /// Canonical path of the route
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Dashboard => "/dashboard",
            Route::Items => "/items",
            Route::Settings => "/settings",
            Route::Admin => "/admin",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::RecoverPassword => "/recover-password",
            Route::ResetPassword => "/reset-password",
            Route::NotFound => "/404",
        }
    }

    pub fn class(self) -> RouteClass {
        match self {
            Route::Dashboard | Route::Items | Route::Settings | Route::Admin => {
                RouteClass::Protected
            }
            Route::Login | Route::Signup | Route::RecoverPassword | Route::ResetPassword => {
                RouteClass::Public
            }
            Route::Landing | Route::NotFound => RouteClass::Neutral,
        }
    }

    /// Protected routes that are further restricted to superusers
    pub fn requires_superuser(self) -> bool {
        matches!(self, Route::Admin)
    }

    /// Human-readable screen title
    pub fn title(self) -> &'static str {
        match self {
            Route::Landing => "Welcome",
            Route::Dashboard => "Dashboard",
            Route::Items => "Items",
            Route::Settings => "User Settings",
            Route::Admin => "Admin",
            Route::Login => "Log In",
            Route::Signup => "Sign Up",
            Route::RecoverPassword => "Password Recovery",
            Route::ResetPassword => "Reset Password",
            Route::NotFound => "Not Found",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// A command issued to the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "route", rename_all = "snake_case")]
pub enum Navigation {
    /// Push a new history entry
    Navigate(Route),
    /// Replace the current history entry
    Replace(Route),
}

/// Navigation sink. The gate issues commands; it never routes by itself.
pub trait Router: Send + Sync {
    fn navigate(&self, route: Route);
    fn replace(&self, route: Route);
}

#[derive(Debug)]
struct History {
    entries: Vec<Route>,
    log: Vec<Navigation>,
}

/// In-process router that keeps a history stack and a log of every command
#[derive(Debug)]
pub struct HistoryRouter {
    history: Mutex<History>,
}

impl HistoryRouter {
    pub fn new(start: Route) -> Self {
        Self {
            history: Mutex::new(History {
                entries: vec![start],
                log: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Route at the top of the history stack
    pub fn current(&self) -> Route {
        self.lock()
            .entries
            .last()
            .copied()
            .unwrap_or(Route::Landing)
    }

    /// Commands received so far, oldest first
    pub fn commands(&self) -> Vec<Navigation> {
        self.lock().log.clone()
    }
}

impl Default for HistoryRouter {
    fn default() -> Self {
        Self::new(Route::Landing)
    }
}

impl Router for HistoryRouter {
    fn navigate(&self, route: Route) {
        log::debug!("navigate -> {}", route);
        let mut history = self.lock();
        history.entries.push(route);
        history.log.push(Navigation::Navigate(route));
    }

    fn replace(&self, route: Route) {
        log::debug!("replace -> {}", route);
        let mut history = self.lock();
        match history.entries.last_mut() {
            Some(top) => *top = route,
            None => history.entries.push(route),
        }
        history.log.push(Navigation::Replace(route));
    }
}
