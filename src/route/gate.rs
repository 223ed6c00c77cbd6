//! Route gate: render or redirect based on session state

use std::sync::Arc;

use serde::Serialize;

use super::{Route, RouteClass, Router};
use crate::session::{Session, SessionState, SessionStatus};

/// Outcome of evaluating a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "route", rename_all = "snake_case")]
pub enum GateDecision {
    /// Session not resolved yet: show the placeholder, nothing else
    Loading,
    /// Show the requested screen
    Render(Route),
    /// Send the user elsewhere instead
    Redirect(Route),
}

/// Guards every navigation against the current session
pub struct RouteGate {
    session: Arc<Session>,
    router: Arc<dyn Router>,
}

impl RouteGate {
    pub fn new(session: Arc<Session>, router: Arc<dyn Router>) -> Self {
        Self { session, router }
    }

    /// Decide what to show for `route` given `state`. Pure.
    pub fn decide(route: Route, state: &SessionState) -> GateDecision {
        match state.status {
            SessionStatus::Loading => GateDecision::Loading,
            SessionStatus::Unauthenticated => match route.class() {
                RouteClass::Protected => GateDecision::Redirect(Route::LOGIN),
                RouteClass::Public | RouteClass::Neutral => GateDecision::Render(route),
            },
            SessionStatus::Authenticated => {
                let is_superuser = state.user.as_ref().is_some_and(|user| user.is_superuser);
                match route.class() {
                    RouteClass::Public => GateDecision::Redirect(Route::HOME),
                    RouteClass::Protected if route.requires_superuser() && !is_superuser => {
                        GateDecision::Redirect(Route::HOME)
                    }
                    RouteClass::Protected | RouteClass::Neutral => GateDecision::Render(route),
                }
            }
        }
    }

    /// Evaluate `route` against the current state, replacing the current
    /// history entry when the decision is a redirect
    pub fn evaluate(&self, route: Route) -> GateDecision {
        let decision = Self::decide(route, &self.session.get());
        if let GateDecision::Redirect(target) = decision {
            log::debug!("Gate redirects {} -> {}", route, target);
            self.router.replace(target);
        }
        decision
    }

    /// Navigate to `route`, wait for the session to resolve, then evaluate
    pub async fn visit(&self, route: Route) -> GateDecision {
        self.router.navigate(route);
        self.session.resolved().await;
        self.evaluate(route)
    }
}
