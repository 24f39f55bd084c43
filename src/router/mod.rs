//! Route table and navigation guards.
//!
//! The guards are pure functions of `(Session, Route)`: no internal state,
//! no I/O. Their correctness rests on being handed an already-resolved
//! session, which is why [`Router::navigate`] waits for the bootstrap
//! [`Ready`] signal before reading the store.

use std::sync::Arc;
use tracing::debug;

use crate::session::bootstrap::Ready;
use crate::session::{Role, Session, SessionStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Indicators,
    Stats,
    Users,
    Zones,
    Sources,
}

impl Route {
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let normalized = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match normalized {
            "/" => Some(Self::Dashboard),
            "/login" => Some(Self::Login),
            "/indicators" => Some(Self::Indicators),
            "/stats" => Some(Self::Stats),
            "/users" => Some(Self::Users),
            "/zones" => Some(Self::Zones),
            "/sources" => Some(Self::Sources),
            _ => None,
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/",
            Self::Indicators => "/indicators",
            Self::Stats => "/stats",
            Self::Users => "/users",
            Self::Zones => "/zones",
            Self::Sources => "/sources",
        }
    }

    /// Reachable without a session.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Login)
    }

    #[must_use]
    pub const fn admin_only(self) -> bool {
        matches!(self, Self::Users | Self::Zones | Self::Sources)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Render(Route),
    Redirect { to: Route, from: Option<String> },
}

impl Decision {
    #[must_use]
    pub const fn is_render(&self) -> bool {
        matches!(self, Self::Render(_))
    }
}

/// Gate a protected route: unauthenticated sessions are sent to the login
/// view carrying the originally requested path.
#[must_use]
pub fn require_auth(session: &Session, requested: Route) -> Decision {
    if session.is_authenticated() {
        Decision::Render(requested)
    } else {
        debug!(path = requested.path(), "unauthenticated; redirecting to login");
        Decision::Redirect {
            to: Route::Login,
            from: Some(requested.path().to_string()),
        }
    }
}

/// Gate an admin route: non-admin principals land on the default route.
/// Evaluated only behind [`require_auth`].
#[must_use]
pub fn require_admin(session: &Session, requested: Route) -> Decision {
    match session.principal() {
        Some(principal) if principal.role == Role::Admin => Decision::Render(requested),
        _ => {
            debug!(path = requested.path(), "not an admin; redirecting to dashboard");
            Decision::Redirect {
                to: Route::Dashboard,
                from: Some(requested.path().to_string()),
            }
        }
    }
}

pub struct Router {
    store: Arc<SessionStore>,
    ready: Ready,
}

impl Router {
    #[must_use]
    pub fn new(store: Arc<SessionStore>, ready: Ready) -> Self {
        Self { store, ready }
    }

    /// Resolve a navigation against a single consistent session snapshot,
    /// after session restoration has been attempted.
    pub async fn navigate(&self, path: &str) -> Decision {
        self.ready.wait().await;
        Self::resolve(&self.store.current(), path)
    }

    /// Pure resolution: unknown paths fall through to the dashboard (which
    /// itself requires auth); admin routes compose both guards, so the
    /// inner one never renders where the outer one redirects.
    #[must_use]
    pub fn resolve(session: &Session, path: &str) -> Decision {
        let Some(route) = Route::parse(path) else {
            return Self::resolve(session, Route::Dashboard.path());
        };

        if route.is_public() {
            return Decision::Render(route);
        }

        match require_auth(session, route) {
            Decision::Render(route) if route.admin_only() => require_admin(session, route),
            decision => decision,
        }
    }
}
