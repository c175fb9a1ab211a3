//! Client routes and the auth-driven route controller.
//!
//! Routes: `/login`, `/signup`, `/profile/:userId`; `/` and unknown paths
//! resolve to `/login`. Every navigation bumps an epoch so in-flight work
//! started on a previous view can tell it has been left behind.

use std::fmt;

use tracing::{debug, info};

/// A client-visible view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    Profile { user_id: String },
}

impl Route {
    pub fn profile(user_id: impl Into<String>) -> Self {
        Route::Profile {
            user_id: user_id.into(),
        }
    }

    /// Parses an exact route path; `None` for `/` and unknown paths.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        match path {
            "/login" => Some(Route::Login),
            "/signup" => Some(Route::Signup),
            _ => {
                let user_id = path.strip_prefix("/profile/")?;
                if user_id.is_empty() || user_id.contains('/') {
                    None
                } else {
                    Some(Route::profile(user_id))
                }
            }
        }
    }

    /// Resolves any path to a view, redirecting `/` and unknown paths to login.
    pub fn resolve(path: &str) -> Route {
        Route::parse(path).unwrap_or_else(|| {
            debug!(path, "redirecting to /login");
            Route::Login
        })
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::Profile { user_id } => format!("/profile/{user_id}"),
        }
    }

    /// The user id of a profile route.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Route::Profile { user_id } => Some(user_id),
            Route::Login | Route::Signup => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Authentication phase as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPhase {
    Unauthenticated,
    /// A login or registration request is in flight.
    Authenticating,
    Authenticated { user_id: String },
}

/// Route controller.
///
/// Holds the current location and auth phase. Navigation is a plain state
/// change; nothing here talks to the network or retries.
#[derive(Debug, Clone)]
pub struct Router {
    phase: AuthPhase,
    location: Route,
    history: Vec<Route>,
    epoch: u64,
}

impl Router {
    /// Starts at `path`.
    ///
    /// Without a session the phase is unauthenticated and `/` lands on login.
    /// With a session on a profile route the phase is authenticated for that
    /// user; the profile view still confirms it with the backend on mount.
    pub fn start(path: &str, has_session: bool) -> Self {
        let location = Route::resolve(path);
        let phase = match (&location, has_session) {
            (Route::Profile { user_id }, true) => AuthPhase::Authenticated {
                user_id: user_id.clone(),
            },
            _ => AuthPhase::Unauthenticated,
        };
        info!(location = %location, ?phase, "router started");
        Self {
            phase,
            history: vec![location.clone()],
            location,
            epoch: 0,
        }
    }

    pub fn phase(&self) -> &AuthPhase {
        &self.phase
    }

    pub fn location(&self) -> &Route {
        &self.location
    }

    /// Every route visited, oldest first.
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Navigation counter; changes on every navigation.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.phase, AuthPhase::Authenticated { .. })
    }

    /// Moves to `route`.
    ///
    /// Leaving a view abandons any login or registration still in flight.
    pub fn navigate(&mut self, route: Route) {
        if self.phase == AuthPhase::Authenticating {
            self.phase = AuthPhase::Unauthenticated;
        }
        info!(from = %self.location, to = %route, "navigate");
        self.epoch += 1;
        self.history.push(route.clone());
        self.location = route;
    }

    /// Resolves `path` and navigates there.
    pub fn open(&mut self, path: &str) -> &Route {
        self.navigate(Route::resolve(path));
        &self.location
    }

    /// A login or registration request was sent.
    pub fn begin_authentication(&mut self) {
        self.phase = AuthPhase::Authenticating;
    }

    /// The login or registration request failed; stay on the current view.
    pub fn authentication_failed(&mut self) {
        if self.phase == AuthPhase::Authenticating {
            self.phase = AuthPhase::Unauthenticated;
        }
    }

    /// Login or registration succeeded: go to the user's profile.
    pub fn authenticated(&mut self, user_id: &str) {
        self.navigate(Route::profile(user_id));
        self.phase = AuthPhase::Authenticated {
            user_id: user_id.to_string(),
        };
    }

    /// The backend accepted the token for `user_id` without a navigation.
    pub fn confirm(&mut self, user_id: &str) {
        self.phase = AuthPhase::Authenticated {
            user_id: user_id.to_string(),
        };
    }

    /// The backend rejected the token (or none was stored): back to login.
    pub fn session_expired(&mut self) {
        self.phase = AuthPhase::Unauthenticated;
        self.navigate(Route::Login);
    }

    /// Logged out, whether or not the backend was reached.
    pub fn logged_out(&mut self) {
        self.phase = AuthPhase::Unauthenticated;
        self.navigate(Route::Login);
    }
}
