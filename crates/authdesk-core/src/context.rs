//! The session context handed to every view.

use tracing::{info, warn};

use crate::api::mask_token;
use crate::error::{ClientError, ClientResult};
use crate::router::Router;
use crate::session::SessionStore;

/// API client, session store and route controller for one client.
///
/// Views never reach for ambient storage: everything that needs the token
/// gets it through this context.
#[derive(Debug)]
pub struct Context<A, S> {
    pub api: A,
    pub session: S,
    pub router: Router,
}

impl<A, S: SessionStore> Context<A, S> {
    pub fn new(api: A, session: S, router: Router) -> Self {
        Self {
            api,
            session,
            router,
        }
    }

    /// Starts the router at `path`, using the stored session to pick the phase.
    pub fn start(api: A, session: S, path: &str) -> Self {
        let has_session = match session.read() {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "unreadable session; starting signed out");
                false
            }
        };
        let router = Router::start(path, has_session);
        Self::new(api, session, router)
    }

    /// Reads the session token.
    pub fn token(&self) -> ClientResult<Option<String>> {
        self.session.read().map_err(|e| {
            warn!(error = %format!("{e:#}"), "failed to read session");
            ClientError::storage("Could not read the saved session")
        })
    }

    /// Persists a freshly issued token.
    pub fn store_token(&mut self, token: &str) -> ClientResult<()> {
        self.session.save(token).map_err(|e| {
            warn!(error = %format!("{e:#}"), "failed to save session");
            ClientError::storage("Could not save the session")
        })?;
        info!(token = %mask_token(token), "session stored");
        Ok(())
    }

    /// Drops the session token. Returns whether one was present.
    pub fn clear_session(&mut self) -> ClientResult<bool> {
        let had_token = self.session.clear().map_err(|e| {
            warn!(error = %format!("{e:#}"), "failed to clear session");
            ClientError::storage("Could not clear the saved session")
        })?;
        if had_token {
            info!("session cleared");
        }
        Ok(had_token)
    }
}
