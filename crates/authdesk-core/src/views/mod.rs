//! View forms: login, signup and profile.
//!
//! Each user action is split in two phases so a UI loop can own the request:
//! `prepare`/`begin_*` validates and hands out a [`Ticket`], the caller runs the
//! API call, and `complete`/`finish_*` applies the response. The `async`
//! helpers (`submit`, `mount`, `save`) run both phases back to back.
//!
//! A form accepts one submission at a time. A ticket goes stale when the
//! router navigates or the form is reset; stale responses are dropped.

use tracing::{debug, info};

use crate::api::AuthGrant;
use crate::context::Context;
use crate::error::{ClientError, ClientResult};
use crate::router::{Route, Router};
use crate::session::SessionStore;

mod login;
mod profile;
mod signup;

#[cfg(test)]
pub(crate) mod fake;

pub use login::LoginForm;
pub use profile::{Mode, ProfileDraft, ProfileView};
pub use signup::SignupForm;

/// What a completed action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// State updated; still on the same view.
    Stay,
    /// The router moved to a new view.
    Navigated(Route),
    /// A submission was already in flight; nothing was sent.
    Busy,
    /// The response arrived after the view was left; it was ignored.
    Stale,
}

/// Outcome of the first phase of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared<T> {
    /// Send `T`, then hand the response back with the ticket.
    Ready(Ticket, T),
    /// Nothing to send.
    Done(Step),
}

/// Identifies one in-flight submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    epoch: u64,
}

/// Error slot and in-flight guard shared by all forms.
#[derive(Debug, Default, Clone)]
pub struct FormState {
    error: Option<ClientError>,
    pending: Option<Ticket>,
    generation: u64,
}

impl FormState {
    /// The one message currently shown, if any.
    pub fn error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    /// Forgets any in-flight submission and the current message.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.error = None;
    }

    fn clear_error(&mut self) {
        self.error = None;
    }

    /// Replaces the current message with `err` and hands it back.
    fn fail(&mut self, err: ClientError) -> ClientError {
        self.error = Some(err.clone());
        err
    }

    fn begin(&mut self, router: &Router) -> Ticket {
        let ticket = Ticket {
            generation: self.generation,
            epoch: router.epoch(),
        };
        self.pending = Some(ticket);
        ticket
    }

    /// Closes the submission. True when its response may still be applied.
    fn settle(&mut self, ticket: Ticket, router: &Router) -> bool {
        let current = self.pending == Some(ticket);
        if current {
            self.pending = None;
        }
        let live = current && router.epoch() == ticket.epoch;
        if !live {
            debug!(?ticket, epoch = router.epoch(), "dropping stale response");
        }
        live
    }

    /// Applies a login or registration response: stores the token and opens
    /// the user's profile. Any failure drops the router back to signed out.
    fn sign_in<A, S: SessionStore>(
        &mut self,
        ticket: Ticket,
        result: ClientResult<AuthGrant>,
        ctx: &mut Context<A, S>,
        action: &'static str,
    ) -> ClientResult<Step> {
        if !self.settle(ticket, &ctx.router) {
            return Ok(Step::Stale);
        }

        let stored = result.and_then(|grant| ctx.store_token(&grant.token).map(|()| grant));
        match stored {
            Ok(grant) => {
                info!(user_id = %grant.user_id, action, "signed in");
                ctx.router.authenticated(&grant.user_id);
                Ok(Step::Navigated(ctx.router.location().clone()))
            }
            Err(err) => {
                ctx.router.authentication_failed();
                Err(self.fail(err))
            }
        }
    }
}
