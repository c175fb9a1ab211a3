//! Profile view: display, edit and logout.

use tracing::{debug, info, warn};

use super::{FormState, Prepared, Step, Ticket};
use crate::api::{AuthApi, ProfilePatch, ProfileRecord};
use crate::context::Context;
use crate::error::{ClientError, ClientResult};
use crate::router::{Route, Router};
use crate::session::SessionStore;
use crate::validate::{self, Field, FormInput, PROFILE_FIELDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Viewing,
    Editing,
}

/// Editable copy of a profile. Every field is text; blank optionals are unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub age: String,
    pub dob: String,
    pub contact: String,
}

impl FormInput for ProfileDraft {
    fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Age => &self.age,
            Field::Dob => &self.dob,
            Field::Contact => &self.contact,
            Field::Password => "",
        }
    }
}

impl ProfileDraft {
    pub fn from_record(record: &ProfileRecord) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            age: record.age.map(|age| age.to_string()).unwrap_or_default(),
            dob: record
                .dob
                .map(|dob| dob.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            contact: record.contact.clone().unwrap_or_default(),
        }
    }

    /// The update body. Every field is sent; blank optionals are sent as
    /// cleared.
    pub fn to_patch(&self) -> ProfilePatch {
        let contact = self.contact.trim();
        ProfilePatch {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            age: Some(validate::parse_age(&self.age).and_then(|age| u8::try_from(age).ok())),
            dob: Some(validate::parse_calendar_date(&self.dob)),
            contact: Some((!contact.is_empty()).then(|| contact.to_string())),
        }
    }
}

/// The profile page for one user.
#[derive(Debug, Clone)]
pub struct ProfileView {
    user_id: String,
    record: Option<ProfileRecord>,
    draft: ProfileDraft,
    mode: Mode,
    form: FormState,
}

impl ProfileView {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            record: None,
            draft: ProfileDraft::default(),
            mode: Mode::Viewing,
            form: FormState::default(),
        }
    }

    /// The view for `route`, if it is a profile route.
    pub fn for_route(route: &Route) -> Option<Self> {
        route.user_id().map(Self::new)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The last profile the backend returned.
    pub fn record(&self) -> Option<&ProfileRecord> {
        self.record.as_ref()
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    pub fn error(&self) -> Option<&ClientError> {
        self.form.error()
    }

    pub fn is_submitting(&self) -> bool {
        self.form.is_submitting()
    }

    fn discard(&mut self) {
        self.record = None;
        self.draft = ProfileDraft::default();
        self.mode = Mode::Viewing;
    }

    fn show(&mut self, record: ProfileRecord) {
        self.draft = ProfileDraft::from_record(&record);
        self.record = Some(record);
        self.mode = Mode::Viewing;
    }

    /// Drops everything and sends the user to login.
    fn expire<A, S: SessionStore>(&mut self, ctx: &mut Context<A, S>) -> Step {
        self.discard();
        ctx.router.session_expired();
        Step::Navigated(ctx.router.location().clone())
    }

    /// Records `err`. An unauthorized response also ends the session.
    fn reject<A, S: SessionStore>(
        &mut self,
        err: ClientError,
        ctx: &mut Context<A, S>,
    ) -> ClientError {
        if err.is_unauthorized() {
            warn!(user_id = %self.user_id, "token rejected; signing out");
            if let Err(clear_err) = ctx.clear_session() {
                debug!(error = %clear_err, "session left on disk");
            }
            self.expire(ctx);
        }
        self.form.fail(err)
    }

    /// Looks up the token for an authenticated call; redirects when there is none.
    fn session_token<A, S: SessionStore>(
        &mut self,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Option<String>> {
        match ctx.token() {
            Ok(Some(token)) => Ok(Some(token)),
            Ok(None) => {
                info!("no session; redirecting to /login");
                self.expire(ctx);
                Ok(None)
            }
            Err(err) => Err(self.form.fail(err)),
        }
    }

    /// First phase of mounting: hand out the token, or redirect without one.
    pub fn begin_mount<A, S: SessionStore>(
        &mut self,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Prepared<String>> {
        if self.form.is_submitting() {
            return Ok(Prepared::Done(Step::Busy));
        }
        self.form.clear_error();

        let Some(token) = self.session_token(ctx)? else {
            return Ok(Prepared::Done(Step::Navigated(ctx.router.location().clone())));
        };
        let ticket = self.form.begin(&ctx.router);
        Ok(Prepared::Ready(ticket, token))
    }

    /// Applies the fetched profile.
    pub fn finish_mount<A, S: SessionStore>(
        &mut self,
        ticket: Ticket,
        result: ClientResult<ProfileRecord>,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Step> {
        if !self.form.settle(ticket, &ctx.router) {
            return Ok(Step::Stale);
        }

        match result {
            Ok(record) => {
                debug!(user_id = %record.user_id, "profile loaded");
                self.show(record);
                ctx.router.confirm(&self.user_id);
                Ok(Step::Stay)
            }
            Err(err) => Err(self.reject(err, ctx)),
        }
    }

    /// Fetches the profile for display.
    pub async fn mount<A: AuthApi, S: SessionStore>(
        &mut self,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Step> {
        let (ticket, token) = match self.begin_mount(ctx)? {
            Prepared::Ready(ticket, token) => (ticket, token),
            Prepared::Done(step) => return Ok(step),
        };
        let result = ctx.api.fetch_profile(&self.user_id, &token).await;
        self.finish_mount(ticket, result, ctx)
    }

    /// Switches to edit mode with a fresh draft. Needs a loaded profile.
    pub fn begin_edit(&mut self) {
        let Some(record) = &self.record else {
            debug!("no profile loaded; staying in view mode");
            return;
        };
        self.draft = ProfileDraft::from_record(record);
        self.form.clear_error();
        self.mode = Mode::Editing;
    }

    /// Throws the draft away and returns to view mode.
    pub fn cancel_edit(&mut self) {
        self.draft = self
            .record
            .as_ref()
            .map(ProfileDraft::from_record)
            .unwrap_or_default();
        self.form.clear_error();
        self.mode = Mode::Viewing;
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.draft.name = value,
            Field::Email => self.draft.email = value,
            Field::Age => self.draft.age = value,
            Field::Dob => self.draft.dob = value,
            Field::Contact => self.draft.contact = value,
            Field::Password => debug!("profile has no password field"),
        }
    }

    /// First phase of saving: validate the draft and build the patch.
    pub fn begin_save<A, S: SessionStore>(
        &mut self,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Prepared<(String, ProfilePatch)>> {
        if !self.is_editing() {
            return Ok(Prepared::Done(Step::Stay));
        }
        if self.form.is_submitting() {
            debug!("profile save already in flight");
            return Ok(Prepared::Done(Step::Busy));
        }
        self.form.clear_error();

        if let Err(err) = validate::validate(PROFILE_FIELDS, &self.draft, validate::today()) {
            return Err(self.form.fail(err));
        }

        let Some(token) = self.session_token(ctx)? else {
            return Ok(Prepared::Done(Step::Navigated(ctx.router.location().clone())));
        };
        let ticket = self.form.begin(&ctx.router);
        Ok(Prepared::Ready(ticket, (token, self.draft.to_patch())))
    }

    /// Applies the updated profile and leaves edit mode.
    pub fn finish_save<A, S: SessionStore>(
        &mut self,
        ticket: Ticket,
        result: ClientResult<ProfileRecord>,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Step> {
        if !self.form.settle(ticket, &ctx.router) {
            return Ok(Step::Stale);
        }

        match result {
            Ok(record) => {
                info!(user_id = %record.user_id, "profile updated");
                self.show(record);
                Ok(Step::Stay)
            }
            Err(err) => Err(self.reject(err, ctx)),
        }
    }

    /// Validates the draft, sends the update and applies the response.
    pub async fn save<A: AuthApi, S: SessionStore>(
        &mut self,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Step> {
        let (ticket, (token, patch)) = match self.begin_save(ctx)? {
            Prepared::Ready(ticket, request) => (ticket, request),
            Prepared::Done(step) => return Ok(step),
        };
        let result = ctx.api.update_profile(&self.user_id, &patch, &token).await;
        self.finish_save(ticket, result, ctx)
    }

    /// First phase of logout. The local session is cleared here, before the
    /// backend is told, so it is gone whatever the backend answers.
    pub fn begin_logout<A, S: SessionStore>(
        &mut self,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Prepared<String>> {
        if self.form.is_submitting() {
            return Ok(Prepared::Done(Step::Busy));
        }
        self.form.clear_error();

        let token = ctx.token().ok().flatten();
        if let Err(err) = ctx.clear_session() {
            self.signed_out(&mut ctx.router);
            return Err(self.form.fail(err));
        }

        match token {
            Some(token) => {
                let ticket = self.form.begin(&ctx.router);
                Ok(Prepared::Ready(ticket, token))
            }
            None => {
                self.signed_out(&mut ctx.router);
                Ok(Prepared::Done(Step::Navigated(ctx.router.location().clone())))
            }
        }
    }

    /// Second phase of logout: go to login, reporting a backend failure.
    pub fn finish_logout<A, S: SessionStore, T>(
        &mut self,
        ticket: Ticket,
        result: ClientResult<T>,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Step> {
        if !self.form.settle(ticket, &ctx.router) {
            return Ok(Step::Stale);
        }

        self.signed_out(&mut ctx.router);
        match result {
            Ok(_) => {
                info!("logged out");
                Ok(Step::Navigated(ctx.router.location().clone()))
            }
            Err(err) => {
                warn!(error = %err, "backend logout failed; local session already cleared");
                Err(self.form.fail(err))
            }
        }
    }

    /// Logs out and returns to login.
    pub async fn logout<A: AuthApi, S: SessionStore>(
        &mut self,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Step> {
        let (ticket, token) = match self.begin_logout(ctx)? {
            Prepared::Ready(ticket, token) => (ticket, token),
            Prepared::Done(step) => return Ok(step),
        };
        let result = ctx.api.logout(&token).await;
        self.finish_logout(ticket, result, ctx)
    }

    fn signed_out(&mut self, router: &mut Router) {
        self.discard();
        router.logged_out();
    }
}
