//! Login form.

use tracing::debug;

use super::{FormState, Prepared, Step, Ticket};
use crate::api::{AuthApi, AuthGrant, Credentials};
use crate::context::Context;
use crate::error::{ClientError, ClientResult};
use crate::router::{Route, Router};
use crate::session::SessionStore;
use crate::validate::{self, Field, FormInput, LOGIN_FIELDS};

/// Email/password login.
#[derive(Debug, Default, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    form: FormState,
}

impl FormInput for LoginForm {
    fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::Password => &self.password,
            _ => "",
        }
    }
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            form: FormState::default(),
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        match field {
            Field::Email => self.email = value.into(),
            Field::Password => self.password = value.into(),
            _ => debug!(field = field.key(), "login form has no such field"),
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        self.form.error()
    }

    pub fn is_submitting(&self) -> bool {
        self.form.is_submitting()
    }

    /// Validates and claims the form for one request.
    pub fn prepare(&mut self, router: &mut Router) -> ClientResult<Prepared<Credentials>> {
        if self.form.is_submitting() {
            debug!("login already in flight");
            return Ok(Prepared::Done(Step::Busy));
        }
        self.form.clear_error();

        if let Err(err) = validate::validate(LOGIN_FIELDS, &*self, validate::today()) {
            return Err(self.form.fail(err));
        }

        let ticket = self.form.begin(router);
        router.begin_authentication();
        Ok(Prepared::Ready(
            ticket,
            Credentials {
                email: self.email.clone(),
                password: self.password.clone(),
            },
        ))
    }

    /// Applies the login response: store the token and go to the profile.
    pub fn complete<A, S: SessionStore>(
        &mut self,
        ticket: Ticket,
        result: ClientResult<AuthGrant>,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Step> {
        let step = self.form.sign_in(ticket, result, ctx, "logged in")?;
        if matches!(step, Step::Navigated(_)) {
            self.password.clear();
        }
        Ok(step)
    }

    /// Validates, sends the login request and applies the response.
    pub async fn submit<A: AuthApi, S: SessionStore>(
        &mut self,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Step> {
        let (ticket, credentials) = match self.prepare(&mut ctx.router)? {
            Prepared::Ready(ticket, credentials) => (ticket, credentials),
            Prepared::Done(step) => return Ok(step),
        };
        let result = ctx.api.login(&credentials).await;
        self.complete(ticket, result, ctx)
    }

    /// "Don't have an account? Sign Up".
    pub fn go_to_signup(&mut self, router: &mut Router) {
        self.form.reset();
        router.navigate(Route::Signup);
    }
}
