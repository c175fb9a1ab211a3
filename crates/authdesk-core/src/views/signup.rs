//! Signup form.

use tracing::debug;

use super::{FormState, Prepared, Step, Ticket};
use crate::api::{AuthApi, AuthGrant, RegistrationInput};
use crate::context::Context;
use crate::error::{ClientError, ClientResult};
use crate::router::{Route, Router};
use crate::session::SessionStore;
use crate::validate::{self, Field, FormInput, SIGNUP_FIELDS};

/// Registration form. Optional fields stay empty when not provided.
#[derive(Debug, Default, Clone)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: String,
    pub dob: String,
    pub contact: String,
    form: FormState,
}

impl FormInput for SignupForm {
    fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::Age => &self.age,
            Field::Dob => &self.dob,
            Field::Contact => &self.contact,
        }
    }
}

impl SignupForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Password => self.password = value,
            Field::Age => self.age = value,
            Field::Dob => self.dob = value,
            Field::Contact => self.contact = value,
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        self.form.error()
    }

    pub fn is_submitting(&self) -> bool {
        self.form.is_submitting()
    }

    /// Builds the request body. Only meaningful once validation passed.
    fn to_input(&self) -> RegistrationInput {
        let contact = self.contact.trim();
        RegistrationInput {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            age: validate::parse_age(&self.age).and_then(|age| u8::try_from(age).ok()),
            dob: validate::parse_calendar_date(&self.dob),
            contact: (!contact.is_empty()).then(|| contact.to_string()),
        }
    }

    /// Validates and claims the form for one request.
    pub fn prepare(&mut self, router: &mut Router) -> ClientResult<Prepared<RegistrationInput>> {
        if self.form.is_submitting() {
            debug!("signup already in flight");
            return Ok(Prepared::Done(Step::Busy));
        }
        self.form.clear_error();

        if let Err(err) = validate::validate(SIGNUP_FIELDS, &*self, validate::today()) {
            return Err(self.form.fail(err));
        }

        let ticket = self.form.begin(router);
        router.begin_authentication();
        Ok(Prepared::Ready(ticket, self.to_input()))
    }

    /// Applies the registration response: store the token and go to the profile.
    pub fn complete<A, S: SessionStore>(
        &mut self,
        ticket: Ticket,
        result: ClientResult<AuthGrant>,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Step> {
        let step = self.form.sign_in(ticket, result, ctx, "registered")?;
        if matches!(step, Step::Navigated(_)) {
            self.password.clear();
        }
        Ok(step)
    }

    /// Validates, sends the registration and applies the response.
    pub async fn submit<A: AuthApi, S: SessionStore>(
        &mut self,
        ctx: &mut Context<A, S>,
    ) -> ClientResult<Step> {
        let (ticket, input) = match self.prepare(&mut ctx.router)? {
            Prepared::Ready(ticket, input) => (ticket, input),
            Prepared::Done(step) => return Ok(step),
        };
        let result = ctx.api.register(&input).await;
        self.complete(ticket, result, ctx)
    }

    /// "Already have an account? Login".
    pub fn go_to_login(&mut self, router: &mut Router) {
        self.form.reset();
        router.navigate(Route::Login);
    }
}
