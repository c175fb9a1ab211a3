//! In-memory auth backend for view tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{
    Acknowledgement, AuthApi, AuthGrant, Credentials, Operation, ProfilePatch, ProfileRecord,
    RegistrationInput,
};
use crate::error::{ClientError, ClientResult, ErrorKind};

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user_id: String,
    token: String,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Operation>,
    accounts: HashMap<String, Account>,
    profiles: HashMap<String, ProfileRecord>,
    live_tokens: HashMap<String, String>,
    next_id: u32,
    fail_next: Option<ClientError>,
    last_patch: Option<ProfilePatch>,
}

#[derive(Debug, Default)]
pub struct FakeApi {
    state: Mutex<State>,
}

fn rejected(status: u16, message: &str, op: Operation) -> ClientError {
    let body = serde_json::json!({ "message": message }).to_string();
    ClientError::from_status(status, &body, op.fallback_message())
}

impl FakeApi {
    /// Backend with one account (`a@b.com` / `secret1` → `t1` / `u1`).
    pub fn with_default_user() -> Self {
        let api = Self::default();
        api.add_user("u1", "t1", "a@b.com", "secret1", "Ada");
        api
    }

    pub fn add_user(&self, user_id: &str, token: &str, email: &str, password: &str, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user_id: user_id.to_string(),
                token: token.to_string(),
            },
        );
        state.profiles.insert(
            user_id.to_string(),
            ProfileRecord {
                user_id: user_id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                ..Default::default()
            },
        );
        state
            .live_tokens
            .insert(token.to_string(), user_id.to_string());
    }

    /// Makes the next call fail with `err` (after being counted).
    pub fn fail_next(&self, err: ClientError) {
        self.state.lock().unwrap().fail_next = Some(err);
    }

    /// Invalidates a token server-side.
    pub fn revoke(&self, token: &str) {
        self.state.lock().unwrap().live_tokens.remove(token);
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn profile(&self, user_id: &str) -> Option<ProfileRecord> {
        self.state.lock().unwrap().profiles.get(user_id).cloned()
    }

    /// Replaces a stored profile as-is.
    pub fn put_profile(&self, record: ProfileRecord) {
        self.state
            .lock()
            .unwrap()
            .profiles
            .insert(record.user_id.clone(), record);
    }

    /// The last update body the backend received.
    pub fn last_patch(&self) -> Option<ProfilePatch> {
        self.state.lock().unwrap().last_patch.clone()
    }

    fn enter(&self, op: Operation) -> ClientResult<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(op);
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

fn authorize(state: &State, user_id: &str, token: &str, op: Operation) -> ClientResult<()> {
    match state.live_tokens.get(token) {
        Some(owner) if owner == user_id => Ok(()),
        _ => Err(rejected(401, "Unauthorized", op)),
    }
}

impl AuthApi for FakeApi {
    async fn register(&self, input: &RegistrationInput) -> ClientResult<AuthGrant> {
        let op = Operation::Register;
        let mut state = self.enter(op)?;
        if state.accounts.contains_key(&input.email) {
            return Err(rejected(409, "User already exists", op));
        }
        state.next_id += 1;
        let user_id = format!("n{}", state.next_id);
        let token = format!("nt{}", state.next_id);
        state.accounts.insert(
            input.email.clone(),
            Account {
                password: input.password.clone(),
                user_id: user_id.clone(),
                token: token.clone(),
            },
        );
        state.profiles.insert(
            user_id.clone(),
            ProfileRecord {
                user_id: user_id.clone(),
                name: input.name.clone(),
                email: input.email.clone(),
                age: input.age,
                dob: input.dob,
                contact: input.contact.clone(),
            },
        );
        state.live_tokens.insert(token.clone(), user_id.clone());
        Ok(AuthGrant { token, user_id })
    }

    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthGrant> {
        let op = Operation::Login;
        let mut state = self.enter(op)?;
        let account = match state.accounts.get(&credentials.email) {
            Some(account) if account.password == credentials.password => account.clone(),
            _ => return Err(rejected(401, "Invalid credentials", op)),
        };
        state
            .live_tokens
            .insert(account.token.clone(), account.user_id.clone());
        Ok(AuthGrant {
            token: account.token,
            user_id: account.user_id,
        })
    }

    async fn fetch_profile(&self, user_id: &str, token: &str) -> ClientResult<ProfileRecord> {
        let op = Operation::FetchProfile;
        let state = self.enter(op)?;
        authorize(&state, user_id, token, op)?;
        state
            .profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| rejected(404, "User not found", op))
    }

    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
        token: &str,
    ) -> ClientResult<ProfileRecord> {
        let op = Operation::UpdateProfile;
        let mut state = self.enter(op)?;
        authorize(&state, user_id, token, op)?;
        state.last_patch = Some(patch.clone());
        let record = state
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| rejected(404, "User not found", op))?;
        if let Some(name) = &patch.name {
            record.name.clone_from(name);
        }
        if let Some(email) = &patch.email {
            record.email.clone_from(email);
        }
        if let Some(age) = patch.age {
            record.age = age;
        }
        if let Some(dob) = patch.dob {
            record.dob = dob;
        }
        if let Some(contact) = &patch.contact {
            record.contact.clone_from(contact);
        }
        Ok(record.clone())
    }

    async fn logout(&self, token: &str) -> ClientResult<Acknowledgement> {
        let op = Operation::Logout;
        let mut state = self.enter(op)?;
        if state.live_tokens.remove(token).is_none() {
            return Err(rejected(401, "Unauthorized", op));
        }
        Ok(Acknowledgement {
            message: Some("Logged out".to_string()),
        })
    }
}

/// A transport failure, as the HTTP client reports it.
pub fn network_error(op: Operation) -> ClientError {
    ClientError::new(ErrorKind::Network, op.fallback_message())
}
