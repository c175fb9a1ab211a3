//! Auth service API: request/response types, the `AuthApi` seam and its HTTP client.

use std::fmt;
use std::future::Future;

use crate::error::ClientResult;

mod client;
mod types;

pub use client::{HttpClient, USER_AGENT};
pub use types::{
    Acknowledgement, AuthGrant, Credentials, ProfilePatch, ProfileRecord, RegistrationInput,
};

/// The five backend operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Login,
    FetchProfile,
    UpdateProfile,
    Logout,
}

impl Operation {
    /// Message shown when the backend gives none (or cannot be reached).
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Register => "Signup failed",
            Operation::Login => "Login failed",
            Operation::FetchProfile => "Failed to fetch profile",
            Operation::UpdateProfile => "Failed to update profile",
            Operation::Logout => "Failed to logout",
        }
    }

    /// Whether the request carries the bearer token.
    pub fn requires_auth(self) -> bool {
        matches!(
            self,
            Operation::FetchProfile | Operation::UpdateProfile | Operation::Logout
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Register => write!(f, "register"),
            Operation::Login => write!(f, "login"),
            Operation::FetchProfile => write!(f, "fetch_profile"),
            Operation::UpdateProfile => write!(f, "update_profile"),
            Operation::Logout => write!(f, "logout"),
        }
    }
}

/// Request/response contract of the auth service.
///
/// Authenticated calls take the bearer token explicitly; callers read it from
/// the session store right before each call.
pub trait AuthApi {
    fn register(
        &self,
        input: &RegistrationInput,
    ) -> impl Future<Output = ClientResult<AuthGrant>> + Send;

    fn login(&self, credentials: &Credentials)
    -> impl Future<Output = ClientResult<AuthGrant>> + Send;

    fn fetch_profile(
        &self,
        user_id: &str,
        token: &str,
    ) -> impl Future<Output = ClientResult<ProfileRecord>> + Send;

    fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
        token: &str,
    ) -> impl Future<Output = ClientResult<ProfileRecord>> + Send;

    fn logout(&self, token: &str) -> impl Future<Output = ClientResult<Acknowledgement>> + Send;
}

/// Returns a masked version of a token for display (first 8 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 12 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}...")
}
