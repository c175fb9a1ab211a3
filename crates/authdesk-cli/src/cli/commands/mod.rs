//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod profile;

use std::fs;

use anyhow::{Context as _, Result};
use authdesk_core::Context;
use authdesk_core::api::{HttpClient, mask_token};
use authdesk_core::config::{Config, paths};
use authdesk_core::router::{Route, Router};
use authdesk_core::session::{FileSessionStore, SessionStore};

pub type Session = Context<HttpClient, FileSessionStore>;

/// Reads the saved client route. A fresh home starts at `/`.
fn load_location() -> Result<String> {
    let path = paths::location_path();
    if !path.exists() {
        return Ok("/".to_string());
    }
    let location = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read location from {}", path.display()))?;
    Ok(location.trim().to_string())
}

/// Persists the router's current route for the next invocation.
fn save_location(router: &Router) -> Result<()> {
    let path = paths::location_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(&path, format!("{}\n", router.location()))
        .with_context(|| format!("Failed to write location to {}", path.display()))
}

/// Builds the client context at the saved location.
fn open_session(config: &Config) -> Result<Session> {
    let api = HttpClient::from_config(config)?;
    let location = load_location()?;
    Ok(Context::start(api, FileSessionStore::open_default(), &location))
}

/// Saves where the action left the router, then hands its result back.
fn finish<T, E>(ctx: &Session, result: Result<T, E>) -> Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    save_location(&ctx.router)?;
    Ok(result?)
}

pub fn status() -> Result<()> {
    let store = FileSessionStore::open_default();
    match store.read()? {
        Some(token) => println!("Session: active (token: {})", mask_token(&token)),
        None => println!("Session: none"),
    }
    let location = Route::resolve(&load_location()?);
    println!("Location: {location}");
    Ok(())
}
