//! Auth command handlers.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use authdesk_core::ErrorKind;
use authdesk_core::api::mask_token;
use authdesk_core::config::{Config, paths};
use authdesk_core::router::Route;
use authdesk_core::validate::Field;
use authdesk_core::views::{LoginForm, ProfileView, SignupForm, Step};

use super::{Session, finish, open_session, save_location};

/// Values for `signup`; optional fields stay blank when not given.
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub age: Option<String>,
    pub dob: Option<String>,
    pub contact: Option<String>,
}

pub async fn login(config: &Config, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    let mut ctx = open_session(config)?;
    ctx.router.navigate(Route::Login);

    let mut form = LoginForm::new(email, password);
    let result = form.submit(&mut ctx).await;
    let step = finish(&ctx, result)?;
    signed_in(&ctx, &step, "Logged in")
}

pub async fn signup(config: &Config, input: SignupInput) -> Result<()> {
    let password = match input.password {
        Some(password) => password,
        None => read_password()?,
    };

    let mut ctx = open_session(config)?;
    ctx.router.navigate(Route::Signup);

    let mut form = SignupForm::new(input.name, input.email, password);
    for (field, value) in [
        (Field::Age, input.age),
        (Field::Dob, input.dob),
        (Field::Contact, input.contact),
    ] {
        if let Some(value) = value {
            form.set(field, value);
        }
    }

    let result = form.submit(&mut ctx).await;
    let step = finish(&ctx, result)?;
    signed_in(&ctx, &step, "Signed up")
}

pub async fn logout(config: &Config) -> Result<()> {
    let mut ctx = open_session(config)?;
    let had_session = ctx.token()?.is_some();

    let user_id = ctx.router.location().user_id().unwrap_or_default().to_string();
    let mut view = ProfileView::new(user_id);
    let result = view.logout(&mut ctx).await;
    save_location(&ctx.router)?;

    match result {
        Ok(_) if had_session => {
            println!("✓ Logged out");
            println!("  Session removed from: {}", paths::session_path().display());
        }
        Ok(_) => println!("Not logged in (no session found)."),
        Err(err) if err.kind == ErrorKind::Storage => return Err(err.into()),
        Err(err) => {
            // the local session is gone either way
            println!("✓ Logged out locally");
            eprintln!("Warning: {err}");
        }
    }
    Ok(())
}

fn signed_in(ctx: &Session, step: &Step, verb: &str) -> Result<()> {
    let Step::Navigated(route) = step else {
        println!("Location: {}", ctx.router.location());
        return Ok(());
    };

    let token = ctx.token()?.unwrap_or_default();
    println!(
        "✓ {verb} as {} (token: {})",
        route.user_id().unwrap_or_default(),
        mask_token(&token)
    );
    println!("  Session saved to: {}", paths::session_path().display());
    println!("Location: {route}");
    Ok(())
}

fn read_password() -> Result<String> {
    print!("Password: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
