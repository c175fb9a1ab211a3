//! Profile and navigation command handlers.

use anyhow::{Result, bail};
use authdesk_core::config::Config;
use authdesk_core::router::Route;
use authdesk_core::validate::{Field, FormInput, PROFILE_FIELDS};
use authdesk_core::views::{ProfileView, Step};

use super::{Session, finish, open_session, save_location};

/// Field values passed to `profile edit`.
#[derive(Debug, Default)]
pub struct FieldUpdates {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<String>,
    pub dob: Option<String>,
    pub contact: Option<String>,
}

impl FieldUpdates {
    fn given(&self) -> impl Iterator<Item = (Field, &str)> {
        [
            (Field::Name, &self.name),
            (Field::Email, &self.email),
            (Field::Age, &self.age),
            (Field::Dob, &self.dob),
            (Field::Contact, &self.contact),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|value| (field, value)))
    }
}

pub async fn show(config: &Config, user: Option<&str>) -> Result<()> {
    let mut ctx = open_session(config)?;
    let mut view = profile_view(&mut ctx, user)?;

    let result = view.mount(&mut ctx).await;
    let step = finish(&ctx, result)?;
    ensure_shown(&step)?;

    print_profile(&view);
    Ok(())
}

pub async fn edit(config: &Config, user: Option<&str>, updates: &FieldUpdates) -> Result<()> {
    if updates.given().next().is_none() {
        bail!("Nothing to update: pass at least one of --name, --email, --age, --dob, --contact");
    }

    let mut ctx = open_session(config)?;
    let mut view = profile_view(&mut ctx, user)?;

    let result = view.mount(&mut ctx).await;
    let step = finish(&ctx, result)?;
    ensure_shown(&step)?;

    view.begin_edit();
    for (field, value) in updates.given() {
        view.set(field, value);
    }
    let result = view.save(&mut ctx).await;
    let step = finish(&ctx, result)?;
    ensure_shown(&step)?;

    println!("✓ Profile updated");
    print_profile(&view);
    Ok(())
}

/// Navigates to `path`, mounting the profile view when it is a profile route.
pub async fn open(config: &Config, path: &str) -> Result<()> {
    let mut ctx = open_session(config)?;
    let route = ctx.router.open(path).clone();

    let Some(mut view) = ProfileView::for_route(&route) else {
        save_location(&ctx.router)?;
        println!("Location: {route}");
        return Ok(());
    };

    let result = view.mount(&mut ctx).await;
    let step = finish(&ctx, result)?;
    ensure_shown(&step)?;

    println!("Location: {route}");
    print_profile(&view);
    Ok(())
}

/// The profile view to act on: `--user` if given, else the current location.
fn profile_view(ctx: &mut Session, user: Option<&str>) -> Result<ProfileView> {
    if let Some(user) = user {
        ctx.router.navigate(Route::profile(user));
    }
    match ProfileView::for_route(ctx.router.location()) {
        Some(view) => Ok(view),
        None => bail!(
            "No profile open (location: {}). Log in first or pass --user",
            ctx.router.location()
        ),
    }
}

fn ensure_shown(step: &Step) -> Result<()> {
    match step {
        Step::Navigated(route) => bail!("Not logged in (redirected to {route})"),
        Step::Stay | Step::Busy | Step::Stale => Ok(()),
    }
}

fn print_profile(view: &ProfileView) {
    let draft = view.draft();
    for &field in PROFILE_FIELDS {
        let value = draft.value(field);
        let value = if value.is_empty() { "Not set" } else { value };
        println!("{:<16}{value}", format!("{}:", field.label()));
    }
}
