//! `config` subcommands.

use anyhow::{Context, Result};
use authdesk_core::config::{Config, paths};

/// Prints where the client keeps its files and which API it talks to.
pub fn path(config: &Config) -> Result<()> {
    let base_url = config.effective_base_url()?;
    println!("Config:   {}", paths::config_path().display());
    println!("Session:  {}", paths::session_path().display());
    println!("Location: {}", paths::location_path().display());
    println!("Logs:     {}", paths::logs_dir().display());
    println!("API:      {base_url}");
    Ok(())
}

/// Writes the commented template; refuses to overwrite an existing file.
pub fn init() -> Result<()> {
    let config_path = paths::config_path();
    Config::init(&config_path)
        .with_context(|| format!("write config template to {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    println!("Set api_base_url there to point authdesk at your auth service.");
    Ok(())
}
