//! CLI entry and dispatch.

use anyhow::{Context, Result};
use authdesk_core::{config, logging};
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "authdesk")]
#[command(version)]
#[command(about = "Terminal client for the authdesk authentication service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Editable profile fields. Fields left out keep their current value.
#[derive(clap::Args, Debug, Clone, Default)]
struct ProfileArgs {
    /// Full name
    #[arg(long)]
    name: Option<String>,
    /// Email address
    #[arg(long)]
    email: Option<String>,
    /// Age in years (empty clears it)
    #[arg(long)]
    age: Option<String>,
    /// Date of birth, YYYY-MM-DD (empty clears it)
    #[arg(long)]
    dob: Option<String>,
    /// Contact number (empty clears it)
    #[arg(long)]
    contact: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password (read from stdin when omitted)
        #[arg(long, env = "AUTHDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account and log in
    Signup {
        /// Full name
        #[arg(long)]
        name: String,
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password (read from stdin when omitted)
        #[arg(long, env = "AUTHDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Age in years
        #[arg(long)]
        age: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
        /// Contact number
        #[arg(long)]
        contact: Option<String>,
    },

    /// View or edit the current profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Log out and clear the saved session
    Logout,

    /// Navigate to a client path (e.g. /signup, /profile/<id>)
    Open {
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Show the session and current location
    Status,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ProfileCommands {
    /// Fetch and print the profile
    Show {
        /// User id (defaults to the profile currently open)
        #[arg(long, value_name = "ID")]
        user: Option<String>,
    },
    /// Update profile fields
    Edit {
        /// User id (defaults to the profile currently open)
        #[arg(long, value_name = "ID")]
        user: Option<String>,
        #[command(flatten)]
        fields: ProfileArgs,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the config, session, location and log paths plus the API URL
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;
    let _log_guard = logging::init(&config.logging);

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&config, email, password).await
        }
        Commands::Signup {
            name,
            email,
            password,
            age,
            dob,
            contact,
        } => {
            let input = commands::auth::SignupInput {
                name,
                email,
                password,
                age,
                dob,
                contact,
            };
            commands::auth::signup(&config, input).await
        }
        Commands::Logout => commands::auth::logout(&config).await,
        Commands::Profile { command } => match command {
            ProfileCommands::Show { user } => {
                commands::profile::show(&config, user.as_deref()).await
            }
            ProfileCommands::Edit { user, fields } => {
                commands::profile::edit(&config, user.as_deref(), &fields.into()).await
            }
        },
        Commands::Open { path } => commands::profile::open(&config, &path).await,
        Commands::Status => commands::status(),
        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(&config),
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

impl From<ProfileArgs> for commands::profile::FieldUpdates {
    fn from(args: ProfileArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            age: args.age,
            dob: args.dob,
            contact: args.contact,
        }
    }
}
