//! CLI command definitions and dispatch.

pub mod album;
pub mod browse;
pub mod comment;
pub mod config;
pub mod member;
pub mod migrate;
pub mod photo;
pub mod signup;

use clap::{Args, Parser, Subcommand};

use keepsake_core::config::AppConfig;
use keepsake_core::error::AppError;
use keepsake_core::result::AppResult;
use keepsake_database::DatabasePool;
use keepsake_entity::Session;
use keepsake_service::{AppServices, Repositories};

use crate::output::OutputFormat;

/// Password source checked before prompting.
const PASSWORD_ENV: &str = "KEEPSAKE_PASSWORD";

/// Keepsake: photo albums browsed as a page-turning book
#[derive(Debug, Parser)]
#[command(name = "keepsake", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (loads config/default.toml then config/{env}.toml)
    #[arg(short, long, default_value = "development")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create an account
    Signup(Credentials),
    /// Album management
    Albums(album::AlbumArgs),
    /// Album membership management
    Members(member::MemberArgs),
    /// Photo management
    Photos(photo::PhotoArgs),
    /// Photo comments
    Comments(comment::CommentArgs),
    /// Page through an album as a book
    Browse(browse::BrowseArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

/// Account used by a command.
#[derive(Debug, Clone, Args)]
pub struct Credentials {
    /// Account email
    #[arg(short, long)]
    pub email: String,
}

impl Cli {
    /// Execute the selected command.
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        match &self.command {
            Commands::Migrate => migrate::execute(&config).await,
            Commands::Config(args) => config::execute(args, &config, self.format),
            Commands::Signup(creds) => signup::execute(creds, config).await,
            Commands::Albums(args) => album::execute(args, config, self.format).await,
            Commands::Members(args) => member::execute(args, config, self.format).await,
            Commands::Photos(args) => photo::execute(args, config, self.format).await,
            Commands::Comments(args) => comment::execute(args, config, self.format).await,
            Commands::Browse(args) => browse::execute(args, config).await,
        }
    }
}

/// Connect to the database and local blob store and wire the services.
pub async fn connect(config: AppConfig) -> AppResult<AppServices> {
    let db = DatabasePool::connect(&config.database).await?;
    let store = keepsake_storage::open_local(&config.storage).await?;
    Ok(AppServices::new(config, Repositories::postgres(&db), store))
}

/// Password from `KEEPSAKE_PASSWORD`, or an interactive prompt.
pub fn read_password(confirm: bool) -> AppResult<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }

    let mut prompt = dialoguer::Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}

/// Connect and sign in with the given credentials.
pub async fn signed_in(config: AppConfig, creds: &Credentials) -> AppResult<(AppServices, Session)> {
    let services = connect(config).await?;
    let password = read_password(false)?;
    let session = services.auth.sign_in(&creds.email, &password).await?;
    Ok((services, session))
}
