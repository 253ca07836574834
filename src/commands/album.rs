//! Album commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use keepsake_core::config::AppConfig;
use keepsake_core::result::AppResult;
use keepsake_entity::Album;

use super::Credentials;
use crate::output::{self, OutputFormat};

/// Arguments for album commands
#[derive(Debug, Args)]
pub struct AlbumArgs {
    #[command(flatten)]
    pub creds: Credentials,

    #[command(subcommand)]
    pub command: AlbumCommand,
}

/// Album subcommands
#[derive(Debug, Subcommand)]
pub enum AlbumCommand {
    /// List albums you own or belong to, newest first
    List,
    /// Create an album
    Create {
        /// Album title
        title: String,
    },
}

/// Album display row
#[derive(Debug, Serialize, Tabled)]
pub struct AlbumRow {
    id: String,
    title: String,
    role: String,
    created_at: String,
}

impl AlbumRow {
    fn new(album: &Album, viewer: keepsake_core::types::UserId) -> Self {
        Self {
            id: album.id.to_string(),
            title: album.title.clone(),
            role: if album.is_owned_by(viewer) { "owner" } else { "member" }.to_string(),
            created_at: album.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub async fn execute(args: &AlbumArgs, config: AppConfig, format: OutputFormat) -> AppResult<()> {
    let (services, session) = super::signed_in(config, &args.creds).await?;

    match &args.command {
        AlbumCommand::List => {
            let albums = services.albums.list_mine().await?;
            let rows: Vec<AlbumRow> = albums
                .iter()
                .map(|album| AlbumRow::new(album, session.user_id))
                .collect();
            output::print_list(&rows, format);
        }
        AlbumCommand::Create { title } => {
            let album = services.albums.create(title).await?;
            match format {
                OutputFormat::Json => output::print_item(&album, format),
                OutputFormat::Table => {
                    output::print_success(&format!("Album '{}' created ({})", album.title, album.id))
                }
            }
        }
    }

    Ok(())
}
