//! Comment commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use keepsake_core::config::AppConfig;
use keepsake_core::result::AppResult;
use keepsake_core::types::PhotoId;
use keepsake_entity::CommentView;

use super::Credentials;
use crate::output::{self, OutputFormat};

/// Arguments for comment commands
#[derive(Debug, Args)]
pub struct CommentArgs {
    #[command(flatten)]
    pub creds: Credentials,

    #[command(subcommand)]
    pub command: CommentCommand,
}

/// Comment subcommands
#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// List comments on a photo, oldest first
    List {
        /// Photo ID
        photo: PhotoId,
    },
    /// Comment on a photo
    Add {
        /// Photo ID
        photo: PhotoId,
        /// Comment text
        text: String,
    },
}

/// Comment display row
#[derive(Debug, Serialize, Tabled)]
pub struct CommentRow {
    author: String,
    message: String,
    posted: String,
}

impl From<&CommentView> for CommentRow {
    fn from(view: &CommentView) -> Self {
        Self {
            author: view.username.clone(),
            message: view.comment.message.clone(),
            posted: view.comment.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub async fn execute(args: &CommentArgs, config: AppConfig, format: OutputFormat) -> AppResult<()> {
    let (services, _) = super::signed_in(config, &args.creds).await?;

    match &args.command {
        CommentCommand::List { photo } => {
            let comments = services.photos.list_comments(*photo).await?;
            let rows: Vec<CommentRow> = comments.iter().map(CommentRow::from).collect();
            output::print_list(&rows, format);
        }
        CommentCommand::Add { photo, text } => {
            let view = services.photos.add_comment(*photo, text).await?;
            match format {
                OutputFormat::Json => output::print_item(&view, format),
                OutputFormat::Table => output::print_success(&format!("Commented as {}", view.username)),
            }
        }
    }

    Ok(())
}
