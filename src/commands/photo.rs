//! Photo commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use keepsake_book::format_label;
use keepsake_core::config::AppConfig;
use keepsake_core::result::AppResult;
use keepsake_core::types::{AlbumId, PhotoId};
use keepsake_entity::Photo;
use keepsake_service::{BookSession, UploadFile};

use super::Credentials;
use crate::output::{self, OutputFormat};

/// Arguments for photo commands
#[derive(Debug, Args)]
pub struct PhotoArgs {
    #[command(flatten)]
    pub creds: Credentials,

    #[command(subcommand)]
    pub command: PhotoCommand,
}

/// Photo subcommands
#[derive(Debug, Subcommand)]
pub enum PhotoCommand {
    /// List an album's photos, oldest capture first
    List {
        /// Album ID
        album: AlbumId,
    },
    /// Upload image files into an album
    Upload {
        /// Album ID
        album: AlbumId,
        /// Image files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Delete a photo (album owner only)
    Delete {
        /// Album ID
        album: AlbumId,
        /// Photo ID
        photo: PhotoId,
    },
    /// Set or clear a photo's description
    Describe {
        /// Photo ID
        photo: PhotoId,
        /// New description; omit to clear
        text: Option<String>,
    },
}

/// Photo display row
#[derive(Debug, Serialize, Tabled)]
pub struct PhotoRow {
    id: String,
    date: String,
    description: String,
    url: String,
}

impl From<&Photo> for PhotoRow {
    fn from(photo: &Photo) -> Self {
        Self {
            id: photo.id.to_string(),
            date: format_label(photo.captured_at.date_naive()),
            description: photo.description.clone().unwrap_or_default(),
            url: photo.url.clone(),
        }
    }
}

/// Read files from disk, skipping the ones that cannot be read.
pub async fn read_files(paths: &[PathBuf]) -> Vec<UploadFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match UploadFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => output::print_warning(&format!("Skipping {}: {}", path.display(), e.message)),
        }
    }
    files
}

pub async fn execute(args: &PhotoArgs, config: AppConfig, format: OutputFormat) -> AppResult<()> {
    let (services, _) = super::signed_in(config, &args.creds).await?;

    match &args.command {
        PhotoCommand::List { album } => {
            let photos = services.photos.list(*album).await?;
            let rows: Vec<PhotoRow> = photos.iter().map(PhotoRow::from).collect();
            output::print_list(&rows, format);
        }
        PhotoCommand::Upload { album, paths } => {
            let files = read_files(paths).await;
            let requested = paths.len();
            let stored = services.photos.upload(*album, files).await?;
            let rows: Vec<PhotoRow> = stored.iter().map(PhotoRow::from).collect();
            output::print_list(&rows, format);
            if stored.len() < requested {
                output::print_warning(&format!(
                    "{} of {} files could not be uploaded",
                    requested - stored.len(),
                    requested
                ));
            } else {
                output::print_success(&format!("{} photos uploaded", stored.len()));
            }
        }
        PhotoCommand::Delete { album, photo } => {
            let mut session = BookSession::new(
                services.albums.clone(),
                services.photos.clone(),
                services.config.book.clone(),
            )?;
            session.open_album(*album).await?;
            session.delete_photo(*photo).await?;
            output::print_success(&format!("Photo {photo} deleted"));
        }
        PhotoCommand::Describe { photo, text } => {
            let updated = services
                .photos
                .update_description(*photo, text.as_deref())
                .await?;
            match updated.description {
                Some(description) => output::print_success(&format!("Description set: {description}")),
                None => output::print_success("Description cleared"),
            }
        }
    }

    Ok(())
}
