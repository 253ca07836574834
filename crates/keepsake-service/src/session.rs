//! The open-album coordinator.
//!
//! A [`BookSession`] is the single owner of an open album's presentation
//! state. It loads data through the services, feeds the [`Book`], and
//! applies mutations to both. Loads carry an [`OpenTicket`]; a load whose
//! ticket is no longer current when it completes is dropped.

use std::sync::Arc;

use tracing::{debug, info, warn};

use keepsake_book::{Book, BookPhoto};
use keepsake_core::config::BookConfig;
use keepsake_core::error::AppError;
use keepsake_core::result::AppResult;
use keepsake_core::types::{AlbumId, PhotoId};
use keepsake_entity::{Album, Photo};

use crate::album::AlbumService;
use crate::photo::PhotoService;
use crate::upload::UploadFile;

/// Identifies one album-open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenTicket {
    pub album_id: AlbumId,
    generation: u64,
}

/// Everything fetched when an album is opened.
#[derive(Debug, Clone)]
pub struct AlbumLoad {
    pub album: Album,
    pub is_owner: bool,
    pub photos: Vec<Photo>,
}

/// State of the currently open album.
#[derive(Debug)]
pub struct BookSession {
    albums: Arc<AlbumService>,
    photos: Arc<PhotoService>,
    book: Book,
    album: Option<Album>,
    is_owner: bool,
    generation: u64,
}

impl BookSession {
    pub fn new(
        albums: Arc<AlbumService>,
        photos: Arc<PhotoService>,
        config: BookConfig,
    ) -> AppResult<Self> {
        Ok(Self {
            albums,
            photos,
            book: Book::new(config)?,
            album: None,
            is_owner: false,
            generation: 0,
        })
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn book_mut(&mut self) -> &mut Book {
        &mut self.book
    }

    pub fn album(&self) -> Option<&Album> {
        self.album.as_ref()
    }

    pub fn is_owner(&self) -> bool {
        self.is_owner
    }

    /// Open an album: resolve ownership, load photos, start at spread 0.
    pub async fn open_album(&mut self, album_id: AlbumId) -> AppResult<&Album> {
        let ticket = self.begin_open(album_id);
        let load = self.fetch(album_id).await?;
        self.finish_open(ticket, load);
        self.album
            .as_ref()
            .ok_or_else(|| AppError::internal("Album was not opened"))
    }

    /// Start opening an album. Any earlier ticket becomes stale and the
    /// book is cleared immediately.
    pub fn begin_open(&mut self, album_id: AlbumId) -> OpenTicket {
        self.generation += 1;
        self.album = None;
        self.is_owner = false;
        self.book.reset();
        debug!(album_id = %album_id, generation = self.generation, "Opening album");
        OpenTicket {
            album_id,
            generation: self.generation,
        }
    }

    /// Fetch album, ownership and photos.
    pub async fn fetch(&self, album_id: AlbumId) -> AppResult<AlbumLoad> {
        let album = self.albums.get(album_id).await?;
        let is_owner = self.albums.resolve_ownership(album_id).await;
        let photos = self.photos.list(album_id).await?;
        Ok(AlbumLoad {
            album,
            is_owner,
            photos,
        })
    }

    /// Apply a completed load. Returns `false` if the ticket is stale and
    /// the load was discarded.
    pub fn finish_open(&mut self, ticket: OpenTicket, load: AlbumLoad) -> bool {
        if ticket.generation != self.generation {
            debug!(
                album_id = %ticket.album_id,
                stale = ticket.generation,
                current = self.generation,
                "Discarding stale album load"
            );
            return false;
        }

        self.book
            .replace_photos(load.photos.iter().map(BookPhoto::from).collect());
        info!(
            album_id = %load.album.id,
            photos = load.photos.len(),
            is_owner = load.is_owner,
            "Album opened"
        );
        self.is_owner = load.is_owner;
        self.album = Some(load.album);
        true
    }

    /// Upload files into the open album and place them in the book.
    pub async fn add_photos(&mut self, files: Vec<UploadFile>) -> AppResult<Vec<Photo>> {
        let ticket = self.begin_add()?;
        let stored = self.upload(ticket, files).await?;
        self.finish_add(ticket, &stored);
        Ok(stored)
    }

    /// Start adding photos to the open album.
    pub fn begin_add(&self) -> AppResult<OpenTicket> {
        Ok(OpenTicket {
            album_id: self.require_album()?,
            generation: self.generation,
        })
    }

    /// Store files for the ticket's album.
    pub async fn upload(&self, ticket: OpenTicket, files: Vec<UploadFile>) -> AppResult<Vec<Photo>> {
        self.photos.upload(ticket.album_id, files).await
    }

    /// Place stored photos in the book. Returns `false` if the album was
    /// closed or switched since [`begin_add`](Self::begin_add); the photos
    /// stay stored but the book is left alone.
    pub fn finish_add(&mut self, ticket: OpenTicket, stored: &[Photo]) -> bool {
        if ticket.generation != self.generation {
            debug!(
                album_id = %ticket.album_id,
                stale = ticket.generation,
                current = self.generation,
                "Discarding stale upload"
            );
            return false;
        }
        self.book.insert_photos(stored.iter().map(BookPhoto::from));
        true
    }

    /// Delete a photo from the open album. Owner only.
    ///
    /// On failure nothing in the book changes, so the caller can retry.
    pub async fn delete_photo(&mut self, photo_id: PhotoId) -> AppResult<()> {
        self.require_album()?;
        if !self.is_owner {
            return Err(AppError::authorization("Only the album owner can delete photos."));
        }
        let storage_key = self
            .book
            .find_photo(photo_id)
            .map(|photo| photo.storage_key.clone())
            .ok_or_else(|| AppError::not_found(format!("Photo {photo_id} is not in this album")))?;

        if let Err(e) = self.photos.delete(photo_id, &storage_key).await {
            warn!(photo_id = %photo_id, error = %e, "Delete failed");
            return Err(e);
        }
        self.book.remove_photo(photo_id);
        Ok(())
    }

    /// Change a caption in the store and in the book.
    pub async fn describe_photo(&mut self, photo_id: PhotoId, description: Option<&str>) -> AppResult<Photo> {
        self.require_album()?;
        let photo = self.photos.update_description(photo_id, description).await?;
        self.book
            .update_description(photo_id, photo.description.clone());
        Ok(photo)
    }

    /// Close the album (sign-out or album switch).
    pub fn close(&mut self) {
        self.generation += 1;
        self.album = None;
        self.is_owner = false;
        self.book.reset();
        debug!("Album closed");
    }

    fn require_album(&self) -> AppResult<AlbumId> {
        self.album
            .as_ref()
            .map(|album| album.id)
            .ok_or_else(|| AppError::validation("No album is open"))
    }
}
