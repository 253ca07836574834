//! Service wiring.

use std::sync::Arc;

use keepsake_auth::Authenticator;
use keepsake_core::config::AppConfig;
use keepsake_core::traits::BlobStore;
use keepsake_database::{
    AlbumRepository, CommentRepository, DatabasePool, MembershipRepository, MemoryDatabase,
    PhotoRepository, UserRepository,
};

use crate::album::AlbumService;
use crate::metadata::MetadataExtractor;
use crate::photo::PhotoService;

/// One handle per repository trait.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub albums: Arc<dyn AlbumRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub photos: Arc<dyn PhotoRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    /// Repositories backed by PostgreSQL.
    pub fn postgres(db: &DatabasePool) -> Self {
        Self {
            users: Arc::new(db.users()),
            albums: Arc::new(db.albums()),
            memberships: Arc::new(db.memberships()),
            photos: Arc::new(db.photos()),
            comments: Arc::new(db.comments()),
        }
    }

    /// Every repository served by the same in-memory store.
    pub fn in_memory(db: Arc<MemoryDatabase>) -> Self {
        Self {
            users: db.clone(),
            albums: db.clone(),
            memberships: db.clone(),
            photos: db.clone(),
            comments: db,
        }
    }
}

/// The fully wired service graph.
#[derive(Debug, Clone)]
pub struct AppServices {
    pub config: AppConfig,
    pub auth: Arc<Authenticator>,
    pub albums: Arc<AlbumService>,
    pub photos: Arc<PhotoService>,
}

impl AppServices {
    pub fn new(config: AppConfig, repos: Repositories, store: Arc<dyn BlobStore>) -> Self {
        let auth = Arc::new(Authenticator::new(repos.users.clone(), &config.auth));
        let albums = Arc::new(AlbumService::new(
            repos.albums.clone(),
            repos.memberships.clone(),
            repos.users.clone(),
            auth.clone(),
        ));
        let photos = Arc::new(PhotoService::new(
            repos.photos,
            repos.comments,
            repos.users,
            store,
            auth.clone(),
            MetadataExtractor::new(),
            config.storage.clone(),
        ));
        Self {
            config,
            auth,
            albums,
            photos,
        }
    }
}
