//! Service behaviour over the in-memory repositories and blob store.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use keepsake_core::config::AppConfig;
use keepsake_core::error::ErrorKind;
use keepsake_core::traits::BlobStore;
use keepsake_database::memory::ops;
use keepsake_database::{MembershipRepository, MemoryDatabase};
use keepsake_entity::{MemberRef, MemberRole, Session};
use keepsake_service::{AppServices, BookSession, Repositories, UploadFile};
use keepsake_storage::MemoryBlobStore;

struct Harness {
    db: Arc<MemoryDatabase>,
    store: Arc<MemoryBlobStore>,
    services: AppServices,
}

fn harness() -> Harness {
    let db = Arc::new(MemoryDatabase::new());
    let store = Arc::new(MemoryBlobStore::new());
    let config = AppConfig::from_toml_str(
        r#"
        [database]
        url = "postgres://unused"

        [storage]
        max_upload_size_bytes = 4096
        "#,
    )
    .unwrap();
    let services = AppServices::new(config, Repositories::in_memory(db.clone()), store.clone());
    Harness { db, store, services }
}

impl Harness {
    async fn register(&self, email: &str) {
        self.services.auth.sign_up(email, "secret1").await.unwrap();
    }

    async fn login(&self, email: &str) -> Session {
        self.services.auth.sign_in(email, "secret1").await.unwrap()
    }
}

/// A minimal JPEG carrying only `DateTimeOriginal`.
fn jpeg_taken(date: &str) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\0\x2a\0\0\0\x08");
    tiff.extend_from_slice(&[0, 1, 0x87, 0x69, 0, 4, 0, 0, 0, 1, 0, 0, 0, 26, 0, 0, 0, 0]);
    tiff.extend_from_slice(&[0, 1, 0x90, 0x03, 0, 2, 0, 0, 0, 20, 0, 0, 0, 44, 0, 0, 0, 0]);
    tiff.extend_from_slice(date.as_bytes());
    tiff.push(0);

    let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1];
    jpeg.extend_from_slice(&((tiff.len() + 8) as u16).to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xff, 0xd9]);
    jpeg
}

fn dated_file(name: &str, y: i32, m: u32, d: u32) -> UploadFile {
    UploadFile::new(name, b"plain bytes".to_vec())
        .with_modified(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
}

#[tokio::test]
async fn test_album_creation_and_listing() {
    let h = harness();
    h.register("ana@example.com").await;

    let err = h.services.albums.create("Trip").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);

    h.login("ana@example.com").await;
    assert_eq!(
        h.services.albums.create("   ").await.unwrap_err().kind,
        ErrorKind::Validation
    );
    let first = h.services.albums.create("  Summer  ").await.unwrap();
    assert_eq!(first.title, "Summer");
    let second = h.services.albums.create("Winter").await.unwrap();

    let mine = h.services.albums.list_mine().await.unwrap();
    let ids: Vec<_> = mine.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn test_member_list_synthesizes_owner() {
    let h = harness();
    h.register("owner@example.com").await;
    h.register("guest@example.com").await;

    let owner = h.login("owner@example.com").await;
    let album = h.services.albums.create("Family").await.unwrap();
    h.services
        .albums
        .add_member(album.id, "guest@example.com")
        .await
        .unwrap();
    // A stored row for the owner must not show up twice.
    let memberships: &dyn MembershipRepository = h.db.as_ref();
    memberships
        .add(album.id, Some(owner.user_id), "owner-alias@example.com", MemberRole::Owner)
        .await
        .unwrap();

    let members = h.services.albums.list_members(album.id).await.unwrap();
    assert_eq!(members.len(), 2);
    assert!(members[0].is_owner());
    assert_eq!(members[0].email, "owner@example.com");
    assert_eq!(members[1].email, "guest@example.com");

    h.login("guest@example.com").await;
    let seen_by_guest = h.services.albums.list_members(album.id).await.unwrap();
    assert_eq!(seen_by_guest[0].email, "owner@example.com");

    h.db.fail_on(ops::USERS_FIND);
    let degraded = h.services.albums.list_members(album.id).await.unwrap();
    assert_eq!(degraded[0].email, "Album Owner");
}

#[tokio::test]
async fn test_add_member_rules() {
    let h = harness();
    h.register("owner@example.com").await;
    h.register("guest@example.com").await;
    h.login("owner@example.com").await;
    let album = h.services.albums.create("Family").await.unwrap();

    let err = h
        .services
        .albums
        .add_member(album.id, " Owner@Example.com ")
        .await
        .unwrap_err();
    assert_eq!(err.message, "You cannot invite yourself.");

    let linked = h
        .services
        .albums
        .add_member(album.id, "guest@example.com")
        .await
        .unwrap();
    assert!(linked.user_id.is_some());
    let pending = h
        .services
        .albums
        .add_member(album.id, "later@example.com")
        .await
        .unwrap();
    assert!(pending.user_id.is_none());

    let dup = h
        .services
        .albums
        .add_member(album.id, "GUEST@example.com")
        .await
        .unwrap_err();
    assert_eq!(dup.kind, ErrorKind::Conflict);
    assert_eq!(dup.message, "User is already a member of this album.");

    h.login("guest@example.com").await;
    let denied = h
        .services
        .albums
        .add_member(album.id, "someone@example.com")
        .await
        .unwrap_err();
    assert_eq!(denied.kind, ErrorKind::Authorization);
    let albums = h.services.albums.list_mine().await.unwrap();
    assert_eq!(albums.len(), 1);
}

#[tokio::test]
async fn test_remove_member_by_user_or_email() {
    let h = harness();
    h.register("owner@example.com").await;
    h.register("guest@example.com").await;
    h.login("owner@example.com").await;
    let album = h.services.albums.create("Family").await.unwrap();

    let guest = h
        .services
        .albums
        .add_member(album.id, "guest@example.com")
        .await
        .unwrap();
    h.services
        .albums
        .add_member(album.id, "later@example.com")
        .await
        .unwrap();

    assert!(
        h.services
            .albums
            .remove_member(album.id, &guest.member_ref())
            .await
            .unwrap()
    );
    assert!(
        h.services
            .albums
            .remove_member(album.id, &MemberRef::Email("later@example.com".into()))
            .await
            .unwrap()
    );
    let members = h.services.albums.list_members(album.id).await.unwrap();
    assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn test_ownership_resolution_falls_back_to_false() {
    let h = harness();
    h.register("owner@example.com").await;
    h.register("guest@example.com").await;
    h.login("owner@example.com").await;
    let album = h.services.albums.create("Family").await.unwrap();
    h.services
        .albums
        .add_member(album.id, "guest@example.com")
        .await
        .unwrap();

    assert!(h.services.albums.resolve_ownership(album.id).await);

    h.login("guest@example.com").await;
    assert!(!h.services.albums.resolve_ownership(album.id).await);

    h.login("owner@example.com").await;
    h.db.fail_on(ops::ALBUMS_FIND);
    assert!(!h.services.albums.resolve_ownership(album.id).await);
}

#[tokio::test]
async fn test_upload_drops_failed_files() {
    let h = harness();
    h.register("ana@example.com").await;
    h.login("ana@example.com").await;
    let album = h.services.albums.create("Trip").await.unwrap();

    let files = vec![
        UploadFile::new("exif.JPG", jpeg_taken("2024:07:04 18:00:00")),
        dated_file("plain.png", 2024, 3, 9),
        UploadFile::new("huge.jpg", vec![0u8; 10_000]),
    ];
    let stored = h.services.photos.upload(album.id, files).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(h.store.len(), 2);

    let exif = stored.iter().find(|p| p.storage_key.ends_with(".jpg")).unwrap();
    assert_eq!(exif.captured_at, Utc.with_ymd_and_hms(2024, 7, 4, 18, 0, 0).unwrap());
    assert!(exif.storage_key.starts_with(&format!("{}/", album.id)));
    assert_eq!(exif.url, h.store.public_url(&exif.storage_key));

    let listed = h.services.photos.list(album.id).await.unwrap();
    assert_eq!(listed[0].storage_key, stored[1].storage_key);
}

#[tokio::test]
async fn test_upload_with_no_survivors_skips_database() {
    let h = harness();
    h.register("ana@example.com").await;
    h.login("ana@example.com").await;
    let album = h.services.albums.create("Trip").await.unwrap();

    h.db.fail_on(ops::PHOTOS_INSERT);
    h.store.set_fail_writes(true);
    let stored = h
        .services
        .photos
        .upload(album.id, vec![dated_file("a.jpg", 2024, 1, 1)])
        .await
        .unwrap();
    assert!(stored.is_empty());
    assert!(h.services.photos.upload(album.id, Vec::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_tolerates_blob_failure_only() {
    let h = harness();
    h.register("ana@example.com").await;
    h.login("ana@example.com").await;
    let album = h.services.albums.create("Trip").await.unwrap();
    let stored = h
        .services
        .photos
        .upload(
            album.id,
            vec![dated_file("a.jpg", 2024, 1, 1), dated_file("b.jpg", 2024, 1, 2)],
        )
        .await
        .unwrap();

    h.store.set_fail_deletes(true);
    h.services
        .photos
        .delete(stored[0].id, &stored[0].storage_key)
        .await
        .unwrap();
    assert_eq!(h.db.photo_count(), 1);
    assert_eq!(h.store.len(), 2);

    h.db.fail_on(ops::PHOTOS_DELETE);
    let err = h
        .services
        .photos
        .delete(stored[1].id, &stored[1].storage_key)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);
}

#[tokio::test]
async fn test_comments_with_usernames() {
    let h = harness();
    h.register("ana@example.com").await;
    h.register("ben@example.com").await;
    h.login("ana@example.com").await;
    let album = h.services.albums.create("Trip").await.unwrap();
    let photo = h
        .services
        .photos
        .upload(album.id, vec![dated_file("a.jpg", 2024, 1, 1)])
        .await
        .unwrap()
        .remove(0);

    assert_eq!(
        h.services.photos.add_comment(photo.id, "  ").await.unwrap_err().kind,
        ErrorKind::Validation
    );
    let first = h.services.photos.add_comment(photo.id, " Lovely! ").await.unwrap();
    assert_eq!(first.comment.message, "Lovely!");
    assert_eq!(first.username, "ana");

    h.login("ben@example.com").await;
    h.services.photos.add_comment(photo.id, "Agreed").await.unwrap();

    let comments = h.services.photos.list_comments(photo.id).await.unwrap();
    let rendered: Vec<_> = comments
        .iter()
        .map(|c| format!("{}: {}", c.username, c.comment.message))
        .collect();
    assert_eq!(rendered, vec!["ana: Lovely!", "ben: Agreed"]);

    h.db.fail_on(ops::USERS_FIND);
    let degraded = h.services.photos.list_comments(photo.id).await.unwrap();
    assert!(degraded.iter().all(|c| c.username == "User"));
}

#[tokio::test]
async fn test_description_update() {
    let h = harness();
    h.register("ana@example.com").await;
    h.login("ana@example.com").await;
    let album = h.services.albums.create("Trip").await.unwrap();
    let photo = h
        .services
        .photos
        .upload(album.id, vec![dated_file("a.jpg", 2024, 1, 1)])
        .await
        .unwrap()
        .remove(0);

    let updated = h
        .services
        .photos
        .update_description(photo.id, Some(" Sunset "))
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Sunset"));
    let cleared = h
        .services
        .photos
        .update_description(photo.id, Some(""))
        .await
        .unwrap();
    assert_eq!(cleared.description, None);
}

fn session(h: &Harness) -> BookSession {
    BookSession::new(
        h.services.albums.clone(),
        h.services.photos.clone(),
        h.services.config.book.clone(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_book_session_lifecycle() {
    let h = harness();
    h.register("ana@example.com").await;
    h.login("ana@example.com").await;
    let album = h.services.albums.create("Trip").await.unwrap();
    h.services
        .photos
        .upload(
            album.id,
            vec![
                dated_file("a.jpg", 2025, 12, 1),
                dated_file("b.jpg", 2025, 12, 15),
                dated_file("c.jpg", 2026, 1, 2),
            ],
        )
        .await
        .unwrap();

    let mut session = session(&h);
    session.open_album(album.id).await.unwrap();
    assert!(session.is_owner());
    assert_eq!(session.book().pages().len(), 2);
    assert_eq!(session.book().leaf_count(), 1);
    assert_eq!(session.book().current_spread(), 0);

    session
        .add_photos(vec![dated_file("d.jpg", 2025, 12, 20)])
        .await
        .unwrap();
    let labels: Vec<_> = session.book().photos().iter().map(|p| p.label.clone()).collect();
    assert_eq!(
        labels,
        vec!["Dec 1, 2025", "Dec 15, 2025", "Dec 20, 2025", "Jan 2, 2026"]
    );

    session.book_mut().next();
    let target = session.book().photos()[0].id;
    session.delete_photo(target).await.unwrap();
    assert_eq!(session.book().photos().len(), 3);
    assert!(h.services.photos.get(target).await.is_err());

    session.close();
    assert!(session.album().is_none());
    assert!(session.book().photos().is_empty());
    assert_eq!(session.book().current_spread(), 0);
}

#[tokio::test]
async fn test_failed_delete_leaves_book_untouched() {
    let h = harness();
    h.register("ana@example.com").await;
    h.login("ana@example.com").await;
    let album = h.services.albums.create("Trip").await.unwrap();
    h.services
        .photos
        .upload(album.id, vec![dated_file("a.jpg", 2025, 1, 1)])
        .await
        .unwrap();

    let mut session = session(&h);
    session.open_album(album.id).await.unwrap();
    let target = session.book().photos()[0].id;

    h.db.fail_on(ops::PHOTOS_DELETE);
    assert!(session.delete_photo(target).await.is_err());
    assert_eq!(session.book().photos().len(), 1);

    h.db.recover(ops::PHOTOS_DELETE);
    session.delete_photo(target).await.unwrap();
    assert!(session.book().photos().is_empty());
}

#[tokio::test]
async fn test_members_cannot_delete_photos() {
    let h = harness();
    h.register("owner@example.com").await;
    h.register("guest@example.com").await;
    h.login("owner@example.com").await;
    let album = h.services.albums.create("Trip").await.unwrap();
    h.services
        .albums
        .add_member(album.id, "guest@example.com")
        .await
        .unwrap();
    h.services
        .photos
        .upload(album.id, vec![dated_file("a.jpg", 2025, 1, 1)])
        .await
        .unwrap();

    h.login("guest@example.com").await;
    let mut session = session(&h);
    session.open_album(album.id).await.unwrap();
    assert!(!session.is_owner());
    let target = session.book().photos()[0].id;
    let err = session.delete_photo(target).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_stale_album_load_is_discarded() {
    let h = harness();
    h.register("ana@example.com").await;
    h.login("ana@example.com").await;
    let first = h.services.albums.create("First").await.unwrap();
    let second = h.services.albums.create("Second").await.unwrap();
    h.services
        .photos
        .upload(first.id, vec![dated_file("a.jpg", 2025, 1, 1)])
        .await
        .unwrap();

    let mut session = session(&h);
    let stale = session.begin_open(first.id);
    let stale_load = session.fetch(first.id).await.unwrap();
    let current = session.begin_open(second.id);
    let current_load = session.fetch(second.id).await.unwrap();

    assert!(session.finish_open(current, current_load));
    assert!(!session.finish_open(stale, stale_load));
    assert_eq!(session.album().map(|a| a.id), Some(second.id));
    assert!(session.book().photos().is_empty());
}

#[tokio::test]
async fn test_upload_into_switched_album_skips_book() {
    let h = harness();
    h.register("ana@example.com").await;
    h.login("ana@example.com").await;
    let first = h.services.albums.create("First").await.unwrap();
    let second = h.services.albums.create("Second").await.unwrap();

    let mut session = session(&h);
    assert!(session.begin_add().is_err());
    session.open_album(first.id).await.unwrap();

    let ticket = session.begin_add().unwrap();
    let stored = session
        .upload(ticket, vec![dated_file("a.jpg", 2025, 1, 1)])
        .await
        .unwrap();
    session.open_album(second.id).await.unwrap();

    assert!(!session.finish_add(ticket, &stored));
    assert!(session.book().photos().is_empty());
    assert_eq!(h.services.photos.list(first.id).await.unwrap().len(), 1);

    let ticket = session.begin_add().unwrap();
    let stored = session
        .upload(ticket, vec![dated_file("b.jpg", 2025, 2, 1)])
        .await
        .unwrap();
    assert!(session.finish_add(ticket, &stored));
    assert_eq!(session.book().photos().len(), 1);
}
