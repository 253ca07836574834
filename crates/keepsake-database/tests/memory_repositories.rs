//! Behaviour of the in-memory repositories that services rely on.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use keepsake_core::error::ErrorKind;
use keepsake_core::types::AlbumId;
use keepsake_database::memory::ops;
use keepsake_database::{
    AlbumRepository, CommentRepository, MembershipRepository, MemoryDatabase, PhotoRepository,
    UserRepository,
};
use keepsake_entity::{
    CreateAlbum, CreateComment, CreatePhoto, CreateUser, MemberRef, MemberRole, User,
};

async fn user(db: &MemoryDatabase, email: &str) -> User {
    let users: &dyn UserRepository = db;
    users
        .create(&CreateUser {
            email: email.to_string(),
            username: CreateUser::username_from_email(email),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap()
}

fn photo(album_id: AlbumId, owner: &User, day: u32) -> CreatePhoto {
    CreatePhoto {
        album_id,
        uploaded_by: owner.id,
        url: format!("file://{day}.jpg"),
        storage_key: format!("{album_id}/{day}.jpg"),
        captured_at: Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let db = MemoryDatabase::new();
    user(&db, "ana@example.com").await;

    let users: &dyn UserRepository = &db;
    let err = users
        .create(&CreateUser {
            email: "ANA@example.com".into(),
            username: "ana".into(),
            password_hash: "x".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(users.email_exists("ana@EXAMPLE.com").await.unwrap());
}

#[tokio::test]
async fn test_albums_listed_newest_first_including_memberships() {
    let db = Arc::new(MemoryDatabase::new());
    let ana = user(&db, "ana@example.com").await;
    let ben = user(&db, "ben@example.com").await;
    let albums: Arc<dyn AlbumRepository> = db.clone();
    let members: Arc<dyn MembershipRepository> = db.clone();

    let first = albums
        .create(&CreateAlbum { title: "Beach".into(), owner_id: ana.id })
        .await
        .unwrap();
    let second = albums
        .create(&CreateAlbum { title: "Hike".into(), owner_id: ben.id })
        .await
        .unwrap();
    members
        .add(second.id, None, "ana@example.com", MemberRole::Member)
        .await
        .unwrap();

    let listed = albums.list_for_user(ana.id, &ana.email).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let bens = albums.list_for_user(ben.id, &ben.email).await.unwrap();
    assert_eq!(bens.len(), 1);
}

#[tokio::test]
async fn test_membership_duplicate_and_removal() {
    let db = MemoryDatabase::new();
    let ana = user(&db, "ana@example.com").await;
    let members: &dyn MembershipRepository = &db;
    let album_id = AlbumId::new();

    members
        .add(album_id, Some(ana.id), "ana@example.com", MemberRole::Member)
        .await
        .unwrap();
    let err = members
        .add(album_id, None, "Ana@Example.com", MemberRole::Member)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.message, "User is already a member of this album.");

    members
        .add(album_id, None, "pending@example.com", MemberRole::Member)
        .await
        .unwrap();
    assert_eq!(
        members.role_of(album_id, ana.id).await.unwrap(),
        Some(MemberRole::Member)
    );

    assert!(members.remove(album_id, &MemberRef::User(ana.id)).await.unwrap());
    assert!(
        members
            .remove(album_id, &MemberRef::Email("pending@example.com".into()))
            .await
            .unwrap()
    );
    assert!(!members.remove(album_id, &MemberRef::User(ana.id)).await.unwrap());
    assert!(members.list(album_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_photos_sorted_by_capture_time() {
    let db = MemoryDatabase::new();
    let ana = user(&db, "ana@example.com").await;
    let photos: &dyn PhotoRepository = &db;
    let album_id = AlbumId::new();

    photos
        .insert_many(&[photo(album_id, &ana, 20), photo(album_id, &ana, 3)])
        .await
        .unwrap();
    photos.insert_many(&[photo(album_id, &ana, 9)]).await.unwrap();

    let listed = photos.list_by_album(album_id).await.unwrap();
    let days: Vec<_> = listed.iter().map(|p| p.url.clone()).collect();
    assert_eq!(days, vec!["file://3.jpg", "file://9.jpg", "file://20.jpg"]);
}

#[tokio::test]
async fn test_comments_oldest_first_and_removed_with_photo() {
    let db = MemoryDatabase::new();
    let ana = user(&db, "ana@example.com").await;
    let photos: &dyn PhotoRepository = &db;
    let comments: &dyn CommentRepository = &db;
    let stored = photos
        .insert_many(&[photo(AlbumId::new(), &ana, 1)])
        .await
        .unwrap();
    let photo_id = stored[0].id;

    for message in ["first", "second", "third"] {
        comments
            .create(&CreateComment { photo_id, user_id: ana.id, message: message.into() })
            .await
            .unwrap();
    }
    let listed = comments.list_by_photo(photo_id).await.unwrap();
    let messages: Vec<_> = listed.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);

    assert!(photos.delete(photo_id).await.unwrap());
    assert!(comments.list_by_photo(photo_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_injected_failure() {
    let db = MemoryDatabase::new();
    db.fail_on(ops::PHOTOS_LIST);
    let photos: &dyn PhotoRepository = &db;
    let err = photos.list_by_album(AlbumId::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);

    db.recover(ops::PHOTOS_LIST);
    assert!(photos.list_by_album(AlbumId::new()).await.unwrap().is_empty());
}
