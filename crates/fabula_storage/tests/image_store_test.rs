//! Tests for the image cache.

use fabula_core::StoryId;
use fabula_storage::ImageStore;
use tempfile::TempDir;

/// A minimal buffer that passes PNG signature verification.
fn fake_png() -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(b"payload");
    data
}

#[tokio::test]
async fn test_store_and_read() {
    let temp_dir = TempDir::new().unwrap();
    let store = ImageStore::open(temp_dir.path()).unwrap();

    let data = fake_png();
    let filename = store
        .store_scene_image(StoryId::new(), 1, &data)
        .await
        .unwrap();

    assert!(filename.starts_with("scene_"));
    assert!(filename.ends_with(".png"));
    assert!(store.exists(&filename).await);

    let read_back = store.read(&filename).await.unwrap();
    assert_eq!(read_back, data);
}

#[tokio::test]
async fn test_non_png_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let store = ImageStore::open(temp_dir.path()).unwrap();

    let result = store
        .store_scene_image(StoryId::new(), 1, b"definitely not a png")
        .await;
    assert!(result.is_err());

    // The bad file must not be left behind
    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_traversal_filenames_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let store = ImageStore::open(temp_dir.path()).unwrap();

    assert!(store.read("../secrets.txt").await.is_err());
    assert!(store.read("a/b.png").await.is_err());
    assert!(!store.exists("../secrets.txt").await);
}

#[tokio::test]
async fn test_missing_image_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let store = ImageStore::open(temp_dir.path()).unwrap();

    let result = store.read("scene_missing.png").await;
    assert!(result.is_err());
}
