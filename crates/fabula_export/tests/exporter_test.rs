//! Tests for the story exporter.

use fabula_core::{AgeGroup, ArtStyle, AspectRatio, ExportFormat, Genre, Scene, Story};
use fabula_export::{ExportRequest, StoryExporter};
use fabula_storage::ImageStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;

fn sample_story() -> Story {
    let mut story = Story::new(
        "The Lighthouse Fox",
        "A fox who keeps a lighthouse",
        2,
        AgeGroup::Middle,
        Genre::Adventure,
        ArtStyle::Watercolor,
        AspectRatio::Wide,
    );
    story
        .push_scene(Scene::new(
            1,
            "The Dark Lamp",
            "The lamp would not light tonight.",
            "a fox beside an unlit lamp",
            vec![],
        ))
        .unwrap();
    story
        .push_scene(Scene::new(
            2,
            "The Climb",
            "Luna climbed the spiral stairs.",
            "fox on stairs",
            vec![],
        ))
        .unwrap();
    story
}

fn exporter(temp_dir: &TempDir) -> StoryExporter {
    let images = Arc::new(ImageStore::open(temp_dir.path().join("images")).unwrap());
    StoryExporter::new(temp_dir.path().join("output"), images).unwrap()
}

#[tokio::test]
async fn test_json_export_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let exporter = exporter(&temp_dir);
    let story = sample_story();

    let filename = exporter
        .export(&story, ExportFormat::Json, &ExportRequest::default())
        .await
        .unwrap();
    assert!(filename.ends_with(".json"));

    let bytes = exporter.read(&filename).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["story"]["title"], "The Lighthouse Fox");
    assert_eq!(value["metadata"]["version"], "1.0");
    assert_eq!(value["story"]["scenes"].as_array().unwrap().len(), 2);

    // The backup parses back into a Story
    let restored: Story = serde_json::from_value(value["story"].clone()).unwrap();
    assert_eq!(restored, story);
}

#[tokio::test]
async fn test_json_export_without_metadata() {
    let temp_dir = TempDir::new().unwrap();
    let exporter = exporter(&temp_dir);

    let request = ExportRequest {
        include_metadata: false,
        ..Default::default()
    };
    let filename = exporter
        .export(&sample_story(), ExportFormat::Json, &request)
        .await
        .unwrap();

    let bytes = exporter.read(&filename).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(value["metadata"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_html_export_embeds_data_urls() {
    let temp_dir = TempDir::new().unwrap();
    let exporter = exporter(&temp_dir);

    let mut images = BTreeMap::new();
    images.insert(0u32, "data:image/png;base64,AQID".to_string());
    let request = ExportRequest {
        images,
        ..Default::default()
    };

    let filename = exporter
        .export(&sample_story(), ExportFormat::Html, &request)
        .await
        .unwrap();
    assert!(filename.ends_with(".html"));

    let html = String::from_utf8(exporter.read(&filename).await.unwrap()).unwrap();
    assert!(html.contains("The Lighthouse Fox"));
    assert!(html.contains("data:image/png;base64,AQID"));
}

#[tokio::test]
async fn test_pdf_export_produces_pdf_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let exporter = exporter(&temp_dir);

    let filename = exporter
        .export(&sample_story(), ExportFormat::Pdf, &ExportRequest::default())
        .await
        .unwrap();
    assert!(filename.ends_with(".pdf"));

    let bytes = exporter.read(&filename).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_remote_images_are_skipped_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let exporter = exporter(&temp_dir);

    let mut images = BTreeMap::new();
    images.insert(0u32, "https://example.com/i.png".to_string());
    let request = ExportRequest {
        images,
        ..Default::default()
    };

    let filename = exporter
        .export(&sample_story(), ExportFormat::Html, &request)
        .await
        .unwrap();
    let html = String::from_utf8(exporter.read(&filename).await.unwrap()).unwrap();
    assert!(!html.contains("scene-image"));
}

#[tokio::test]
async fn test_custom_filenames_are_validated() {
    let temp_dir = TempDir::new().unwrap();
    let exporter = exporter(&temp_dir);

    let request = ExportRequest {
        filename: Some("../escape.json".to_string()),
        ..Default::default()
    };
    assert!(
        exporter
            .export(&sample_story(), ExportFormat::Json, &request)
            .await
            .is_err()
    );

    assert!(exporter.read("../../etc/passwd").await.is_err());
}

#[tokio::test]
async fn test_list_is_newest_first_and_skips_temp() {
    let temp_dir = TempDir::new().unwrap();
    let exporter = exporter(&temp_dir);
    let story = sample_story();

    let first = exporter
        .export(&story, ExportFormat::Json, &ExportRequest::default())
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let second = exporter
        .export(
            &story,
            ExportFormat::Html,
            &ExportRequest {
                filename: Some("later.html".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    std::fs::write(temp_dir.path().join("output").join("temp_img_0.png"), b"x").unwrap();

    let entries = exporter.list().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].filename, second);
    assert_eq!(entries[1].filename, first);
    assert_eq!(entries[0].kind, "html");
}
