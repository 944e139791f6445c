//! Tests for LibraryService against library files on disk

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use mediakit::application::services::LibraryService;
use mediakit::application::ApplicationError;
use mediakit::domain::{DomainError, Gallery, PlaybackEvent, SortBy};
use mediakit::infrastructure::traits::RealFileSystem;

const LIBRARY: &str = r#"
[playlist]
name = "Workout Mix"
items = [
    { audio = "Song B" },
    { playlist = { name = "Morning Mix", items = [ { audio = "Song A" }, { video = "Video A" } ] } },
    { playlist = { name = "Empty" } },
]

[[images]]
name = "sunset.png"
date = "2024-05-03T19:30:00Z"
size = 4096

[[images]]
name = "alps.png"
date = "2023-12-24T08:00:00Z"
size = 8192

[[images]]
name = "beach.png"
date = "2024-07-14T12:00:00Z"
size = 1024
"#;

fn create_library(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write library file");
    path
}

fn service() -> LibraryService {
    LibraryService::new(Arc::new(RealFileSystem))
}

#[test]
fn given_library_when_playing_then_events_in_preorder() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_library(&temp, "library.toml", LIBRARY);

    // Act
    let mut events: Vec<PlaybackEvent> = Vec::new();
    service().play(&path, &mut events).unwrap();

    // Assert
    let lines: Vec<String> = events.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "Playing playlist: Workout Mix",
            "Playing audio: Song B",
            "Playing playlist: Morning Mix",
            "Playing audio: Song A",
            "Playing video: Video A",
            "Playing playlist: Empty",
        ]
    );
}

#[test]
fn given_library_when_rendering_tree_then_counts_items_and_depth() {
    let temp = TempDir::new().unwrap();
    let path = create_library(&temp, "library.toml", LIBRARY);

    let summary = service().tree(&path).unwrap();

    assert_eq!(summary.items, 6);
    assert_eq!(summary.depth, 3);
    let rendered = summary.rendered.to_string();
    assert!(rendered.starts_with("playlist: Workout Mix"));
    assert!(rendered.contains("video: Video A"));
}

#[test]
fn given_library_when_sorting_then_gallery_strategy_applies() {
    let temp = TempDir::new().unwrap();
    let path = create_library(&temp, "library.toml", LIBRARY);
    let gallery = Gallery::new(SortBy::Date.strategy());

    let by_date: Vec<String> = service()
        .sorted_images(&path, &gallery)
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(by_date, vec!["alps.png", "sunset.png", "beach.png"]);

    gallery.set_strategy(SortBy::Size.strategy());
    let by_size: Vec<String> = service()
        .sorted_images(&path, &gallery)
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(by_size, vec!["beach.png", "sunset.png", "alps.png"]);
}

#[test]
fn given_missing_file_when_loading_then_library_not_found() {
    let result = service().load(Path::new("/nonexistent/library.toml"));

    assert!(matches!(result, Err(ApplicationError::LibraryNotFound(_))));
}

#[test]
fn given_malformed_file_when_loading_then_invalid_library() {
    let temp = TempDir::new().unwrap();
    let path = create_library(&temp, "broken.toml", "[playlist\nname = ");

    let result = service().load(&path);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidLibrary { .. }))
    ));
}

#[test]
fn given_library_without_playlist_when_playing_then_invalid_library() {
    let temp = TempDir::new().unwrap();
    let path = create_library(&temp, "images.toml", "images = []\n");

    let mut events: Vec<PlaybackEvent> = Vec::new();
    let result = service().play(&path, &mut events);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidLibrary { .. }))
    ));
    assert!(events.is_empty());
}
