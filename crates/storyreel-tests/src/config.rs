//! Config files on disk feeding the editor.

use std::io::Write;

use storyreel_core::{EditorConfig, StoryError};
use storyreel_editor::Editor;
use storyreel_playback::ClockPlayer;
use tempfile::NamedTempFile;

fn config_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn partial_config_keeps_defaults() {
    let file = config_file(r#"{ "num_tracks": 4, "default_clip_duration": 3.0 }"#);
    let config = EditorConfig::load_or_default(Some(file.path())).unwrap();

    assert_eq!(config.num_tracks, 4);
    assert_eq!(config.default_clip_duration, 3.0);
    assert_eq!(config.pixels_per_second, EditorConfig::default().pixels_per_second);
}

#[test]
fn loaded_config_shapes_the_initial_timeline() {
    let file = config_file(r#"{ "num_tracks": 2, "default_clip_duration": 2.5 }"#);
    let config = EditorConfig::load_or_default(Some(file.path())).unwrap();
    let editor = Editor::new(config, ClockPlayer::new(), ["a.png", "b.png"]).unwrap();

    let timeline = &editor.state().timeline;
    assert_eq!(timeline.num_tracks(), 2);
    assert_eq!(timeline.duration(), 5.0);
}

#[test]
fn invalid_config_is_rejected() {
    let file = config_file(r#"{ "num_tracks": 0 }"#);
    let err = EditorConfig::load_or_default(Some(file.path())).unwrap_err();
    assert!(matches!(err, StoryError::Config(_)));

    let file = config_file("not json");
    let err = EditorConfig::load_or_default(Some(file.path())).unwrap_err();
    assert!(matches!(err, StoryError::Config(_)));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EditorConfig::load_or_default(Some(&dir.path().join("absent.json"))).unwrap_err();
    assert!(matches!(err, StoryError::Io(_)));
}

#[test]
fn saved_config_loads_back() {
    let config = EditorConfig {
        loop_playback: true,
        skip_seconds: 2.0,
        ..EditorConfig::default()
    };
    let file = config_file(&config.to_json().unwrap());
    let loaded = EditorConfig::load(file.path()).unwrap();
    assert!(loaded.loop_playback);
    assert_eq!(loaded.skip_seconds, 2.0);
}
