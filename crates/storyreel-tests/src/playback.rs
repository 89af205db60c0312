//! Playback following the playhead across clips, gaps and edits.

use storyreel_core::EditorConfig;
use storyreel_editor::{Editor, EditorCommand, EditorEvent, NoticeLevel};
use storyreel_playback::{ClockPlayer, LoadTicket, PlaybackStatus, PlayerEvent};
use storyreel_timeline::{ClipId, PointerPos};

fn editor() -> Editor<ClockPlayer> {
    Editor::new(EditorConfig::default(), ClockPlayer::new(), ["a.png", "b.png", "c.png"]).unwrap()
}

fn source_url(editor: &Editor<ClockPlayer>) -> Option<&str> {
    editor.player().source().map(|s| s.url.as_str())
}

fn active_clip(editor: &Editor<ClockPlayer>) -> Option<ClipId> {
    editor.playback().active().map(|a| a.id.clone())
}

// ── Scrubbing ──────────────────────────────────────────────────

#[test]
fn scrub_shows_clip_under_playhead_with_offset() {
    let mut editor = editor();
    editor
        .dispatch(EditorCommand::PointerDown(PointerPos::new(350.0, 200.0)))
        .unwrap();

    assert_eq!(active_clip(&editor), Some(ClipId::sequential(2)));
    assert_eq!(source_url(&editor), Some("b.png"));
    assert!((editor.player().position() - 2.0).abs() < 1e-9);

    editor
        .dispatch(EditorCommand::PointerUp(PointerPos::new(350.0, 200.0)))
        .unwrap();
    assert!(!editor.playback().is_scrubbing());
}

#[test]
fn scrub_within_a_clip_does_not_reload() {
    let mut editor = editor();
    editor
        .dispatch(EditorCommand::PointerDown(PointerPos::new(260.0, 200.0)))
        .unwrap();
    let loads = editor.player().load_count();
    for x in [280.0, 320.0, 400.0, 480.0] {
        editor
            .dispatch(EditorCommand::PointerMove(PointerPos::new(x, 200.0)))
            .unwrap();
    }
    assert_eq!(editor.player().load_count(), loads);

    editor
        .dispatch(EditorCommand::PointerMove(PointerPos::new(520.0, 200.0)))
        .unwrap();
    assert_eq!(editor.player().load_count(), loads + 1);
    assert_eq!(source_url(&editor), Some("c.png"));
}

// ── Playing ────────────────────────────────────────────────────

#[test]
fn playback_near_end_stops_at_duration() {
    let mut editor = editor();
    editor.dispatch(EditorCommand::Seek(14.9)).unwrap();
    editor.dispatch(EditorCommand::Play).unwrap();
    editor.tick(0.5);

    assert_eq!(*editor.playback().status(), PlaybackStatus::Stopped);
    assert_eq!(editor.state().playhead.time(), 15.0);
    assert!(!editor.player().is_playing());
}

#[test]
fn playback_hops_over_gap() {
    let mut editor = editor();
    editor
        .dispatch(EditorCommand::DeleteClip(ClipId::sequential(2)))
        .unwrap();
    editor.dispatch(EditorCommand::Seek(4.0)).unwrap();
    editor.dispatch(EditorCommand::Play).unwrap();
    editor.tick(0.5);
    editor.tick(0.5);

    assert_eq!(active_clip(&editor), Some(ClipId::sequential(3)));
    assert_eq!(source_url(&editor), Some("c.png"));
    assert_eq!(editor.state().playhead.time(), 10.0);
    assert!(editor.is_playing());
}

#[test]
fn looping_wraps_to_first_clip() {
    let mut editor = editor();
    editor.dispatch(EditorCommand::SetLoop(true)).unwrap();
    editor.dispatch(EditorCommand::Seek(14.0)).unwrap();
    editor.dispatch(EditorCommand::Play).unwrap();
    editor.tick(0.5);
    editor.tick(0.5);

    assert_eq!(*editor.playback().status(), PlaybackStatus::Playing);
    assert_eq!(source_url(&editor), Some("a.png"));
    assert_eq!(editor.state().playhead.time(), 0.0);
}

#[test]
fn stale_player_events_are_ignored() {
    let mut editor = editor();
    let first = editor.player().ticket().unwrap();
    editor.dispatch(EditorCommand::Seek(7.0)).unwrap();
    editor.dispatch(EditorCommand::Play).unwrap();
    assert_ne!(editor.player().ticket(), Some(first));

    editor.post(EditorEvent::Player(PlayerEvent::time_update(first, 4.9)));
    editor.pump();
    assert_eq!(editor.state().playhead.time(), 7.0);

    let current = editor.player().ticket().unwrap();
    editor.post(EditorEvent::Player(PlayerEvent::time_update(current, 3.0)));
    editor.pump();
    assert_eq!(editor.state().playhead.time(), 8.0);
}

#[test]
fn unknown_ticket_is_ignored() {
    let mut editor = editor();
    editor.dispatch(EditorCommand::Play).unwrap();
    editor.post(EditorEvent::Player(PlayerEvent::ended(LoadTicket(999))));
    editor.pump();
    assert_eq!(active_clip(&editor), Some(ClipId::sequential(1)));
}

#[test]
fn ended_on_middle_clip_advances_to_next() {
    let mut editor = editor();
    editor.dispatch(EditorCommand::Seek(7.0)).unwrap();
    editor.dispatch(EditorCommand::Play).unwrap();
    let ticket = editor.player().ticket().unwrap();
    editor.post(EditorEvent::Player(PlayerEvent::ended(ticket)));
    editor.pump();

    assert_eq!(active_clip(&editor), Some(ClipId::sequential(3)));
    assert_eq!(source_url(&editor), Some("c.png"));
    assert_eq!(editor.state().playhead.time(), 10.0);
    assert_eq!(*editor.playback().status(), PlaybackStatus::Playing);
    assert!(editor.player().is_playing());
}

#[test]
fn ended_on_last_clip_stops_without_loop() {
    let mut editor = editor();
    editor.dispatch(EditorCommand::Seek(12.0)).unwrap();
    editor.dispatch(EditorCommand::Play).unwrap();
    let ticket = editor.player().ticket().unwrap();
    editor.post(EditorEvent::Player(PlayerEvent::ended(ticket)));
    editor.pump();

    assert_eq!(*editor.playback().status(), PlaybackStatus::Stopped);
    assert_eq!(editor.state().playhead.time(), 15.0);
    assert!(!editor.player().is_playing());
}

#[test]
fn press_after_lost_release_resumes_playback() {
    let mut editor = editor();
    editor.dispatch(EditorCommand::Play).unwrap();
    editor
        .dispatch(EditorCommand::RulerDown(PointerPos::new(100.0, 0.0)))
        .unwrap();
    assert!(editor.playback().is_scrubbing());

    // The release happened outside the window; the next press arrives first.
    editor
        .dispatch(EditorCommand::PointerDown(PointerPos::new(375.0, 40.0)))
        .unwrap();
    assert!(!editor.playback().is_scrubbing());
    editor
        .dispatch(EditorCommand::PointerUp(PointerPos::new(375.0, 40.0)))
        .unwrap();

    editor.tick(0.5);
    editor.tick(0.5);
    assert!(editor.is_playing());
    assert!(editor.player().is_playing());
    assert_eq!(editor.state().playhead.time(), 3.0);
}

// ── Edits while showing ────────────────────────────────────────

#[test]
fn deleting_shown_clip_unloads_player() {
    let mut editor = editor();
    editor.dispatch(EditorCommand::Seek(7.0)).unwrap();
    assert_eq!(active_clip(&editor), Some(ClipId::sequential(2)));

    editor
        .dispatch(EditorCommand::DeleteClip(ClipId::sequential(2)))
        .unwrap();

    assert_eq!(active_clip(&editor), None);
    assert_eq!(source_url(&editor), None);
}

#[test]
fn failed_load_parks_until_playhead_moves_on() {
    let mut editor = editor();
    editor.player_mut().fail_loads_of("b.png");
    editor.dispatch(EditorCommand::Seek(7.0)).unwrap();
    editor.pump();

    assert!(matches!(
        editor.playback().status(),
        PlaybackStatus::LoadFailed { clip_id, .. } if *clip_id == ClipId::sequential(2)
    ));
    assert_eq!(
        editor.state().notices.latest().map(|n| n.level),
        Some(NoticeLevel::Error)
    );

    editor.dispatch(EditorCommand::Seek(12.0)).unwrap();
    assert_eq!(*editor.playback().status(), PlaybackStatus::Paused);
    assert_eq!(source_url(&editor), Some("c.png"));
}
