//! Timeline edits through the gesture engine and the editor.

use storyreel_core::{EditorConfig, StoryError, TimeSpan};
use storyreel_editor::{Editor, EditorCommand, NoticeLevel};
use storyreel_playback::ClockPlayer;
use storyreel_timeline::{
    ClipId, ClipKind, ClipMedia, EditCommand, Gesture, InteractionEffect, InteractionEngine,
    InteractionSettings, MediaRef, Playhead, PointerPos, Selection, Timeline, TimelineGeometry,
    TimelineView,
};

// ── Helpers ────────────────────────────────────────────────────

/// Three 5 s stills back to back on track 0.
fn three_clips() -> Timeline {
    let media = ["a", "b", "c"].map(|m| ClipMedia::image(MediaRef::new(m)));
    Timeline::from_media(media, 5.0, 3).unwrap()
}

fn editor() -> Editor<ClockPlayer> {
    Editor::new(EditorConfig::default(), ClockPlayer::new(), ["a.png", "b.png", "c.png"]).unwrap()
}

struct Harness {
    timeline: Timeline,
    playhead: Playhead,
    selection: Selection,
    geometry: TimelineGeometry,
    engine: InteractionEngine,
}

impl Harness {
    fn new() -> Self {
        Self {
            timeline: three_clips(),
            playhead: Playhead::new(),
            selection: Selection::new(),
            geometry: TimelineGeometry::default(),
            engine: InteractionEngine::new(InteractionSettings::default()),
        }
    }

    fn gesture(&mut self, from: (f64, f64), to: (f64, f64)) -> Vec<InteractionEffect> {
        let mut view = TimelineView {
            timeline: &mut self.timeline,
            playhead: &mut self.playhead,
            selection: &mut self.selection,
            geometry: &self.geometry,
        };
        vec![
            self.engine.pointer_down(&mut view, PointerPos::new(from.0, from.1)),
            self.engine.pointer_move(&mut view, PointerPos::new(to.0, to.1)),
            self.engine.pointer_up(&mut view, PointerPos::new(to.0, to.1)),
        ]
    }

    fn span(&self, n: u64) -> TimeSpan {
        self.timeline.get(&ClipId::sequential(n)).unwrap().span()
    }
}

// ── Gestures ───────────────────────────────────────────────────

#[test]
fn drag_into_occupied_space_lands_in_nearest_gap() {
    let mut h = Harness::new();
    // Grab clip-2 two seconds in and aim its start at 3 s, inside clip-1.
    let effects = h.gesture((350.0, 40.0), (250.0, 40.0));

    assert_eq!(
        effects[0],
        InteractionEffect::DragStarted {
            id: ClipId::sequential(2)
        }
    );
    assert_eq!(h.span(2), TimeSpan::new(5.0, 10.0));
    assert_eq!(*h.engine.gesture(), Gesture::Idle);
}

#[test]
fn drag_to_empty_track_moves_clip() {
    let mut h = Harness::new();
    // Clip-3 (10..15) grabbed at 12 s, dropped on track 1 with its start at 20 s.
    h.gesture((600.0, 40.0), (1100.0, 120.0));

    let clip = h.timeline.get(&ClipId::sequential(3)).unwrap();
    assert_eq!(clip.track(), 1);
    assert_eq!(clip.span(), TimeSpan::new(20.0, 25.0));
    assert_eq!(h.timeline.duration(), 25.0);
}

#[test]
fn resize_below_minimum_clamps() {
    let mut h = Harness::new();
    // End edge of clip-1 dragged all the way past its start.
    h.gesture((248.0, 40.0), (0.0, 40.0));

    let span = h.span(1);
    assert_eq!(span.start, 0.0);
    assert!((span.duration() - 0.1).abs() < 1e-9);
}

#[test]
fn resize_stops_at_neighbor() {
    let mut h = Harness::new();
    h.timeline
        .apply(EditCommand::Remove {
            id: ClipId::sequential(2),
        })
        .unwrap();
    // Stretch clip-1's end from 5 s towards 12 s; clip-3 starts at 10 s.
    h.gesture((248.0, 40.0), (600.0, 40.0));
    assert_eq!(h.span(1), TimeSpan::new(0.0, 10.0));
}

#[test]
fn click_toggles_selection_without_moving() {
    let mut h = Harness::new();
    let effects = h.gesture((375.0, 40.0), (376.0, 40.0));

    assert_eq!(
        effects[2],
        InteractionEffect::SelectionToggled {
            id: ClipId::sequential(2),
            selected: true
        }
    );
    assert_eq!(h.span(2), TimeSpan::new(5.0, 10.0));
    assert!(h.selection.contains(&ClipId::sequential(2)));
}

#[test]
fn background_scrub_moves_playhead() {
    let mut h = Harness::new();
    h.gesture((100.0, 200.0), (350.0, 200.0));
    assert!((h.playhead.time() - 7.0).abs() < 1e-9);
}

// ── Model ──────────────────────────────────────────────────────

#[test]
fn removing_twice_reports_not_found() {
    let mut timeline = three_clips();
    let id = ClipId::sequential(2);

    timeline.apply(EditCommand::Remove { id: id.clone() }).unwrap();
    assert_eq!(timeline.len(), 2);

    let err = timeline.apply(EditCommand::Remove { id }).unwrap_err();
    assert!(matches!(err, StoryError::NotFound(_)));
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline.duration(), 15.0);
}

#[test]
fn failed_batch_leaves_timeline_untouched() {
    let mut timeline = three_clips();
    let batch = EditCommand::Batch(vec![
        EditCommand::Remove {
            id: ClipId::sequential(1),
        },
        EditCommand::Remove {
            id: ClipId::sequential(9),
        },
    ]);

    assert!(timeline.apply(batch).is_err());
    assert_eq!(timeline.len(), 3);
    assert!(timeline.contains(&ClipId::sequential(1)));
}

// ── Editor ─────────────────────────────────────────────────────

#[test]
fn selected_clips_are_deleted_together() {
    let mut editor = editor();
    for x in [100.0, 600.0] {
        let pos = PointerPos::new(x, 40.0);
        editor.dispatch(EditorCommand::PointerDown(pos)).unwrap();
        editor.dispatch(EditorCommand::PointerUp(pos)).unwrap();
    }
    assert_eq!(editor.state().selection.len(), 2);

    editor.dispatch(EditorCommand::DeleteSelected).unwrap();
    let timeline = &editor.state().timeline;
    assert_eq!(timeline.len(), 1);
    assert!(timeline.contains(&ClipId::sequential(2)));
    assert!(editor.state().selection.is_empty());
    assert_eq!(timeline.duration(), 10.0);
}

#[test]
fn removing_media_drops_its_clips_and_library_entry() {
    let mut editor = editor();
    let media = editor.state().library.list()[0].media.clone();

    editor
        .dispatch(EditorCommand::RemoveMedia(media.clone()))
        .unwrap();

    assert_eq!(editor.state().library.len(), 2);
    assert_eq!(editor.state().timeline.clips_for_media(&media).count(), 0);
    assert!(!editor.state().timeline.contains(&ClipId::sequential(1)));

    let err = editor.dispatch(EditorCommand::RemoveMedia(media)).unwrap_err();
    assert!(matches!(err, StoryError::NotFound(_)));
    assert_eq!(
        editor.state().notices.latest().map(|n| n.level),
        Some(NoticeLevel::Warning)
    );
}

#[test]
fn added_media_is_appended_after_last_clip() {
    let mut editor = editor();
    editor
        .dispatch(EditorCommand::AddMedia {
            url: "https://example.com/take.mp4".into(),
            kind: ClipKind::Video,
            intrinsic_duration: Some(8.0),
        })
        .unwrap();
    let media = editor.state().library.list()[3].media.clone();

    editor
        .dispatch(EditorCommand::AddMediaToTimeline(media.clone()))
        .unwrap();

    let clip = editor.state().timeline.clips_for_media(&media).next().unwrap();
    assert_eq!(clip.track(), 0);
    assert_eq!(clip.span(), TimeSpan::new(15.0, 23.0));
    assert_eq!(editor.state().timeline.duration(), 23.0);
}

#[test]
fn zoom_changes_pixel_mapping_only() {
    let mut editor = editor();
    let before = editor.state().geometry.time_to_x(10.0);

    editor.dispatch(EditorCommand::ZoomIn).unwrap();

    assert!(editor.state().geometry.time_to_x(10.0) > before);
    assert_eq!(editor.state().timeline.duration(), 15.0);
}
