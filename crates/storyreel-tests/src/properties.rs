//! Property tests: random pointer and transport input never breaks the
//! timeline or strands a scrub.

use proptest::prelude::*;
use storyreel_core::{EditorConfig, TIME_EPSILON};
use storyreel_editor::{Editor, EditorCommand};
use storyreel_playback::ClockPlayer;
use storyreel_timeline::{PointerPos, Timeline, TimelineGeometry};

#[derive(Debug, Clone)]
enum Step {
    Down(f64, f64),
    Move(f64, f64),
    Up(f64, f64),
    Ruler(f64),
    TogglePlay,
    Tick,
}

fn step() -> impl Strategy<Value = Step> {
    let pos = (0.0..1200.0f64, 0.0..260.0f64);
    prop_oneof![
        1 => pos.clone().prop_map(|(x, y)| Step::Down(x, y)),
        3 => pos.clone().prop_map(|(x, y)| Step::Move(x, y)),
        1 => pos.prop_map(|(x, y)| Step::Up(x, y)),
        1 => (0.0..1200.0f64).prop_map(Step::Ruler),
        1 => Just(Step::TogglePlay),
        1 => Just(Step::Tick),
    ]
}

fn assert_consistent(timeline: &Timeline) {
    let mut end = 0.0f64;
    for clip in timeline.clips() {
        assert!(clip.end() > clip.start(), "{} has an empty span", clip.id());
        assert!(clip.start() >= 0.0);
        assert!(clip.track() < timeline.num_tracks());
        end = end.max(clip.end());
    }
    assert!((timeline.duration() - end).abs() < TIME_EPSILON);

    for track in 0..timeline.num_tracks() {
        let clips = timeline.clips_on_track(track);
        for pair in clips.windows(2) {
            assert!(
                pair[0].end() <= pair[1].start() + TIME_EPSILON,
                "{} overlaps {}",
                pair[0].id(),
                pair[1].id()
            );
        }
    }
}

proptest! {
    #[test]
    fn random_gestures_keep_timeline_consistent(steps in prop::collection::vec(step(), 1..60)) {
        let mut editor =
            Editor::new(EditorConfig::default(), ClockPlayer::new(), ["a.png", "b.png", "c.png"])
                .unwrap();
        for step in steps {
            let command = match step {
                Step::Down(x, y) => EditorCommand::PointerDown(PointerPos::new(x, y)),
                Step::Move(x, y) => EditorCommand::PointerMove(PointerPos::new(x, y)),
                Step::Up(x, y) => EditorCommand::PointerUp(PointerPos::new(x, y)),
                Step::Ruler(x) => EditorCommand::RulerDown(PointerPos::new(x, 0.0)),
                Step::TogglePlay => EditorCommand::TogglePlay,
                Step::Tick => {
                    editor.tick(0.25);
                    continue;
                }
            };
            let _ = editor.dispatch(command);
            assert_consistent(&editor.state().timeline);
            // The synchronizer only holds a scrub the engine still owns.
            prop_assert!(!editor.playback().is_scrubbing() || editor.engine().is_scrubbing());
        }
        let state = editor.state();
        prop_assert!(state.playhead.time() >= 0.0);
        prop_assert!(state.playhead.time() <= state.timeline.duration() + TIME_EPSILON);
        prop_assert!(state.selection.iter().all(|id| state.timeline.contains(id)));
    }

    #[test]
    fn pixel_time_roundtrip(time in 0.0..300.0f64, pps in 10.0..400.0f64) {
        let mut geometry = TimelineGeometry::default();
        geometry.set_pixels_per_second(pps);
        let back = geometry.x_to_time(geometry.time_to_x(time), 300.0);
        prop_assert!((back - time).abs() < 1e-6);
    }

    #[test]
    fn lane_roundtrip(track in 0usize..3, inside in 0.0..0.99f64) {
        let geometry = TimelineGeometry::default();
        let y = geometry.track_to_y(track) + inside * 80.0;
        prop_assert_eq!(geometry.y_to_track(y), track);
    }
}
