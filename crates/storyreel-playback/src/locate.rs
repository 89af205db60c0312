//! Global time to primary-track clip lookup.

use storyreel_core::TIME_EPSILON;
use storyreel_timeline::{Clip, Timeline};

/// Track whose clips drive the preview.
pub const PRIMARY_TRACK: usize = 0;

/// A clip found under a global time, with the offset into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Located<'a> {
    pub clip: &'a Clip,
    pub offset: f64,
}

/// Primary-track clips sorted by start.
pub fn primary_clips(timeline: &Timeline) -> Vec<&Clip> {
    timeline.clips_on_track(PRIMARY_TRACK)
}

/// The primary-track clip whose `[start, end)` contains `time`.
///
/// Clips on a track never overlap, so sorted ends are increasing and a
/// binary search finds the only candidate.
pub fn locate(timeline: &Timeline, time: f64) -> Option<Located<'_>> {
    let clips = primary_clips(timeline);
    let index = clips.partition_point(|c| c.end() <= time);
    let clip = *clips.get(index)?;
    clip.span().contains(time).then(|| Located {
        clip,
        offset: time - clip.start(),
    })
}

/// First primary-track clip starting at or after `time`.
pub fn next_clip_from(timeline: &Timeline, time: f64) -> Option<&Clip> {
    let clips = primary_clips(timeline);
    let index = clips.partition_point(|c| c.start() < time - TIME_EPSILON);
    clips.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_timeline::{ClipId, ClipMedia, EditCommand, MediaRef};

    fn timeline() -> Timeline {
        let media = ["a", "b", "c"].map(|m| ClipMedia::image(MediaRef::new(m)));
        Timeline::from_media(media, 5.0, 3).unwrap()
    }

    #[test]
    fn test_locate_middle_clip() {
        let timeline = timeline();
        let located = locate(&timeline, 7.0).unwrap();
        assert_eq!(located.clip.id(), &ClipId::sequential(2));
        assert_eq!(located.offset, 2.0);
    }

    #[test]
    fn test_locate_boundaries_are_half_open() {
        let timeline = timeline();
        assert_eq!(locate(&timeline, 0.0).unwrap().clip.id(), &ClipId::sequential(1));
        assert_eq!(locate(&timeline, 5.0).unwrap().clip.id(), &ClipId::sequential(2));
        assert!(locate(&timeline, 15.0).is_none());
        assert!(locate(&timeline, -1.0).is_none());
    }

    #[test]
    fn test_locate_in_gap() {
        let mut timeline = timeline();
        timeline
            .apply(EditCommand::Remove {
                id: ClipId::sequential(2),
            })
            .unwrap();
        assert!(locate(&timeline, 7.0).is_none());
        assert_eq!(
            next_clip_from(&timeline, 7.0).unwrap().id(),
            &ClipId::sequential(3)
        );
        assert!(next_clip_from(&timeline, 12.0).is_none());
    }

    #[test]
    fn test_locate_ignores_other_tracks() {
        let mut timeline = Timeline::new(3);
        timeline
            .apply(EditCommand::Append {
                media: ClipMedia::image(MediaRef::new("overlay")),
                track: 1,
                duration: 5.0,
            })
            .unwrap();
        assert!(locate(&timeline, 1.0).is_none());
    }
}
