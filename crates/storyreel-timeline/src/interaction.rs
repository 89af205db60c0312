//! Pointer interaction on the timeline.
//!
//! A small gesture state machine turns raw pointer down/move/up events into
//! timeline edits, playhead moves and selection changes:
//!
//! ```text
//! Idle ──down on body──▶ Dragging ──up──▶ Idle
//! Idle ──down on edge──▶ Resizing ──up──▶ Idle
//! Idle ──down on background──▶ Scrubbing ──up──▶ Idle
//! ```
//!
//! Edits are committed live through [`Timeline::apply`]; there is no confirm
//! step on pointer-up.

use storyreel_core::{EditorConfig, FrameRate, TimeSpan, TIME_EPSILON};
use tracing::debug;

use crate::clip::ClipId;
use crate::edit::{EditCommand, EditOutcome};
use crate::geometry::TimelineGeometry;
use crate::playhead::Playhead;
use crate::selection::Selection;
use crate::timeline::Timeline;

// ── Types ───────────────────────────────────────────────────────

/// Pointer position in track-area pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

impl PointerPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Which edge of a clip is being resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Start,
    End,
}

/// What lies under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Body(ClipId),
    Edge(ClipId, ResizeEdge),
    Background,
}

/// Current gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        clip_id: ClipId,
        /// Pointer time minus clip start at pointer-down.
        grab_offset: f64,
    },
    Resizing {
        clip_id: ClipId,
        edge: ResizeEdge,
    },
    Scrubbing,
}

/// Result of feeding one pointer event to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEffect {
    None,
    ScrubStarted {
        time: f64,
    },
    Scrubbed {
        time: f64,
    },
    ScrubEnded {
        time: f64,
        selection_cleared: bool,
    },
    DragStarted {
        id: ClipId,
    },
    ResizeStarted {
        id: ClipId,
        edge: ResizeEdge,
    },
    ClipMoved {
        id: ClipId,
        span: TimeSpan,
        track: usize,
        /// The clip landed somewhere other than under the pointer.
        clamped: bool,
    },
    ClipResized {
        id: ClipId,
        span: TimeSpan,
        clamped: bool,
    },
    /// No free position near the pointer; the clip keeps its last position.
    PlacementRejected {
        id: ClipId,
    },
    SelectionToggled {
        id: ClipId,
        selected: bool,
    },
    DragEnded {
        id: ClipId,
    },
    ResizeEnded {
        id: ClipId,
    },
}

impl InteractionEffect {
    /// Whether the timeline was mutated.
    pub fn edits_timeline(&self) -> bool {
        matches!(self, Self::ClipMoved { .. } | Self::ClipResized { .. })
    }
}

/// Tunables for the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSettings {
    /// Pointer distance from a clip edge that starts a resize.
    pub edge_tolerance_px: f64,
    pub min_clip_duration: f64,
    /// Travel below which down/up counts as a click.
    pub click_slop_px: f64,
    /// Scrub positions snap to this rate when set.
    pub frame_rate: Option<FrameRate>,
}

impl InteractionSettings {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            edge_tolerance_px: config.edge_tolerance_px,
            min_clip_duration: config.min_clip_duration,
            click_slop_px: config.click_slop_px,
            frame_rate: Some(config.frame_rate),
        }
    }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

/// Mutable borrow of everything a gesture touches.
pub struct TimelineView<'a> {
    pub timeline: &'a mut Timeline,
    pub playhead: &'a mut Playhead,
    pub selection: &'a mut Selection,
    pub geometry: &'a TimelineGeometry,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    origin: PointerPos,
    moved: bool,
}

// ── Engine ──────────────────────────────────────────────────────

/// Gesture state machine.
#[derive(Debug, Clone, Default)]
pub struct InteractionEngine {
    gesture: Gesture,
    press: Option<Press>,
    settings: InteractionSettings,
}

impl InteractionEngine {
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            gesture: Gesture::Idle,
            press: None,
            settings,
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn is_scrubbing(&self) -> bool {
        self.gesture == Gesture::Scrubbing
    }

    /// Resolve what is under the pointer.
    ///
    /// The lane comes from `y`. Within a clip the topmost (latest inserted)
    /// clip wins and its edge bands are checked first; in a gap the nearest
    /// clip edge within tolerance is used.
    pub fn hit_test(
        &self,
        timeline: &Timeline,
        geometry: &TimelineGeometry,
        pos: PointerPos,
    ) -> HitTarget {
        let track = geometry.y_to_track(pos.y);
        let time = geometry.x_to_time_unclamped(pos.x);
        let tolerance = self.settings.edge_tolerance_px;

        let under = timeline
            .clips()
            .iter()
            .rev()
            .find(|c| c.track() == track && c.span().contains(time));

        if let Some(clip) = under {
            let rect = geometry.clip_rect(clip);
            let band = tolerance.min(rect.width / 3.0);
            if pos.x - rect.left <= band {
                return HitTarget::Edge(clip.id().clone(), ResizeEdge::Start);
            }
            if rect.right() - pos.x <= band {
                return HitTarget::Edge(clip.id().clone(), ResizeEdge::End);
            }
            return HitTarget::Body(clip.id().clone());
        }

        let mut nearest: Option<(f64, HitTarget)> = None;
        for clip in timeline.clips().iter().rev().filter(|c| c.track() == track) {
            let rect = geometry.clip_rect(clip);
            for (edge_x, edge) in [(rect.left, ResizeEdge::Start), (rect.right(), ResizeEdge::End)] {
                let distance = (pos.x - edge_x).abs();
                if distance <= tolerance && nearest.as_ref().map_or(true, |(d, _)| distance < *d) {
                    nearest = Some((distance, HitTarget::Edge(clip.id().clone(), edge)));
                }
            }
        }
        nearest.map_or(HitTarget::Background, |(_, target)| target)
    }

    pub fn pointer_down(&mut self, view: &mut TimelineView<'_>, pos: PointerPos) -> InteractionEffect {
        self.cancel();
        self.press = Some(Press {
            origin: pos,
            moved: false,
        });

        match self.hit_test(view.timeline, view.geometry, pos) {
            HitTarget::Body(id) => {
                let Some(clip) = view.timeline.get(&id) else {
                    return InteractionEffect::None;
                };
                let grab_offset = view.geometry.x_to_time_unclamped(pos.x) - clip.start();
                debug!(clip = %id, grab_offset, "Drag started");
                self.gesture = Gesture::Dragging {
                    clip_id: id.clone(),
                    grab_offset,
                };
                InteractionEffect::DragStarted { id }
            }
            HitTarget::Edge(id, edge) => {
                debug!(clip = %id, ?edge, "Resize started");
                self.gesture = Gesture::Resizing {
                    clip_id: id.clone(),
                    edge,
                };
                InteractionEffect::ResizeStarted { id, edge }
            }
            HitTarget::Background => {
                self.gesture = Gesture::Scrubbing;
                let time = self.scrub_playhead(view, pos);
                InteractionEffect::ScrubStarted { time }
            }
        }
    }

    /// Press on the time ruler: always scrubs, whatever lies below in the
    /// lanes. Only `pos.x` is used. Releasing never counts as a click, so the
    /// selection survives.
    pub fn ruler_down(&mut self, view: &mut TimelineView<'_>, pos: PointerPos) -> InteractionEffect {
        self.cancel();
        self.press = Some(Press {
            origin: pos,
            moved: true,
        });
        self.gesture = Gesture::Scrubbing;
        let time = self.scrub_playhead(view, pos);
        debug!(time, "Ruler scrub started");
        InteractionEffect::ScrubStarted { time }
    }

    pub fn pointer_move(&mut self, view: &mut TimelineView<'_>, pos: PointerPos) -> InteractionEffect {
        let slop = self.settings.click_slop_px;
        let moved = match self.press.as_mut() {
            Some(press) => {
                if !press.moved && press.origin.distance(pos) > slop {
                    press.moved = true;
                }
                press.moved
            }
            None => false,
        };

        match self.gesture.clone() {
            Gesture::Idle => InteractionEffect::None,
            Gesture::Scrubbing => InteractionEffect::Scrubbed {
                time: self.scrub_playhead(view, pos),
            },
            Gesture::Dragging { .. } | Gesture::Resizing { .. } if !moved => InteractionEffect::None,
            Gesture::Dragging {
                clip_id,
                grab_offset,
            } => self.drag_to(view, clip_id, grab_offset, pos),
            Gesture::Resizing { clip_id, edge } => self.resize_to(view, clip_id, edge, pos),
        }
    }

    pub fn pointer_up(&mut self, view: &mut TimelineView<'_>, pos: PointerPos) -> InteractionEffect {
        let is_click = self
            .press
            .take()
            .map_or(false, |p| !p.moved && p.origin.distance(pos) <= self.settings.click_slop_px);
        let gesture = std::mem::take(&mut self.gesture);

        match gesture {
            Gesture::Idle => InteractionEffect::None,
            Gesture::Scrubbing => {
                if is_click {
                    view.selection.clear();
                }
                InteractionEffect::ScrubEnded {
                    time: view.playhead.time(),
                    selection_cleared: is_click,
                }
            }
            Gesture::Dragging { clip_id: id, .. } | Gesture::Resizing { clip_id: id, .. }
                if is_click && view.timeline.contains(&id) =>
            {
                let selected = view.selection.toggle(&id);
                debug!(clip = %id, selected, "Selection toggled");
                InteractionEffect::SelectionToggled { id, selected }
            }
            Gesture::Dragging { clip_id, .. } => InteractionEffect::DragEnded { id: clip_id },
            Gesture::Resizing { clip_id, .. } => InteractionEffect::ResizeEnded { id: clip_id },
        }
    }

    /// Abandon the current gesture. Edits already committed stay.
    pub fn cancel(&mut self) {
        if self.gesture != Gesture::Idle {
            debug!(gesture = ?self.gesture, "Gesture cancelled");
        }
        self.gesture = Gesture::Idle;
        self.press = None;
    }

    // ── Gesture steps ───────────────────────────────────────────

    fn scrub_playhead(&self, view: &mut TimelineView<'_>, pos: PointerPos) -> f64 {
        let duration = view.timeline.duration();
        let time = view.geometry.x_to_time(pos.x, duration);
        let time = self.settings.frame_rate.map_or(time, |rate| rate.snap(time));
        view.playhead.set(time, duration)
    }

    fn drag_to(
        &mut self,
        view: &mut TimelineView<'_>,
        id: ClipId,
        grab_offset: f64,
        pos: PointerPos,
    ) -> InteractionEffect {
        let Some(clip) = view.timeline.get(&id) else {
            self.cancel();
            return InteractionEffect::None;
        };
        let duration = clip.duration();
        let (current_start, current_track) = (clip.start(), clip.track());

        let desired = (view.geometry.x_to_time_unclamped(pos.x) - grab_offset).max(0.0);
        let track = view.geometry.y_to_track(pos.y);

        let Some(start) = nearest_free_start(view.timeline, track, desired, duration, Some(&id))
        else {
            return InteractionEffect::PlacementRejected { id };
        };
        if (start - current_start).abs() <= TIME_EPSILON && track == current_track {
            return InteractionEffect::None;
        }

        match view.timeline.apply(EditCommand::Move {
            id: id.clone(),
            start,
            track,
        }) {
            Ok(EditOutcome::Moved { span, track, .. }) => InteractionEffect::ClipMoved {
                id,
                span,
                track,
                clamped: (start - desired).abs() > TIME_EPSILON,
            },
            _ => InteractionEffect::PlacementRejected { id },
        }
    }

    fn resize_to(
        &mut self,
        view: &mut TimelineView<'_>,
        id: ClipId,
        edge: ResizeEdge,
        pos: PointerPos,
    ) -> InteractionEffect {
        let (Some(clip), Some((prev_end, next_start))) =
            (view.timeline.get(&id), view.timeline.neighbor_bounds(&id))
        else {
            self.cancel();
            return InteractionEffect::None;
        };
        let min = self.settings.min_clip_duration;
        let intrinsic = clip.media().intrinsic_duration();
        let pointer = view.geometry.x_to_time_unclamped(pos.x);

        let (start, end, target) = match edge {
            ResizeEdge::End => {
                let upper = intrinsic.map_or(next_start, |d| next_start.min(clip.start() + d));
                let lower = clip.start() + min;
                let end = clamp_within(pointer, lower, upper, clip.end());
                (clip.start(), end, end)
            }
            ResizeEdge::Start => {
                let lower = intrinsic.map_or(prev_end, |d| prev_end.max(clip.end() - d));
                let upper = clip.end() - min;
                let start = clamp_within(pointer, lower, upper, clip.start());
                (start, clip.end(), start)
            }
        };
        if (start - clip.start()).abs() <= TIME_EPSILON && (end - clip.end()).abs() <= TIME_EPSILON {
            return InteractionEffect::None;
        }

        match view.timeline.apply(EditCommand::Resize {
            id: id.clone(),
            start,
            end,
        }) {
            Ok(EditOutcome::Resized { span, .. }) => InteractionEffect::ClipResized {
                id,
                span,
                clamped: (target - pointer).abs() > TIME_EPSILON,
            },
            _ => InteractionEffect::PlacementRejected { id },
        }
    }
}

/// `value` clamped to `[lower, upper]`, or `fallback` when the range is empty.
fn clamp_within(value: f64, lower: f64, upper: f64, fallback: f64) -> f64 {
    if lower <= upper {
        value.clamp(lower, upper)
    } else {
        fallback
    }
}

/// Closest start to `desired` at which a clip of `duration` fits on `track`
/// without overlapping anything but `exclude`.
///
/// Only positions within one clip duration of `desired` are considered; if
/// none exists the placement is rejected with `None`.
pub fn nearest_free_start(
    timeline: &Timeline,
    track: usize,
    desired: f64,
    duration: f64,
    exclude: Option<&ClipId>,
) -> Option<f64> {
    let desired = desired.max(0.0);
    let mut best: Option<(f64, f64)> = None;

    for gap in timeline.free_gaps(track, exclude) {
        if gap.duration() + TIME_EPSILON < duration {
            continue;
        }
        let latest = (gap.end - duration).max(gap.start);
        let start = desired.clamp(gap.start, latest);
        let distance = (start - desired).abs();
        if distance <= duration + TIME_EPSILON && best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, start));
        }
    }
    best.map(|(_, start)| start)
}

// ── Tests ───────────────────────────────────────────────────────
