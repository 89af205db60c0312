//! Storyreel Timeline - Timeline data model
//!
//! Implements the timeline structure for the storyboard editor:
//! - Clips with a tagged media variant and a span/track envelope
//! - A timeline whose every mutation goes through `EditCommand`
//! - Pure time ⇄ pixel geometry and ruler ticks
//! - The pointer gesture state machine (drag, resize, scrub, select)

pub mod clip;
pub mod edit;
pub mod geometry;
pub mod interaction;
pub mod playhead;
pub mod selection;
pub mod timeline;

pub use clip::{Clip, ClipId, ClipKind, ClipMedia, MediaRef};
pub use edit::{EditCommand, EditOutcome};
pub use geometry::{ClipRect, Tick, TickMarks, TimelineGeometry};
pub use interaction::{
    nearest_free_start, Gesture, HitTarget, InteractionEffect, InteractionEngine,
    InteractionSettings, PointerPos, ResizeEdge, TimelineView,
};
pub use playhead::Playhead;
pub use selection::Selection;
pub use timeline::Timeline;
