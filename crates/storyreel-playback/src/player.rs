//! Media player contract.

use std::collections::HashMap;
use std::fmt;

use storyreel_timeline::{ClipKind, MediaRef};

/// Identifies one `load` call. Events carry the ticket of the load they
/// belong to so late callbacks from a superseded source can be dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

impl LoadTicket {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What to load: a resolved URL plus the clip kind so the player knows
/// whether to decode video, audio or show a still.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub url: String,
    pub kind: ClipKind,
}

/// Callback kinds a player reports.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEventKind {
    /// Position inside the loaded source, in seconds.
    TimeUpdate(f64),
    /// The loaded source reached its natural end.
    Ended,
    LoadError(String),
}

/// A player callback tagged with the load it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerEvent {
    pub ticket: LoadTicket,
    pub kind: PlayerEventKind,
}

impl PlayerEvent {
    pub fn time_update(ticket: LoadTicket, time: f64) -> Self {
        Self {
            ticket,
            kind: PlayerEventKind::TimeUpdate(time),
        }
    }

    pub fn ended(ticket: LoadTicket) -> Self {
        Self {
            ticket,
            kind: PlayerEventKind::Ended,
        }
    }

    pub fn load_error(ticket: LoadTicket, reason: impl Into<String>) -> Self {
        Self {
            ticket,
            kind: PlayerEventKind::LoadError(reason.into()),
        }
    }
}

/// A single-source media player.
///
/// All calls are fire-and-forget. Results come back later as
/// [`PlayerEvent`]s which the owner feeds to the synchronizer.
pub trait MediaPlayer {
    /// Replace the current source. Positions restart at 0.
    fn load(&mut self, source: &MediaSource, ticket: LoadTicket);

    /// Drop the current source (the playhead is in a gap).
    fn unload(&mut self);

    fn play(&mut self);

    fn pause(&mut self);

    /// Seek inside the loaded source.
    fn seek(&mut self, offset: f64);

    fn set_volume(&mut self, _volume: f32) {}

    fn set_muted(&mut self, _muted: bool) {}

    /// Frame time from the UI loop. Players with their own clock ignore it.
    fn tick(&mut self, _dt: f64) {}

    /// Callbacks produced since the last poll.
    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        Vec::new()
    }
}

/// Turns a media handle into something a player can load.
pub trait MediaResolver {
    fn resolve(&self, media: &MediaRef) -> Option<String>;
}

impl MediaResolver for HashMap<MediaRef, String> {
    fn resolve(&self, media: &MediaRef) -> Option<String> {
        self.get(media).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_ordering() {
        let first = LoadTicket::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.to_string(), "#1");
    }

    #[test]
    fn test_map_resolver() {
        let mut urls = HashMap::new();
        urls.insert(MediaRef::new("a"), "https://example.com/a.png".to_string());
        assert_eq!(
            urls.resolve(&MediaRef::new("a")).as_deref(),
            Some("https://example.com/a.png")
        );
        assert!(urls.resolve(&MediaRef::new("b")).is_none());
    }
}
