//! A media player driven by explicit clock ticks.
//!
//! Stills have no decoder to report progress, so the preview advances them
//! with frame time from the UI loop. The same player doubles as a scripted
//! player in tests: loads can be made to fail and events are queued until
//! drained.

use std::collections::HashSet;

use tracing::debug;

use crate::player::{LoadTicket, MediaPlayer, MediaSource, PlayerEvent};

#[derive(Debug, Default)]
pub struct ClockPlayer {
    source: Option<(MediaSource, LoadTicket)>,
    position: f64,
    playing: bool,
    volume: f32,
    muted: bool,
    failing_urls: HashSet<String>,
    events: Vec<PlayerEvent>,
    load_count: usize,
}

impl ClockPlayer {
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            ..Self::default()
        }
    }

    /// Loads of `url` report a `LoadError` from now on.
    pub fn fail_loads_of(&mut self, url: impl Into<String>) {
        self.failing_urls.insert(url.into());
    }

    /// Advance the clock by `dt` seconds while playing and queue a time update.
    pub fn advance(&mut self, dt: f64) {
        let Some((_, ticket)) = &self.source else {
            return;
        };
        if !self.playing || dt <= 0.0 {
            return;
        }
        self.position += dt;
        self.events.push(PlayerEvent::time_update(*ticket, self.position));
    }

    /// Take every queued event.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref().map(|(source, _)| source)
    }

    pub fn ticket(&self) -> Option<LoadTicket> {
        self.source.as_ref().map(|(_, ticket)| *ticket)
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Number of `load` calls so far.
    pub fn load_count(&self) -> usize {
        self.load_count
    }
}

impl MediaPlayer for ClockPlayer {
    fn load(&mut self, source: &MediaSource, ticket: LoadTicket) {
        debug!(url = %source.url, %ticket, "Clock player load");
        self.load_count += 1;
        self.position = 0.0;
        if self.failing_urls.contains(&source.url) {
            self.source = None;
            self.playing = false;
            self.events
                .push(PlayerEvent::load_error(ticket, format!("cannot open {}", source.url)));
            return;
        }
        self.source = Some((source.clone(), ticket));
    }

    fn unload(&mut self) {
        self.source = None;
        self.position = 0.0;
        self.playing = false;
    }

    fn play(&mut self) {
        self.playing = self.source.is_some();
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, offset: f64) {
        self.position = offset.max(0.0);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn tick(&mut self, dt: f64) {
        self.advance(dt);
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        self.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerEventKind;
    use storyreel_timeline::ClipKind;

    fn source(url: &str) -> MediaSource {
        MediaSource {
            url: url.into(),
            kind: ClipKind::Image,
        }
    }

    #[test]
    fn test_advance_only_while_playing() {
        let mut player = ClockPlayer::new();
        player.advance(1.0);
        assert!(player.drain_events().is_empty());

        player.load(&source("a"), LoadTicket(1));
        player.advance(1.0);
        assert!(player.drain_events().is_empty());

        player.play();
        player.seek(2.0);
        player.advance(0.5);
        assert_eq!(
            player.drain_events(),
            vec![PlayerEvent::time_update(LoadTicket(1), 2.5)]
        );
    }

    #[test]
    fn test_failing_load_reports_error() {
        let mut player = ClockPlayer::new();
        player.fail_loads_of("bad");
        player.load(&source("bad"), LoadTicket(3));
        player.play();

        let events = player.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].ticket, LoadTicket(3));
        assert!(matches!(events[0].kind, PlayerEventKind::LoadError(_)));
        assert!(!player.is_playing());
    }
}
