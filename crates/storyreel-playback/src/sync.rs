//! Playback synchronization.
//!
//! The playhead is the single source of truth for "now". The synchronizer
//! maps it onto the primary track, keeps the player loaded with the clip
//! under it, and while playing turns the player's local time updates back
//! into global playhead moves, advancing from clip to clip.

use storyreel_core::{EditorConfig, Result, StoryError, TimeSpan, TIME_EPSILON};
use storyreel_timeline::{Clip, ClipId, Playhead, Timeline};
use tracing::{debug, info, warn};

use crate::locate::{locate, next_clip_from, Located};
use crate::player::{
    LoadTicket, MediaPlayer, MediaResolver, MediaSource, PlayerEvent, PlayerEventKind,
};

/// Transport state.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackStatus {
    Paused,
    Playing,
    /// Reached the end of the last clip. Terminal until the next `play`.
    Stopped,
    /// The player could not open this clip's media. Playback holds here
    /// until the user retries or moves elsewhere.
    LoadFailed { clip_id: ClipId, reason: String },
}

/// The clip currently loaded in the player.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveClip {
    pub id: ClipId,
    pub span: TimeSpan,
    pub ticket: LoadTicket,
}

/// What the synchronizer reads and writes on each call.
pub struct SyncView<'a> {
    pub timeline: &'a Timeline,
    pub playhead: &'a mut Playhead,
    pub resolver: &'a dyn MediaResolver,
}

/// Keeps a [`MediaPlayer`] in step with the playhead.
pub struct PlaybackSynchronizer<P> {
    player: P,
    status: PlaybackStatus,
    active: Option<ActiveClip>,
    last_ticket: LoadTicket,
    scrubbing: bool,
    loop_playback: bool,
    volume: f32,
    muted: bool,
}

impl<P: MediaPlayer> PlaybackSynchronizer<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            status: PlaybackStatus::Paused,
            active: None,
            last_ticket: LoadTicket::default(),
            scrubbing: false,
            loop_playback: false,
            volume: 1.0,
            muted: false,
        }
    }

    pub fn from_config(player: P, config: &EditorConfig) -> Self {
        let mut sync = Self::new(player);
        sync.loop_playback = config.loop_playback;
        sync
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    pub fn active(&self) -> Option<&ActiveClip> {
        self.active.as_ref()
    }

    /// Ticket of the most recent load.
    pub fn current_ticket(&self) -> LoadTicket {
        self.last_ticket
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn loop_playback(&self) -> bool {
        self.loop_playback
    }

    pub fn set_loop_playback(&mut self, enabled: bool) {
        self.loop_playback = enabled;
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    // ── Transport ───────────────────────────────────────────────

    /// Start playing from the playhead.
    ///
    /// From the end of the timeline playback restarts at 0. From a gap it
    /// jumps to the next primary clip. Retries a failed load.
    pub fn play(&mut self, view: &mut SyncView<'_>) -> Result<()> {
        let duration = view.timeline.duration();
        if view.playhead.time() >= duration - TIME_EPSILON {
            view.playhead.set(0.0, duration);
        }
        if let PlaybackStatus::LoadFailed { .. } = self.status {
            self.active = None;
            self.status = PlaybackStatus::Paused;
        }
        self.start_from_playhead(view)
    }

    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.player.pause();
            self.status = PlaybackStatus::Paused;
            info!("Playback paused");
        }
    }

    pub fn toggle(&mut self, view: &mut SyncView<'_>) -> Result<()> {
        if self.is_playing() {
            self.pause();
            Ok(())
        } else {
            self.play(view)
        }
    }

    /// Jump to a global time. Clamped silently to `[0, duration]`.
    pub fn seek(&mut self, view: &mut SyncView<'_>, time: f64) -> Result<()> {
        let time = view.playhead.set(time, view.timeline.duration());
        self.show(view.resolver, view.timeline, time)?;
        if self.is_playing() && self.active.is_none() {
            self.start_from_playhead(view)?;
        }
        Ok(())
    }

    /// Move the playhead by `delta` seconds.
    pub fn skip(&mut self, view: &mut SyncView<'_>, delta: f64) -> Result<()> {
        let target = view.playhead.time() + delta;
        self.seek(view, target)
    }

    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.player.set_volume(self.volume);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.player.set_muted(muted);
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.muted);
    }

    // ── Scrubbing ───────────────────────────────────────────────

    /// A scrub gesture started. Player time updates are ignored until
    /// [`end_scrub`](Self::end_scrub).
    pub fn begin_scrub(&mut self) {
        self.scrubbing = true;
        if self.is_playing() {
            self.player.pause();
        }
        debug!("Scrub started");
    }

    /// Show the clip under `time` with the player seeked into it. In a gap
    /// the player is unloaded.
    pub fn scrub_to(&mut self, view: &mut SyncView<'_>, time: f64) -> Result<()> {
        let time = view.playhead.set(time, view.timeline.duration());
        self.show(view.resolver, view.timeline, time)
    }

    /// The scrub gesture ended. Playback resumes if it was running.
    pub fn end_scrub(&mut self, view: &mut SyncView<'_>) -> Result<()> {
        self.scrubbing = false;
        debug!(time = view.playhead.time(), "Scrub ended");
        if self.is_playing() {
            self.start_from_playhead(view)?;
        }
        Ok(())
    }

    // ── Player callbacks ────────────────────────────────────────

    /// Feed a player callback. Events from superseded loads are dropped.
    ///
    /// A load error is returned as `StoryError::MediaLoad` after the
    /// synchronizer has parked on the failing clip.
    pub fn on_player_event(&mut self, view: &mut SyncView<'_>, event: PlayerEvent) -> Result<()> {
        let Some(active) = self.active.clone() else {
            debug!(ticket = %event.ticket, "Player event with nothing loaded, ignored");
            return Ok(());
        };
        if event.ticket != active.ticket {
            debug!(
                ticket = %event.ticket,
                current = %active.ticket,
                "Stale player event ignored"
            );
            return Ok(());
        }

        match event.kind {
            PlayerEventKind::TimeUpdate(local) => {
                if self.scrubbing || !self.is_playing() {
                    return Ok(());
                }
                let global = active.span.start + local;
                if global >= active.span.end - TIME_EPSILON {
                    self.advance(view, &active)
                } else {
                    view.playhead.set(global, view.timeline.duration());
                    Ok(())
                }
            }
            PlayerEventKind::Ended => {
                if self.scrubbing || !self.is_playing() {
                    return Ok(());
                }
                self.advance(view, &active)
            }
            PlayerEventKind::LoadError(reason) => Err(self.fail(&active.id, reason)),
        }
    }

    /// Re-resolve the active clip after a timeline edit.
    pub fn reconcile(&mut self, view: &mut SyncView<'_>) -> Result<()> {
        let timeline = view.timeline;
        let time = view.playhead.clamp_to(timeline.duration());

        if let PlaybackStatus::LoadFailed { clip_id, .. } = &self.status {
            if !timeline.contains(clip_id) {
                self.status = PlaybackStatus::Paused;
            }
        }

        let target = locate(timeline, time).map(|l| (l.clip.id().clone(), l.clip.span()));
        let same_clip = matches!(
            (&self.active, &target),
            (Some(active), Some((id, _))) if active.id == *id
        );
        let parked = matches!(
            (&self.status, &target),
            (PlaybackStatus::LoadFailed { clip_id, .. }, Some((id, _))) if clip_id == id
        );

        if same_clip {
            if let (Some(active), Some((id, span))) = (self.active.as_mut(), target) {
                if active.span != span {
                    active.span = span;
                    self.player.seek(time - span.start);
                    debug!(clip = %id, %span, "Active clip changed shape");
                }
            }
        } else if !parked && (self.active.is_some() || target.is_some()) {
            self.show(view.resolver, timeline, time)?;
        }

        if self.is_playing() && self.active.is_none() {
            self.start_from_playhead(view)?;
        }
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────

    /// Begin (or resume) playing at the playhead, hopping over a gap.
    fn start_from_playhead(&mut self, view: &mut SyncView<'_>) -> Result<()> {
        let timeline = view.timeline;
        let mut time = view.playhead.time();

        if locate(timeline, time).is_none() {
            match next_clip_from(timeline, time) {
                Some(next) => {
                    time = view.playhead.set(next.start(), timeline.duration());
                    debug!(clip = %next.id(), time, "Skipping gap");
                }
                None => {
                    self.stop(view, time);
                    return Ok(());
                }
            }
        }

        self.status = PlaybackStatus::Playing;
        self.show(view.resolver, timeline, time)?;
        self.player.play();
        info!(time, "Playback started");
        Ok(())
    }

    /// Make the player display global `time`.
    fn show(&mut self, resolver: &dyn MediaResolver, timeline: &Timeline, time: f64) -> Result<()> {
        match locate(timeline, time) {
            Some(Located { clip, offset }) => {
                let reload = match (&self.active, &self.status) {
                    (_, PlaybackStatus::LoadFailed { clip_id, .. }) if clip_id == clip.id() => true,
                    (Some(active), _) => active.id != *clip.id(),
                    (None, _) => true,
                };
                if reload {
                    self.load_clip(resolver, clip)?;
                    if matches!(self.status, PlaybackStatus::LoadFailed { .. }) {
                        self.status = PlaybackStatus::Paused;
                    }
                } else if let Some(active) = self.active.as_mut() {
                    active.span = clip.span();
                }
                self.player.seek(offset);
                if self.is_playing() && !self.scrubbing {
                    self.player.play();
                }
            }
            None => {
                if self.active.take().is_some() {
                    self.player.unload();
                    debug!(time, "Playhead in gap, player unloaded");
                }
            }
        }
        Ok(())
    }

    fn load_clip(&mut self, resolver: &dyn MediaResolver, clip: &Clip) -> Result<()> {
        let Some(url) = resolver.resolve(clip.media_ref()) else {
            self.active = None;
            self.player.unload();
            return Err(self.fail(clip.id(), format!("unresolved media {}", clip.media_ref())));
        };
        self.last_ticket = self.last_ticket.next();
        let source = MediaSource {
            url,
            kind: clip.kind(),
        };
        debug!(clip = %clip.id(), url = %source.url, ticket = %self.last_ticket, "Loading clip");
        self.player.load(&source, self.last_ticket);
        self.active = Some(ActiveClip {
            id: clip.id().clone(),
            span: clip.span(),
            ticket: self.last_ticket,
        });
        Ok(())
    }

    /// Follow-on after the active clip finished.
    fn advance(&mut self, view: &mut SyncView<'_>, finished: &ActiveClip) -> Result<()> {
        let timeline = view.timeline;
        let next = next_clip_from(timeline, finished.span.end).filter(|c| *c.id() != finished.id);
        let next = match next {
            Some(clip) => Some(clip),
            None if self.loop_playback => next_clip_from(timeline, 0.0),
            None => None,
        };

        let Some(next) = next else {
            self.stop(view, finished.span.end);
            return Ok(());
        };

        view.playhead.set(next.start(), timeline.duration());
        info!(from = %finished.id, to = %next.id(), "Advancing to next clip");
        self.load_clip(view.resolver, next)?;
        self.player.seek(0.0);
        self.player.play();
        Ok(())
    }

    fn stop(&mut self, view: &mut SyncView<'_>, at: f64) {
        self.player.pause();
        self.status = PlaybackStatus::Stopped;
        let time = view.playhead.set(at, view.timeline.duration());
        info!(time, "Playback reached the end");
    }

    fn fail(&mut self, clip_id: &ClipId, reason: String) -> StoryError {
        warn!(clip = %clip_id, %reason, "Media failed to load");
        self.player.pause();
        self.status = PlaybackStatus::LoadFailed {
            clip_id: clip_id.clone(),
            reason: reason.clone(),
        };
        StoryError::MediaLoad {
            clip_id: clip_id.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockPlayer;
    use storyreel_timeline::{ClipMedia, EditCommand, MediaRef};

    struct Urls;

    impl MediaResolver for Urls {
        fn resolve(&self, media: &MediaRef) -> Option<String> {
            (media.as_str() != "orphan").then(|| format!("mem://{media}"))
        }
    }

    struct Fixture {
        timeline: Timeline,
        playhead: Playhead,
        sync: PlaybackSynchronizer<ClockPlayer>,
    }

    impl Fixture {
        fn new() -> Self {
            let media = ["a", "b", "c"].map(|m| ClipMedia::image(MediaRef::new(m)));
            Self {
                timeline: Timeline::from_media(media, 5.0, 3).unwrap(),
                playhead: Playhead::new(),
                sync: PlaybackSynchronizer::new(ClockPlayer::new()),
            }
        }

        fn with<R>(
            &mut self,
            f: impl FnOnce(&mut PlaybackSynchronizer<ClockPlayer>, &mut SyncView<'_>) -> R,
        ) -> R {
            let mut view = SyncView {
                timeline: &self.timeline,
                playhead: &mut self.playhead,
                resolver: &Urls,
            };
            f(&mut self.sync, &mut view)
        }

        /// Advance the clock and feed every queued event back.
        fn tick(&mut self, dt: f64) -> Result<()> {
            self.sync.player_mut().advance(dt);
            loop {
                let events = self.sync.player_mut().drain_events();
                if events.is_empty() {
                    return Ok(());
                }
                for event in events {
                    self.with(|sync, view| sync.on_player_event(view, event))?;
                }
            }
        }

        fn active_id(&self) -> Option<&str> {
            self.sync.active().map(|a| a.id.as_str())
        }
    }

    #[test]
    fn test_scrub_loads_clip_under_playhead() {
        let mut f = Fixture::new();
        f.sync.begin_scrub();
        f.with(|sync, view| sync.scrub_to(view, 7.0)).unwrap();

        assert_eq!(f.active_id(), Some("clip-2"));
        assert_eq!(f.sync.player().position(), 2.0);
        assert_eq!(f.sync.player().source().unwrap().url, "mem://b");
        assert_eq!(f.playhead.time(), 7.0);
    }

    #[test]
    fn test_scrub_within_clip_does_not_reload() {
        let mut f = Fixture::new();
        f.sync.begin_scrub();
        f.with(|sync, view| sync.scrub_to(view, 6.0)).unwrap();
        f.with(|sync, view| sync.scrub_to(view, 8.0)).unwrap();
        assert_eq!(f.sync.player().load_count(), 1);
        assert_eq!(f.sync.player().position(), 3.0);
    }

    #[test]
    fn test_play_advances_across_clips() {
        let mut f = Fixture::new();
        f.with(|sync, view| sync.play(view)).unwrap();
        assert!(f.sync.is_playing());
        assert_eq!(f.active_id(), Some("clip-1"));

        f.tick(2.5).unwrap();
        assert_eq!(f.playhead.time(), 2.5);

        f.tick(2.6).unwrap();
        assert_eq!(f.active_id(), Some("clip-2"));
        assert_eq!(f.playhead.time(), 5.0);
    }

    #[test]
    fn test_end_of_last_clip_stops() {
        let mut f = Fixture::new();
        f.with(|sync, view| sync.seek(view, 14.9)).unwrap();
        f.with(|sync, view| sync.play(view)).unwrap();
        assert_eq!(f.active_id(), Some("clip-3"));

        f.tick(0.2).unwrap();
        assert_eq!(*f.sync.status(), PlaybackStatus::Stopped);
        assert_eq!(f.playhead.time(), 15.0);
        assert!(!f.sync.player().is_playing());
    }

    #[test]
    fn test_loop_wraps_to_start() {
        let mut f = Fixture::new();
        f.sync.set_loop_playback(true);
        f.with(|sync, view| sync.seek(view, 14.9)).unwrap();
        f.with(|sync, view| sync.play(view)).unwrap();
        f.tick(0.2).unwrap();

        assert!(f.sync.is_playing());
        assert_eq!(f.playhead.time(), 0.0);
        assert_eq!(f.active_id(), Some("clip-1"));
    }

    #[test]
    fn test_play_after_stop_restarts() {
        let mut f = Fixture::new();
        f.with(|sync, view| sync.seek(view, 15.0)).unwrap();
        f.with(|sync, view| sync.play(view)).unwrap();
        assert_eq!(f.playhead.time(), 0.0);
        assert!(f.sync.is_playing());
    }

    #[test]
    fn test_time_updates_ignored_while_scrubbing() {
        let mut f = Fixture::new();
        f.with(|sync, view| sync.play(view)).unwrap();
        f.sync.begin_scrub();
        f.with(|sync, view| sync.scrub_to(view, 3.0)).unwrap();

        let ticket = f.sync.current_ticket();
        f.with(|sync, view| sync.on_player_event(view, PlayerEvent::time_update(ticket, 1.0)))
            .unwrap();
        assert_eq!(f.playhead.time(), 3.0);

        f.with(|sync, view| sync.end_scrub(view)).unwrap();
        assert!(f.sync.player().is_playing());
    }

    #[test]
    fn test_stale_ticket_ignored() {
        let mut f = Fixture::new();
        f.with(|sync, view| sync.play(view)).unwrap();
        let old = f.sync.current_ticket();
        f.with(|sync, view| sync.seek(view, 12.0)).unwrap();

        f.with(|sync, view| sync.on_player_event(view, PlayerEvent::ended(old)))
            .unwrap();
        assert_eq!(f.active_id(), Some("clip-3"));
        assert_eq!(f.playhead.time(), 12.0);
    }

    #[test]
    fn test_load_error_parks_on_clip() {
        let mut f = Fixture::new();
        f.sync.player_mut().fail_loads_of("mem://b");
        f.with(|sync, view| sync.seek(view, 4.0)).unwrap();
        f.with(|sync, view| sync.play(view)).unwrap();

        let err = f.tick(1.5).unwrap_err();
        assert!(matches!(err, StoryError::MediaLoad { ref clip_id, .. } if clip_id == "clip-2"));
        assert!(matches!(
            f.sync.status(),
            PlaybackStatus::LoadFailed { clip_id, .. } if clip_id.as_str() == "clip-2"
        ));
        assert_eq!(f.playhead.time(), 5.0);

        // further clock ticks do not skip ahead
        f.tick(10.0).unwrap();
        assert_eq!(f.playhead.time(), 5.0);
    }

    #[test]
    fn test_unresolved_media_fails_immediately() {
        let mut f = Fixture::new();
        f.timeline
            .apply(EditCommand::Append {
                media: ClipMedia::image(MediaRef::new("orphan")),
                track: 0,
                duration: 5.0,
            })
            .unwrap();
        let err = f.with(|sync, view| sync.seek(view, 16.0)).unwrap_err();
        assert!(matches!(err, StoryError::MediaLoad { .. }));
        assert!(f.sync.active().is_none());
    }

    #[test]
    fn test_scrub_into_gap_unloads() {
        let mut f = Fixture::new();
        f.with(|sync, view| sync.seek(view, 7.0)).unwrap();
        f.timeline
            .apply(EditCommand::Remove {
                id: ClipId::sequential(2),
            })
            .unwrap();

        f.sync.begin_scrub();
        f.with(|sync, view| sync.scrub_to(view, 6.0)).unwrap();
        assert!(f.sync.active().is_none());
        assert!(f.sync.player().source().is_none());
    }

    #[test]
    fn test_play_from_gap_jumps_to_next_clip() {
        let mut f = Fixture::new();
        f.timeline
            .apply(EditCommand::Remove {
                id: ClipId::sequential(2),
            })
            .unwrap();
        f.with(|sync, view| sync.seek(view, 6.0)).unwrap();
        f.with(|sync, view| sync.play(view)).unwrap();
        assert_eq!(f.playhead.time(), 10.0);
        assert_eq!(f.active_id(), Some("clip-3"));
    }

    #[test]
    fn test_reconcile_after_delete() {
        let mut f = Fixture::new();
        f.with(|sync, view| sync.seek(view, 12.0)).unwrap();
        f.timeline
            .apply(EditCommand::Remove {
                id: ClipId::sequential(3),
            })
            .unwrap();
        f.with(|sync, view| sync.reconcile(view)).unwrap();

        assert_eq!(f.playhead.time(), 10.0);
        assert!(f.sync.active().is_none());
    }

    #[test]
    fn test_reconcile_tracks_resized_active_clip() {
        let mut f = Fixture::new();
        f.with(|sync, view| sync.seek(view, 6.0)).unwrap();
        f.timeline
            .apply(EditCommand::Resize {
                id: ClipId::sequential(2),
                start: 5.5,
                end: 10.0,
            })
            .unwrap();
        f.with(|sync, view| sync.reconcile(view)).unwrap();

        let active = f.sync.active().unwrap();
        assert_eq!(active.span, TimeSpan::new(5.5, 10.0));
        assert_eq!(f.sync.player().position(), 0.5);
        assert_eq!(f.sync.player().load_count(), 1);
    }

    #[test]
    fn test_skip_is_clamped() {
        let mut f = Fixture::new();
        f.with(|sync, view| sync.skip(view, -5.0)).unwrap();
        assert_eq!(f.playhead.time(), 0.0);
        f.with(|sync, view| sync.skip(view, 12.0)).unwrap();
        assert_eq!(f.playhead.time(), 12.0);
        f.with(|sync, view| sync.skip(view, 5.0)).unwrap();
        assert_eq!(f.playhead.time(), 15.0);
    }

    #[test]
    fn test_volume_and_mute_forwarded() {
        let mut f = Fixture::new();
        f.sync.set_volume(1.7);
        assert_eq!(f.sync.volume(), 1.0);
        f.sync.set_volume(0.25);
        assert_eq!(f.sync.player().volume(), 0.25);

        f.sync.toggle_mute();
        assert!(f.sync.is_muted());
        assert!(f.sync.player().is_muted());
    }

    #[test]
    fn test_empty_timeline_play_stops() {
        let mut f = Fixture::new();
        f.timeline = Timeline::new(3);
        f.with(|sync, view| sync.play(view)).unwrap();
        assert_eq!(*f.sync.status(), PlaybackStatus::Stopped);
    }
}
