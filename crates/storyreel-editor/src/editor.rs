//! The editor shell.
//!
//! `Editor` owns the [`EditorState`] and is the only thing that writes to
//! it. UI code turns input into [`EditorCommand`]s and calls
//! [`Editor::dispatch`]; asynchronous results (player callbacks, finished
//! generations) arrive as [`EditorEvent`]s and are handled one at a time by
//! [`Editor::pump`].

use std::time::Duration;

use crossbeam_channel::Sender;
use storyreel_ai::{GenerationDispatcher, GenerationOutcome, GenerationRequest};
use storyreel_core::{EditorConfig, Result, StoryError};
use storyreel_playback::{MediaPlayer, PlaybackSynchronizer};
use storyreel_timeline::{
    ClipId, ClipKind, ClipMedia, EditCommand, InteractionEffect, InteractionEngine,
    InteractionSettings, MediaRef, PointerPos,
};
use tracing::{debug, info, trace, warn};

use crate::command::EditorCommand;
use crate::event::{EditorEvent, EventQueue};
use crate::library::MediaLibrary;
use crate::notice::NoticeLevel;
use crate::state::EditorState;

pub struct Editor<P: MediaPlayer> {
    state: EditorState,
    engine: InteractionEngine,
    sync: PlaybackSynchronizer<P>,
    dispatcher: Option<GenerationDispatcher>,
    events: EventQueue,
}

impl<P: MediaPlayer> Editor<P> {
    /// Create an editor whose library and primary track hold one still per
    /// URL, back to back. The first clip is shown but not played.
    pub fn new<I, S>(config: EditorConfig, player: P, urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        config.validate()?;
        let library = MediaLibrary::from_urls(urls);
        let engine = InteractionEngine::new(InteractionSettings::from_config(&config));
        let sync = PlaybackSynchronizer::from_config(player, &config);
        let state = EditorState::new(config, library)?;
        info!(
            clips = state.timeline.len(),
            duration = state.timeline.duration(),
            "Editor created"
        );

        let mut editor = Self {
            state,
            engine,
            sync,
            dispatcher: None,
            events: EventQueue::new(),
        };
        editor.sync.seek(&mut editor.state.sync_view(), 0.0)?;
        Ok(editor)
    }

    /// Enable prompt generation.
    pub fn with_dispatcher(mut self, dispatcher: GenerationDispatcher) -> Self {
        info!(generator = dispatcher.generator_name(), "Image generation enabled");
        self.dispatcher = Some(dispatcher);
        self
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn engine(&self) -> &InteractionEngine {
        &self.engine
    }

    pub fn playback(&self) -> &PlaybackSynchronizer<P> {
        &self.sync
    }

    pub fn player(&self) -> &P {
        self.sync.player()
    }

    pub fn player_mut(&mut self) -> &mut P {
        self.sync.player_mut()
    }

    pub fn is_playing(&self) -> bool {
        self.sync.is_playing()
    }

    pub fn can_generate(&self) -> bool {
        self.dispatcher.is_some()
    }

    /// Handle for posting events from other threads.
    pub fn event_sender(&self) -> Sender<EditorEvent> {
        self.events.sender()
    }

    // ── Commands ────────────────────────────────────────────────

    /// Apply one user command. A failure is also posted as a notice.
    pub fn dispatch(&mut self, command: EditorCommand) -> Result<()> {
        if command.is_pointer() {
            trace!(?command, "Editor command");
        } else {
            debug!(?command, "Editor command");
        }
        let result = self.execute(command);
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    fn execute(&mut self, command: EditorCommand) -> Result<()> {
        match command {
            EditorCommand::PointerDown(pos) => self.pointer(Pointer::Down, pos),
            EditorCommand::PointerMove(pos) => self.pointer(Pointer::Move, pos),
            EditorCommand::PointerUp(pos) => self.pointer(Pointer::Up, pos),
            EditorCommand::RulerDown(pos) => self.pointer(Pointer::Ruler, pos),
            EditorCommand::CancelGesture => {
                let was_scrubbing = self.engine.is_scrubbing();
                self.engine.cancel();
                if was_scrubbing {
                    self.sync.end_scrub(&mut self.state.sync_view())?;
                }
                Ok(())
            }

            EditorCommand::Play => self.sync.play(&mut self.state.sync_view()),
            EditorCommand::Pause => {
                self.sync.pause();
                Ok(())
            }
            EditorCommand::TogglePlay => self.sync.toggle(&mut self.state.sync_view()),
            EditorCommand::SkipBack => {
                let step = self.state.config.skip_seconds;
                self.sync.skip(&mut self.state.sync_view(), -step)
            }
            EditorCommand::SkipForward => {
                let step = self.state.config.skip_seconds;
                self.sync.skip(&mut self.state.sync_view(), step)
            }
            EditorCommand::Seek(time) => self.sync.seek(&mut self.state.sync_view(), time),
            EditorCommand::SetVolume(volume) => {
                self.sync.set_volume(volume);
                // The volume slider doubles as the mute control at zero.
                self.sync.set_muted(self.sync.volume() <= 0.0);
                Ok(())
            }
            EditorCommand::ToggleMute => {
                self.sync.toggle_mute();
                Ok(())
            }
            EditorCommand::SetLoop(enabled) => {
                self.sync.set_loop_playback(enabled);
                Ok(())
            }

            EditorCommand::ZoomIn => {
                self.state.geometry.zoom_in();
                Ok(())
            }
            EditorCommand::ZoomOut => {
                self.state.geometry.zoom_out();
                Ok(())
            }
            EditorCommand::DeleteSelected => self.delete_selected(),
            EditorCommand::DeleteClip(id) => self.delete_clip(id),

            EditorCommand::AddMedia {
                url,
                kind,
                intrinsic_duration,
            } => {
                let media = self.state.library.add(url, kind, intrinsic_duration);
                info!(%media, kind = kind.label(), "Media imported");
                Ok(())
            }
            EditorCommand::AddMediaToTimeline(media) => self.place_media(media),
            EditorCommand::RemoveMedia(media) => self.remove_media(media),

            EditorCommand::SetPrompt(prompt) => {
                self.state.prompt = prompt;
                Ok(())
            }
            EditorCommand::Generate => self.generate(),
            EditorCommand::ToggleSequence(id) => {
                self.state.storyboard.toggle_selection(id)?;
                Ok(())
            }
            EditorCommand::DeleteSequence(id) => {
                self.state.storyboard.delete(id)?;
                Ok(())
            }
            EditorCommand::SendToTimeline => self.send_to_timeline(),

            EditorCommand::DismissNotice(id) => {
                self.state.notices.dismiss(id);
                Ok(())
            }
            EditorCommand::Undo | EditorCommand::Redo => {
                info!("Undo/redo requested but edit history is not recorded");
                self.notify(NoticeLevel::Info, "Nothing to undo: edit history is not recorded");
                Ok(())
            }
        }
    }

    // ── Events ──────────────────────────────────────────────────

    /// Queue an event for the next [`pump`](Self::pump).
    pub fn post(&self, event: EditorEvent) {
        self.events.post(event);
    }

    /// Handle one event. A failure is also posted as a notice.
    pub fn handle_event(&mut self, event: EditorEvent) -> Result<()> {
        let result = match event {
            EditorEvent::Player(event) => self.sync.on_player_event(&mut self.state.sync_view(), event),
            EditorEvent::GenerationFinished(outcome) => self.finish_generation(outcome),
        };
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    /// Handle everything the player and the queue have produced so far.
    /// Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let mut batch: Vec<EditorEvent> = self
                .sync
                .player_mut()
                .poll_events()
                .into_iter()
                .map(EditorEvent::Player)
                .collect();
            batch.extend(std::iter::from_fn(|| self.events.try_next()));
            if batch.is_empty() {
                return handled;
            }
            for event in batch {
                handled += 1;
                // Failures are already on the notice board.
                let _ = self.handle_event(event);
            }
        }
    }

    /// Advance the editor clock by `dt` seconds: expire notices, drive the
    /// player and handle whatever it reports.
    pub fn tick(&mut self, dt: f64) {
        self.state.clock += dt.max(0.0);
        self.state.notices.expire(self.state.clock);
        self.sync.player_mut().tick(dt);
        self.pump();
    }

    /// Block until a queued event arrives or `timeout` passes, then handle it.
    /// Returns whether an event was handled.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.events.next_timeout(timeout) {
            Some(event) => {
                let _ = self.handle_event(event);
                true
            }
            None => false,
        }
    }

    // ── Internals ───────────────────────────────────────────────

    fn pointer(&mut self, phase: Pointer, pos: PointerPos) -> Result<()> {
        // A press while a scrub is still open means its release was lost.
        if matches!(phase, Pointer::Down | Pointer::Ruler) && self.engine.is_scrubbing() {
            debug!("Scrub left open by a lost release, ending it");
            self.engine.cancel();
            self.sync.end_scrub(&mut self.state.sync_view())?;
        }

        let mut view = self.state.timeline_view();
        let effect = match phase {
            Pointer::Down => self.engine.pointer_down(&mut view, pos),
            Pointer::Ruler => self.engine.ruler_down(&mut view, pos),
            Pointer::Move => self.engine.pointer_move(&mut view, pos),
            Pointer::Up => self.engine.pointer_up(&mut view, pos),
        };
        self.apply_effect(effect)
    }

    fn apply_effect(&mut self, effect: InteractionEffect) -> Result<()> {
        match effect {
            InteractionEffect::ScrubStarted { time } => {
                self.sync.begin_scrub();
                self.sync.scrub_to(&mut self.state.sync_view(), time)
            }
            InteractionEffect::Scrubbed { time } => {
                self.sync.scrub_to(&mut self.state.sync_view(), time)
            }
            InteractionEffect::ScrubEnded { .. } => self.sync.end_scrub(&mut self.state.sync_view()),
            InteractionEffect::PlacementRejected { id } => {
                debug!(clip = %id, "No free position under the pointer");
                Ok(())
            }
            effect if effect.edits_timeline() => self.after_edit(),
            _ => Ok(()),
        }
    }

    /// Drop selection entries for deleted clips and re-sync the player.
    fn after_edit(&mut self) -> Result<()> {
        let timeline = &self.state.timeline;
        self.state.selection.retain(|id| timeline.contains(id));
        self.sync.reconcile(&mut self.state.sync_view())
    }

    fn delete_selected(&mut self) -> Result<()> {
        let ids: Vec<ClipId> = self.state.selection.iter().cloned().collect();
        if ids.is_empty() {
            return Ok(());
        }
        let count = ids.len();
        let batch = ids.into_iter().map(|id| EditCommand::Remove { id }).collect();
        self.state.timeline.apply(EditCommand::Batch(batch))?;
        info!(count, "Selected clips deleted");
        self.after_edit()
    }

    fn delete_clip(&mut self, id: ClipId) -> Result<()> {
        self.state.timeline.apply(EditCommand::Remove { id })?;
        self.after_edit()
    }

    /// Append library media to the end of a track: audio goes to the last
    /// track, everything else to the primary one.
    fn place_media(&mut self, media: MediaRef) -> Result<()> {
        let item = self
            .state
            .library
            .get(&media)
            .ok_or_else(|| StoryError::NotFound(format!("media {media}")))?;
        let clip_media = item.clip_media();
        let track = match item.kind {
            ClipKind::Audio => self.state.timeline.num_tracks().saturating_sub(1),
            ClipKind::Image | ClipKind::Video => 0,
        };
        let duration = clip_media.placement_duration(self.state.config.default_clip_duration);
        self.state.timeline.apply(EditCommand::Append {
            media: clip_media,
            track,
            duration,
        })?;
        self.after_edit()
    }

    /// Remove media from the library together with every clip using it.
    fn remove_media(&mut self, media: MediaRef) -> Result<()> {
        if self.state.library.get(&media).is_none() {
            return Err(StoryError::NotFound(format!("media {media}")));
        }
        self.state
            .timeline
            .apply(EditCommand::RemoveMedia { media: media.clone() })?;
        self.state.library.remove(&media)?;
        self.after_edit()
    }

    fn generate(&mut self) -> Result<()> {
        if self.state.prompt.trim().is_empty() {
            debug!("Blank prompt ignored");
            return Ok(());
        }
        if let Some(pending) = self.state.pending_generation {
            debug!(%pending, "Generation already in flight");
            return Err(StoryError::Busy);
        }
        let Some(dispatcher) = &self.dispatcher else {
            return Err(StoryError::Generation(format!(
                "no image generator configured (set {})",
                self.state.config.generation.api_key_env
            )));
        };

        let request = GenerationRequest::new(&self.state.prompt, &self.state.config.generation)?;
        self.state.pending_generation = Some(request.id);
        let sender = self.events.sender();
        dispatcher.submit(request, move |outcome| {
            // The editor may already be gone when a request finishes.
            let _ = sender.send(EditorEvent::GenerationFinished(outcome));
        });
        Ok(())
    }

    fn finish_generation(&mut self, outcome: GenerationOutcome) -> Result<()> {
        let id = outcome.request.id;
        if self.state.pending_generation != Some(id) {
            debug!(request = %id, "Outcome for an unknown request ignored");
            return Ok(());
        }
        self.state.pending_generation = None;

        let images = outcome.result?;
        let count = images.len();
        let sequence = self.state.storyboard.add(outcome.request.prompt(), images);
        self.state.prompt.clear();
        info!(request = %id, %sequence, count, "Storyboard sequence generated");
        self.notify(NoticeLevel::Info, format!("Generated {count} images"));
        Ok(())
    }

    /// Append the storyboard images to the library and the primary track.
    fn send_to_timeline(&mut self) -> Result<()> {
        let images = self.state.storyboard.images_to_send();
        if images.is_empty() {
            self.notify(NoticeLevel::Info, "Storyboard is empty");
            return Ok(());
        }

        let duration = self.state.config.default_clip_duration;
        let added: Vec<MediaRef> = images
            .into_iter()
            .map(|url| self.state.library.add(url, ClipKind::Image, None))
            .collect();
        let batch = added
            .iter()
            .map(|media| EditCommand::Append {
                media: ClipMedia::image(media.clone()),
                track: 0,
                duration,
            })
            .collect();

        if let Err(e) = self.state.timeline.apply(EditCommand::Batch(batch)) {
            for media in &added {
                let _ = self.state.library.remove(media);
            }
            return Err(e);
        }
        self.state.storyboard.clear_selection();
        info!(count = added.len(), "Storyboard sent to timeline");
        self.notify(
            NoticeLevel::Info,
            format!("Added {} images to the timeline", added.len()),
        );
        self.after_edit()
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.state.notices.push(level, message, self.state.clock);
    }

    fn report(&mut self, error: &StoryError) {
        let level = match error {
            StoryError::Busy | StoryError::NotFound(_) | StoryError::OverlapRejected { .. } => {
                NoticeLevel::Warning
            }
            _ => NoticeLevel::Error,
        };
        warn!(error = %error, transient = error.is_transient(), "Editor operation failed");
        self.notify(level, error.to_string());
    }
}

#[derive(Debug, Clone, Copy)]
enum Pointer {
    Down,
    Ruler,
    Move,
    Up,
}
