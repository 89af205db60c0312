//! Editor event queue.
//!
//! Work that completes outside the UI thread (generation, player callbacks
//! from other threads) is posted here and handled one event at a time by
//! [`Editor::pump`](crate::Editor::pump).

use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use storyreel_ai::GenerationOutcome;
use storyreel_playback::PlayerEvent;

#[derive(Debug)]
pub enum EditorEvent {
    Player(PlayerEvent),
    GenerationFinished(GenerationOutcome),
}

/// Multi-producer queue drained on the UI thread.
#[derive(Debug, Clone)]
pub struct EventQueue {
    tx: Sender<EditorEvent>,
    rx: Receiver<EditorEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// A handle for posting from other threads.
    pub fn sender(&self) -> Sender<EditorEvent> {
        self.tx.clone()
    }

    pub fn post(&self, event: EditorEvent) {
        // The queue owns a receiver, so sending cannot fail while `self` lives.
        let _ = self.tx.send(event);
    }

    pub fn try_next(&self) -> Option<EditorEvent> {
        self.rx.try_recv().ok()
    }

    pub fn next_timeout(&self, timeout: Duration) -> Option<EditorEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
