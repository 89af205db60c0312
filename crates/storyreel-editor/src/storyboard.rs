//! Storyboard: generated image sequences.

use std::fmt;

use serde::{Deserialize, Serialize};
use storyreel_core::{Result, StoryError};
use storyreel_timeline::Selection;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceId(pub u64);

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq-{}", self.0)
    }
}

/// Images produced by one prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub id: SequenceId,
    pub prompt: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Storyboard {
    sequences: Vec<Sequence>,
    selection: Selection<SequenceId>,
    next_id: u64,
}

impl Storyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, prompt: impl Into<String>, images: Vec<String>) -> SequenceId {
        self.next_id += 1;
        let id = SequenceId(self.next_id);
        let sequence = Sequence {
            id,
            prompt: prompt.into(),
            images,
        };
        info!(sequence = %id, images = sequence.images.len(), "Sequence added to storyboard");
        self.sequences.push(sequence);
        id
    }

    /// Flip selection of a sequence. Returns whether it is now selected.
    pub fn toggle_selection(&mut self, id: SequenceId) -> Result<bool> {
        self.require(id)?;
        Ok(self.selection.toggle(&id))
    }

    pub fn delete(&mut self, id: SequenceId) -> Result<Sequence> {
        let index = self.require(id)?;
        self.selection.deselect(&id);
        info!(sequence = %id, "Sequence deleted");
        Ok(self.sequences.remove(index))
    }

    pub fn is_selected(&self, id: SequenceId) -> bool {
        self.selection.contains(&id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Image URLs to place on the timeline: the selected sequences in
    /// storyboard order, or every sequence when none is selected.
    pub fn images_to_send(&self) -> Vec<String> {
        let send_all = self.selection.is_empty();
        self.sequences
            .iter()
            .filter(|s| send_all || self.selection.contains(&s.id))
            .flat_map(|s| s.images.iter().cloned())
            .collect()
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    fn require(&self, id: SequenceId) -> Result<usize> {
        self.sequences
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoryError::NotFound(format!("sequence {id}")))
    }
}
