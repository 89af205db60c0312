//! Selection state.

use serde::{Deserialize, Serialize};

use crate::clip::ClipId;

/// Ordered set of selected ids, oldest selection first.
///
/// Defaults to clip ids; the storyboard reuses it for sequence ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection<T = ClipId> {
    selected: Vec<T>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self {
            selected: Vec::new(),
        }
    }
}

impl<T: PartialEq + Clone> Selection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id`, keeping earlier selections.
    pub fn select(&mut self, id: &T) {
        if !self.contains(id) {
            self.selected.push(id.clone());
        }
    }

    pub fn deselect(&mut self, id: &T) {
        self.selected.retain(|s| s != id);
    }

    /// Flip membership of `id`. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &T) -> bool {
        if self.contains(id) {
            self.deselect(id);
            false
        } else {
            self.selected.push(id.clone());
            true
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, id: &T) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Drop ids that no longer exist.
    pub fn retain(&mut self, mut exists: impl FnMut(&T) -> bool) {
        self.selected.retain(|id| exists(id));
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.selected.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
