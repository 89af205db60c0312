//! Keyboard shortcuts.

use egui::{Key, Modifiers};
use storyreel_editor::EditorCommand;
use tracing::trace;

/// Shortcut table shown in tooltips: (keys, action).
pub const SHORTCUTS: &[(&str, &str)] = &[
    ("Space", "Play / pause"),
    ("J / L", "Skip back / forward"),
    ("M", "Mute"),
    ("Delete", "Delete selected clips"),
    ("+ / -", "Zoom in / out"),
    ("Esc", "Cancel gesture"),
    ("Cmd+Z / Cmd+Shift+Z", "Undo / redo"),
];

/// The command bound to `key` with `modifiers`, if any.
pub fn command_for_key(key: Key, modifiers: Modifiers) -> Option<EditorCommand> {
    if modifiers.command {
        return match key {
            Key::Z if modifiers.shift => Some(EditorCommand::Redo),
            Key::Z => Some(EditorCommand::Undo),
            _ => None,
        };
    }
    let command = match key {
        Key::Space => EditorCommand::TogglePlay,
        Key::J | Key::ArrowLeft => EditorCommand::SkipBack,
        Key::L | Key::ArrowRight => EditorCommand::SkipForward,
        Key::M => EditorCommand::ToggleMute,
        Key::Delete | Key::Backspace => EditorCommand::DeleteSelected,
        Key::Plus | Key::Equals => EditorCommand::ZoomIn,
        Key::Minus => EditorCommand::ZoomOut,
        Key::Escape => EditorCommand::CancelGesture,
        _ => return None,
    };
    Some(command)
}

/// Commands for keys pressed this frame. Nothing fires while a text field
/// has focus.
pub fn read_shortcuts(ctx: &egui::Context) -> Vec<EditorCommand> {
    if ctx.wants_keyboard_input() {
        return Vec::new();
    }
    ctx.input(|input| {
        input
            .events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } => {
                    let command = command_for_key(*key, *modifiers);
                    if let Some(command) = &command {
                        trace!(?key, ?command, "Shortcut");
                    }
                    command
                }
                _ => None,
            })
            .collect()
    })
}
