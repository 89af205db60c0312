//! Prompt input and generated storyboard sequences.

use egui::{self, Rounding, Vec2};
use storyreel_editor::{EditorCommand, EditorState, Storyboard};

use crate::theme::Theme;

/// Caption of the send button for the current selection.
pub fn send_label(storyboard: &Storyboard) -> String {
    let selected = storyboard
        .sequences()
        .iter()
        .filter(|s| storyboard.is_selected(s.id))
        .count();
    match selected {
        0 => "Send all to timeline".into(),
        1 => "Send 1 sequence to timeline".into(),
        n => format!("Send {n} sequences to timeline"),
    }
}

pub fn show_storyboard(
    ui: &mut egui::Ui,
    state: &EditorState,
    can_generate: bool,
) -> Vec<EditorCommand> {
    let mut commands = Vec::new();
    Theme::section_label(ui, "Prompt");

    let mut prompt = state.prompt.clone();
    let edit = Theme::input_frame()
        .show(ui, |ui| {
            ui.add(
                egui::TextEdit::multiline(&mut prompt)
                    .hint_text("Describe the shot\u{2026}")
                    .desired_rows(3)
                    .desired_width(f32::INFINITY)
                    .frame(false),
            )
        })
        .inner;
    if edit.changed() {
        commands.push(EditorCommand::SetPrompt(prompt.clone()));
    }

    ui.horizontal(|ui| {
        let ready = can_generate && !state.is_generating() && !prompt.trim().is_empty();
        let button = ui.add_enabled(ready, egui::Button::new("Generate"));
        let button = if can_generate {
            button
        } else {
            button.on_disabled_hover_text(format!(
                "Set {} to enable generation",
                state.config.generation.api_key_env
            ))
        };
        if button.clicked() {
            commands.push(EditorCommand::Generate);
        }
        if state.is_generating() {
            ui.spinner();
            ui.label(
                egui::RichText::new("Generating\u{2026}")
                    .size(Theme::FONT_XS)
                    .color(Theme::t2()),
            );
        }
    });

    ui.add_space(Theme::SPACE_SM);
    Theme::section_label(ui, "Storyboard");

    let storyboard = &state.storyboard;
    if storyboard.is_empty() {
        ui.label(
            egui::RichText::new("Generated sequences appear here")
                .size(Theme::FONT_XS)
                .color(Theme::t3()),
        );
        return commands;
    }

    if ui.button(send_label(storyboard)).clicked() {
        commands.push(EditorCommand::SendToTimeline);
    }

    egui::ScrollArea::vertical()
        .id_salt("storyboard_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for sequence in storyboard.sequences() {
                let selected = storyboard.is_selected(sequence.id);
                Theme::card_frame(selected).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let mut checked = selected;
                        if ui.checkbox(&mut checked, "").changed() {
                            commands.push(EditorCommand::ToggleSequence(sequence.id));
                        }
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(sequence.prompt.as_str())
                                    .size(Theme::FONT_SM)
                                    .color(Theme::t1()),
                            )
                            .truncate(),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("\u{00D7}").on_hover_text("Delete").clicked() {
                                commands.push(EditorCommand::DeleteSequence(sequence.id));
                            }
                        });
                    });

                    // One swatch per image
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing = Vec2::splat(Theme::SPACE_XS);
                        for url in &sequence.images {
                            let (resp, painter) =
                                ui.allocate_painter(Vec2::new(32.0, 18.0), egui::Sense::hover());
                            painter.rect_filled(
                                resp.rect,
                                Rounding::same(3.0),
                                Theme::with_alpha(Theme::accent(), 50),
                            );
                            resp.on_hover_text(url.as_str());
                        }
                    });
                    ui.label(
                        egui::RichText::new(format!(
                            "{} \u{00B7} {} images",
                            sequence.id,
                            sequence.images.len()
                        ))
                        .size(Theme::FONT_XS)
                        .color(Theme::t3()),
                    );
                });
            }
        });

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_label_follows_selection() {
        let mut board = Storyboard::new();
        let a = board.add("dawn", vec!["a0".into()]);
        let b = board.add("dusk", vec!["b0".into()]);
        assert_eq!(send_label(&board), "Send all to timeline");

        board.toggle_selection(a).unwrap();
        assert_eq!(send_label(&board), "Send 1 sequence to timeline");
        board.toggle_selection(b).unwrap();
        assert_eq!(send_label(&board), "Send 2 sequences to timeline");
    }
}
