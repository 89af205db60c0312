//! Media library panel: import form, search and the item list.

use egui::{self, Rounding, Vec2};
use storyreel_editor::{EditorCommand, MediaLibrary};
use storyreel_timeline::ClipKind;

use crate::theme::Theme;

const KINDS: [ClipKind; 3] = [ClipKind::Image, ClipKind::Video, ClipKind::Audio];

fn kind_icon(kind: ClipKind) -> &'static str {
    match kind {
        ClipKind::Image => "\u{25FB}",
        ClipKind::Video => "\u{25B6}",
        ClipKind::Audio => "\u{266A}",
    }
}

/// Text-field state owned by the app between frames.
#[derive(Debug, Clone)]
pub struct LibraryPanelState {
    pub search: String,
    pub url: String,
    pub kind: ClipKind,
    pub duration: String,
}

impl Default for LibraryPanelState {
    fn default() -> Self {
        Self {
            search: String::new(),
            url: String::new(),
            kind: ClipKind::Image,
            duration: String::new(),
        }
    }
}

impl LibraryPanelState {
    /// Build an import command from the form and reset it. Returns `None`
    /// while the URL is blank.
    pub fn take_import(&mut self) -> Option<EditorCommand> {
        let url = self.url.trim();
        if url.is_empty() {
            return None;
        }
        let intrinsic_duration = match self.kind {
            ClipKind::Image => None,
            ClipKind::Video | ClipKind::Audio => parse_duration(&self.duration),
        };
        let command = EditorCommand::AddMedia {
            url: url.to_string(),
            kind: self.kind,
            intrinsic_duration,
        };
        self.url.clear();
        self.duration.clear();
        Some(command)
    }
}

/// Seconds typed by the user. Anything that is not a positive finite number
/// means "unknown".
pub fn parse_duration(text: &str) -> Option<f64> {
    text.trim()
        .trim_end_matches('s')
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
}

pub fn show_library(
    ui: &mut egui::Ui,
    library: &MediaLibrary,
    panel: &mut LibraryPanelState,
) -> Vec<EditorCommand> {
    let mut commands = Vec::new();
    Theme::section_label(ui, "Media");

    // ── Import ──────────────────────────────────────────────
    Theme::input_frame().show(ui, |ui| {
        ui.add(
            egui::TextEdit::singleline(&mut panel.url)
                .hint_text("Media URL")
                .desired_width(f32::INFINITY)
                .frame(false),
        );
    });
    ui.horizontal(|ui| {
        egui::ComboBox::from_id_salt("import_kind")
            .selected_text(panel.kind.label())
            .width(70.0)
            .show_ui(ui, |ui| {
                for kind in KINDS {
                    ui.selectable_value(&mut panel.kind, kind, kind.label());
                }
            });
        if panel.kind != ClipKind::Image {
            ui.add(
                egui::TextEdit::singleline(&mut panel.duration)
                    .hint_text("secs")
                    .desired_width(44.0),
            );
        }
        let can_import = !panel.url.trim().is_empty();
        if ui.add_enabled(can_import, egui::Button::new("Import")).clicked() {
            commands.extend(panel.take_import());
        }
    });

    ui.add_space(Theme::SPACE_XS);
    Theme::input_frame().show(ui, |ui| {
        ui.add(
            egui::TextEdit::singleline(&mut panel.search)
                .hint_text("Search\u{2026}")
                .desired_width(f32::INFINITY)
                .frame(false),
        );
    });

    // ── Items ───────────────────────────────────────────────
    let query = panel.search.to_ascii_lowercase();
    egui::ScrollArea::vertical()
        .id_salt("library_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if library.is_empty() {
                ui.add_space(Theme::SPACE_MD);
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("No media yet")
                            .size(Theme::FONT_XS)
                            .color(Theme::t3()),
                    );
                });
            }

            for item in library.list() {
                if !query.is_empty() && !item.url.to_ascii_lowercase().contains(&query) {
                    continue;
                }
                Theme::card_frame(false).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let color = Theme::kind_color(item.kind);
                        let (thumb, painter) =
                            ui.allocate_painter(Vec2::new(30.0, 20.0), egui::Sense::hover());
                        painter.rect_filled(
                            thumb.rect,
                            Rounding::same(4.0),
                            Theme::with_alpha(color, 60),
                        );
                        painter.text(
                            thumb.rect.center(),
                            egui::Align2::CENTER_CENTER,
                            kind_icon(item.kind),
                            egui::FontId::proportional(Theme::FONT_XS),
                            color,
                        );

                        ui.vertical(|ui| {
                            ui.spacing_mut().item_spacing = Vec2::new(0.0, 2.0);
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(item.url.as_str())
                                        .size(Theme::FONT_XS)
                                        .color(Theme::t1()),
                                )
                                .truncate(),
                            );
                            let meta = match item.intrinsic_duration {
                                Some(d) => format!("{} \u{00B7} {} \u{00B7} {d:.1}s", item.media, item.kind.label()),
                                None => format!("{} \u{00B7} {}", item.media, item.kind.label()),
                            };
                            ui.label(
                                egui::RichText::new(meta)
                                    .size(Theme::FONT_XS)
                                    .color(Theme::t3())
                                    .family(egui::FontFamily::Monospace),
                            );
                            ui.horizontal(|ui| {
                                if ui.small_button("Add to timeline").clicked() {
                                    commands.push(EditorCommand::AddMediaToTimeline(
                                        item.media.clone(),
                                    ));
                                }
                                if ui
                                    .small_button("Remove")
                                    .on_hover_text("Also deletes its clips")
                                    .clicked()
                                {
                                    commands.push(EditorCommand::RemoveMedia(item.media.clone()));
                                }
                            });
                        });
                    });
                });
            }
        });

    commands
}
