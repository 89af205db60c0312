//! Notice toasts in the bottom-right corner.

use egui::{self, Align2, Vec2};
use storyreel_editor::{EditorCommand, NoticeBoard, NoticeLevel};

use crate::theme::Theme;

/// At most this many toasts are shown; the newest win.
const MAX_VISIBLE: usize = 4;

fn level_icon(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "\u{2139}",
        NoticeLevel::Warning => "\u{26A0}",
        NoticeLevel::Error => "\u{2716}",
    }
}

pub fn show_notices(ctx: &egui::Context, notices: &NoticeBoard) -> Vec<EditorCommand> {
    let mut commands = Vec::new();
    if notices.is_empty() {
        return commands;
    }

    let skip = notices.len().saturating_sub(MAX_VISIBLE);
    egui::Area::new(egui::Id::new("notice_toasts"))
        .anchor(Align2::RIGHT_BOTTOM, Vec2::new(-Theme::SPACE_MD, -Theme::SPACE_MD))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing = Vec2::new(0.0, Theme::SPACE_XS);
            for notice in notices.iter().skip(skip) {
                Theme::toast_frame(notice.level).show(ui, |ui| {
                    ui.set_max_width(320.0);
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(level_icon(notice.level))
                                .color(Theme::notice_color(notice.level)),
                        );
                        ui.label(
                            egui::RichText::new(notice.message.as_str())
                                .size(Theme::FONT_SM)
                                .color(Theme::t1()),
                        );
                        if ui.small_button("\u{00D7}").clicked() {
                            commands.push(EditorCommand::DismissNotice(notice.id));
                        }
                    });
                });
            }
        });

    commands
}
