//! Viewer: the frame under the playhead plus the transport bar.

use egui::{self, Pos2, Rect, Rounding, Stroke, Vec2};
use storyreel_core::{format_timecode, format_timecode_precise};
use storyreel_editor::{Editor, EditorCommand, EditorState, MediaItem};
use storyreel_playback::{MediaPlayer, PlaybackStatus};
use storyreel_timeline::ClipId;

use crate::theme::Theme;
use crate::widgets;

const TRANSPORT_HEIGHT: f32 = 44.0;

/// Library item behind the clip the player currently shows.
pub fn active_item<'a>(state: &'a EditorState, active_clip: Option<&ClipId>) -> Option<&'a MediaItem> {
    let clip = state.timeline.get(active_clip?)?;
    state.library.get(clip.media_ref())
}

/// Short status text for the viewer overlay.
pub fn status_caption(status: &PlaybackStatus) -> Option<String> {
    match status {
        PlaybackStatus::Playing | PlaybackStatus::Paused => None,
        PlaybackStatus::Stopped => Some("End of timeline".into()),
        PlaybackStatus::LoadFailed { clip_id, reason } => {
            Some(format!("{clip_id} could not be loaded: {reason}"))
        }
    }
}

/// Button icon, hover hint and viewport command that flip fullscreen.
pub fn fullscreen_toggle(is_fullscreen: bool) -> (&'static str, &'static str, egui::ViewportCommand) {
    let (icon, hint) = if is_fullscreen {
        ("\u{2199}", "Exit fullscreen")
    } else {
        ("\u{26F6}", "Fullscreen")
    };
    (icon, hint, egui::ViewportCommand::Fullscreen(!is_fullscreen))
}

pub fn show_viewer<P: MediaPlayer>(
    ui: &mut egui::Ui,
    editor: &Editor<P>,
    time: f64,
) -> Vec<EditorCommand> {
    let mut commands = Vec::new();
    let state = editor.state();
    let playback = editor.playback();

    let available = ui.available_size();
    let screen_height = (available.y - TRANSPORT_HEIGHT).max(60.0);
    let (resp, painter) =
        ui.allocate_painter(Vec2::new(available.x, screen_height), egui::Sense::click());
    let rect = resp.rect;
    painter.rect_filled(rect, 0.0, Theme::bg());

    // 16:9 frame centered in the panel
    let frame_w = rect.width().min(rect.height() * 16.0 / 9.0) * 0.92;
    let frame = Rect::from_center_size(rect.center(), Vec2::new(frame_w, frame_w * 9.0 / 16.0));
    painter.rect_stroke(
        frame,
        Rounding::same(Theme::RADIUS),
        Stroke::new(Theme::STROKE_SUBTLE, Theme::white_15()),
    );

    match active_item(state, playback.active().map(|a| &a.id)) {
        Some(item) => {
            let color = Theme::kind_color(item.kind);
            // Slow drift so a playing still is visibly alive.
            let drift = if playback.is_playing() {
                (time * 0.8).sin() as f32 * 6.0
            } else {
                0.0
            };
            painter.rect_filled(
                frame.shrink(2.0).translate(Vec2::new(drift, 0.0)),
                Rounding::same(Theme::RADIUS),
                Theme::with_alpha(color, 28),
            );
            painter.text(
                frame.center() - Vec2::new(0.0, 12.0),
                egui::Align2::CENTER_CENTER,
                item.kind.label().to_uppercase(),
                egui::FontId::proportional(Theme::FONT_MD),
                Theme::with_alpha(color, 220),
            );
            painter.text(
                frame.center() + Vec2::new(0.0, 12.0),
                egui::Align2::CENTER_CENTER,
                &item.url,
                egui::FontId::monospace(Theme::FONT_XS),
                Theme::t2(),
            );
        }
        None => {
            painter.text(
                frame.center(),
                egui::Align2::CENTER_CENTER,
                if state.timeline.is_empty() {
                    "Timeline is empty"
                } else {
                    "No clip under the playhead"
                },
                egui::FontId::proportional(Theme::FONT_SM),
                Theme::t3(),
            );
        }
    }

    if let Some(caption) = status_caption(playback.status()) {
        let color = match playback.status() {
            PlaybackStatus::LoadFailed { .. } => Theme::red(),
            _ => Theme::t2(),
        };
        painter.text(
            Pos2::new(frame.center().x, frame.bottom() - 14.0),
            egui::Align2::CENTER_BOTTOM,
            caption,
            egui::FontId::proportional(Theme::FONT_XS),
            color,
        );
    }

    if resp.double_clicked() {
        commands.push(EditorCommand::TogglePlay);
    }

    draw_transport(ui, editor, &mut commands);
    commands
}

fn draw_transport<P: MediaPlayer>(
    ui: &mut egui::Ui,
    editor: &Editor<P>,
    commands: &mut Vec<EditorCommand>,
) {
    let state = editor.state();
    let playback = editor.playback();

    ui.horizontal_centered(|ui| {
        ui.set_height(TRANSPORT_HEIGHT);
        ui.spacing_mut().item_spacing = Vec2::new(Theme::SPACE_SM, 0.0);

        let skip = state.config.skip_seconds;
        if ui
            .button("\u{23EA}")
            .on_hover_text(format!("Back {skip:.0}s"))
            .clicked()
        {
            commands.push(EditorCommand::SkipBack);
        }
        let (icon, hint) = if playback.is_playing() {
            ("\u{23F8}", "Pause")
        } else {
            ("\u{25B6}", "Play")
        };
        if ui.button(icon).on_hover_text(hint).clicked() {
            commands.push(EditorCommand::TogglePlay);
        }
        if ui
            .button("\u{23E9}")
            .on_hover_text(format!("Forward {skip:.0}s"))
            .clicked()
        {
            commands.push(EditorCommand::SkipForward);
        }

        ui.label(
            egui::RichText::new(format!(
                "{} / {}",
                format_timecode_precise(state.playhead.time()),
                format_timecode(state.timeline.duration())
            ))
            .size(Theme::FONT_SM)
            .color(Theme::t1())
            .family(egui::FontFamily::Monospace),
        );

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            // Window state, not editor state, so it goes straight to the viewport.
            let is_fullscreen = ui.ctx().input(|i| i.viewport().fullscreen.unwrap_or(false));
            let (icon, hint, command) = fullscreen_toggle(is_fullscreen);
            if ui.button(icon).on_hover_text(hint).clicked() {
                ui.ctx().send_viewport_cmd(command);
            }
            if let Some(volume) = widgets::unit_slider(ui, playback.volume(), 90.0) {
                commands.push(EditorCommand::SetVolume(volume));
            }
            let mute_icon = if playback.is_muted() {
                "\u{1F507}"
            } else {
                "\u{1F50A}"
            };
            if ui.button(mute_icon).on_hover_text("Mute").clicked() {
                commands.push(EditorCommand::ToggleMute);
            }
            ui.add_space(Theme::SPACE_MD);
            ui.label(egui::RichText::new("Loop").size(Theme::FONT_XS).color(Theme::t2()));
            if widgets::toggle_switch(ui, playback.loop_playback()) {
                commands.push(EditorCommand::SetLoop(!playback.loop_playback()));
            }
        });
    });
}
