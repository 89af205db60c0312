//! Timeline panel: toolbar, ruler, track lanes, clips and playhead.
//!
//! Layout comes from the editor's [`TimelineGeometry`]; this module only
//! offsets it into screen space. Presses in the lanes and on the ruler
//! become pointer commands for the interaction engine; a ruler press always
//! scrubs.

use egui::{self, Color32, Pos2, Rect, Rounding, Stroke, Vec2};
use storyreel_core::{format_timecode, format_timecode_precise};
use storyreel_editor::{EditorCommand, EditorState};
use storyreel_timeline::{ClipKind, PointerPos, TimelineGeometry};

use crate::theme::Theme;

const RULER_HEIGHT: f32 = 22.0;
const TOOLBAR_HEIGHT: f32 = 28.0;
const HEADER_WIDTH: f32 = 44.0;
/// Blank space kept after the last clip so it can be dragged further right.
const TAIL_PADDING: f32 = 200.0;

// ── Coordinate mapping ─────────────────────────────────────────

/// Screen position relative to the top-left of the lane area.
pub fn to_content(lanes: Rect, pos: Pos2) -> PointerPos {
    PointerPos::new((pos.x - lanes.left()) as f64, (pos.y - lanes.top()) as f64)
}

fn lane_rect(geometry: &TimelineGeometry, lanes: Rect, track: usize) -> Rect {
    Rect::from_min_size(
        Pos2::new(lanes.left(), lanes.top() + geometry.track_to_y(track) as f32),
        Vec2::new(lanes.width(), geometry.track_height as f32),
    )
}

fn track_name(track: usize, num_tracks: usize) -> String {
    match track {
        0 => "V1".into(),
        t if t + 1 == num_tracks && num_tracks > 1 => "A1".into(),
        t => format!("V{}", t + 1),
    }
}

// ── Rendering ──────────────────────────────────────────────────

/// Draw the timeline. `gesture_active` is whether the interaction engine is
/// mid-gesture, so pointer moves and releases outside the panel still reach it.
pub fn show_timeline(
    ui: &mut egui::Ui,
    state: &EditorState,
    gesture_active: bool,
) -> Vec<EditorCommand> {
    let mut commands = Vec::new();
    draw_toolbar(ui, state, &mut commands);

    let geometry = &state.geometry;
    let duration = state.timeline.duration();
    let lanes_height = geometry.total_height() as f32;

    ui.horizontal_top(|ui| {
        ui.spacing_mut().item_spacing = Vec2::ZERO;
        ui.vertical(|ui| {
            ui.add_space(RULER_HEIGHT);
            draw_track_headers(ui, geometry);
        });

        egui::ScrollArea::horizontal()
            .id_salt("timeline_scroll")
            .auto_shrink([false, true])
            .show(ui, |ui| {
                let width = (geometry.content_width(duration) as f32 + TAIL_PADDING)
                    .max(ui.available_width());
                let (response, painter) = ui.allocate_painter(
                    Vec2::new(width, RULER_HEIGHT + lanes_height),
                    egui::Sense::click_and_drag(),
                );
                let rect = response.rect;
                let ruler = Rect::from_min_size(rect.min, Vec2::new(width, RULER_HEIGHT));
                let lanes = Rect::from_min_max(Pos2::new(rect.left(), ruler.bottom()), rect.max);

                painter.rect_filled(rect, 0.0, Theme::bg());
                draw_ruler(&painter, ruler, geometry, duration);
                draw_lanes(&painter, lanes, geometry);
                draw_clips(&painter, lanes, state, response.hover_pos());
                draw_playhead(&painter, rect, ruler, geometry, state.playhead.time());

                read_pointer(ui, &response, ruler, lanes, gesture_active, &mut commands);
            });
    });

    commands
}

fn read_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    ruler: Rect,
    lanes: Rect,
    gesture_active: bool,
    commands: &mut Vec<EditorCommand>,
) {
    let (pressed, released, moved, pos) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.delta() != Vec2::ZERO,
            i.pointer.interact_pos(),
        )
    });
    let Some(pos) = pos else {
        return;
    };

    let pressed_here = pressed && response.hovered();
    let point = to_content(lanes, pos);
    if pressed_here && ruler.contains(pos) {
        commands.push(EditorCommand::RulerDown(point));
    } else if pressed_here && lanes.contains(pos) {
        commands.push(EditorCommand::PointerDown(point));
    } else if gesture_active && moved {
        commands.push(EditorCommand::PointerMove(point));
    }
    if released && (gesture_active || pressed_here) {
        commands.push(EditorCommand::PointerUp(point));
    }
}

// ── Sub-components ─────────────────────────────────────────────

fn draw_toolbar(ui: &mut egui::Ui, state: &EditorState, commands: &mut Vec<EditorCommand>) {
    egui::Frame::none()
        .fill(Theme::bg1())
        .stroke(Stroke::new(Theme::STROKE_SUBTLE, Theme::white_08()))
        .inner_margin(egui::Margin::symmetric(Theme::SPACE_SM, 0.0))
        .show(ui, |ui| {
            ui.set_height(TOOLBAR_HEIGHT);
            ui.horizontal_centered(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{} / {}",
                        format_timecode_precise(state.playhead.time()),
                        format_timecode(state.timeline.duration())
                    ))
                    .size(Theme::FONT_XS)
                    .color(Theme::t2())
                    .family(egui::FontFamily::Monospace),
                );
                ui.add_space(Theme::SPACE_MD);

                if ui.small_button("\u{2212}").on_hover_text("Zoom out").clicked() {
                    commands.push(EditorCommand::ZoomOut);
                }
                ui.label(
                    egui::RichText::new(format!("{:.0} px/s", state.geometry.pixels_per_second))
                        .size(Theme::FONT_XS)
                        .color(Theme::t3()),
                );
                if ui.small_button("+").on_hover_text("Zoom in").clicked() {
                    commands.push(EditorCommand::ZoomIn);
                }
                ui.add_space(Theme::SPACE_MD);

                let selected = state.selection.len();
                let delete = ui.add_enabled(
                    selected > 0,
                    egui::Button::new(
                        egui::RichText::new(format!("Delete ({selected})")).size(Theme::FONT_XS),
                    ),
                );
                if delete.clicked() {
                    commands.push(EditorCommand::DeleteSelected);
                }
            });
        });
}

fn draw_track_headers(ui: &mut egui::Ui, geometry: &TimelineGeometry) {
    for track in 0..geometry.num_tracks {
        let (resp, painter) = ui.allocate_painter(
            Vec2::new(HEADER_WIDTH, geometry.track_height as f32),
            egui::Sense::hover(),
        );
        painter.rect_filled(resp.rect, 0.0, Theme::bg1());
        painter.line_segment(
            [resp.rect.left_bottom(), resp.rect.right_bottom()],
            Stroke::new(Theme::STROKE_SUBTLE, Theme::white_08()),
        );
        let color = if track == 0 {
            Theme::accent()
        } else {
            Theme::t2()
        };
        painter.text(
            resp.rect.center(),
            egui::Align2::CENTER_CENTER,
            track_name(track, geometry.num_tracks),
            egui::FontId::proportional(Theme::FONT_XS),
            color,
        );
    }
}

fn draw_ruler(painter: &egui::Painter, rect: Rect, geometry: &TimelineGeometry, duration: f64) {
    painter.rect_filled(rect, 0.0, Theme::bg1());
    painter.line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        Stroke::new(Theme::STROKE_SUBTLE, Theme::white_15()),
    );
    for tick in geometry.ticks(duration) {
        let x = rect.left() + geometry.time_to_x(tick.time) as f32;
        painter.line_segment(
            [Pos2::new(x, rect.bottom() - 8.0), Pos2::new(x, rect.bottom())],
            Stroke::new(Theme::STROKE_EMPHASIS, Theme::white_15()),
        );
        painter.text(
            Pos2::new(x + 3.0, rect.top() + 3.0),
            egui::Align2::LEFT_TOP,
            &tick.label,
            egui::FontId::monospace(Theme::FONT_XS - 1.0),
            Theme::t3(),
        );
    }
}

fn draw_lanes(painter: &egui::Painter, lanes: Rect, geometry: &TimelineGeometry) {
    for track in 0..geometry.num_tracks {
        let lane = lane_rect(geometry, lanes, track);
        let fill = if track % 2 == 0 {
            Theme::white_04()
        } else {
            Color32::TRANSPARENT
        };
        painter.rect_filled(lane, 0.0, fill);
        painter.line_segment(
            [lane.left_bottom(), lane.right_bottom()],
            Stroke::new(Theme::STROKE_SUBTLE, Theme::white_08()),
        );
    }
}

fn draw_clips(painter: &egui::Painter, lanes: Rect, state: &EditorState, hover: Option<Pos2>) {
    for clip in state.timeline.clips() {
        let r = state.geometry.clip_rect(clip);
        let rect = Rect::from_min_size(
            Pos2::new(lanes.left() + r.left as f32, lanes.top() + r.top as f32),
            Vec2::new(r.width as f32, r.height as f32),
        );
        let color = Theme::kind_color(clip.kind());
        let selected = state.selection.contains(clip.id());
        let hovered = hover.is_some_and(|p| rect.contains(p));

        let (fill_alpha, stroke) = if selected {
            (90, Stroke::new(1.5, Theme::t1()))
        } else if hovered {
            (60, Stroke::new(Theme::STROKE_EMPHASIS, color))
        } else {
            (40, Stroke::new(Theme::STROKE_SUBTLE, Theme::with_alpha(color, 140)))
        };
        painter.rect_filled(rect, Rounding::same(Theme::RADIUS), Theme::with_alpha(color, fill_alpha));
        painter.rect_stroke(rect, Rounding::same(Theme::RADIUS), stroke);

        // Resize handles
        if selected || hovered {
            for x in [rect.left() + 2.0, rect.right() - 2.0] {
                painter.line_segment(
                    [Pos2::new(x, rect.top() + 6.0), Pos2::new(x, rect.bottom() - 6.0)],
                    Stroke::new(2.0, Theme::with_alpha(color, 200)),
                );
            }
        }

        if rect.width() > 30.0 {
            let icon = match clip.kind() {
                ClipKind::Image => "\u{25FB}",
                ClipKind::Video => "\u{25B6}",
                ClipKind::Audio => "\u{266A}",
            };
            painter.text(
                Pos2::new(rect.left() + 8.0, rect.top() + 6.0),
                egui::Align2::LEFT_TOP,
                format!("{icon} {}", clip.id()),
                egui::FontId::proportional(Theme::FONT_XS),
                Theme::t1(),
            );
            painter.text(
                Pos2::new(rect.left() + 8.0, rect.bottom() - 6.0),
                egui::Align2::LEFT_BOTTOM,
                format!("{:.1}s", clip.duration()),
                egui::FontId::monospace(Theme::FONT_XS - 1.0),
                Theme::t2(),
            );
        }
    }
}

fn draw_playhead(
    painter: &egui::Painter,
    rect: Rect,
    ruler: Rect,
    geometry: &TimelineGeometry,
    time: f64,
) {
    let x = rect.left() + geometry.time_to_x(time) as f32;
    let tri = egui::epaint::PathShape::convex_polygon(
        vec![
            Pos2::new(x - 5.0, ruler.bottom() - 7.0),
            Pos2::new(x + 5.0, ruler.bottom() - 7.0),
            Pos2::new(x, ruler.bottom()),
        ],
        Theme::red(),
        Stroke::NONE,
    );
    painter.add(tri);
    painter.line_segment(
        [Pos2::new(x, ruler.bottom()), Pos2::new(x, rect.bottom())],
        Stroke::new(1.5, Theme::red()),
    );
}
