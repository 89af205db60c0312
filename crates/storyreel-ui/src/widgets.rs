//! Small painted widgets shared by the panels.

use egui::{self, Pos2, Rect, Rounding, Stroke, Vec2};

use crate::theme::Theme;

/// Pill toggle. Returns `true` when clicked.
pub fn toggle_switch(ui: &mut egui::Ui, on: bool) -> bool {
    let (resp, painter) = ui.allocate_painter(Vec2::new(30.0, 16.0), egui::Sense::click());
    let rect = resp.rect;

    let pill = Rounding::same(rect.height() / 2.0);
    let fill = if on {
        Theme::with_alpha(Theme::accent(), 90)
    } else {
        Theme::white_08()
    };
    painter.rect_filled(rect, pill, fill);
    painter.rect_stroke(rect, pill, Stroke::new(Theme::STROKE_SUBTLE, Theme::white_15()));

    let radius = 6.0;
    let t = ui
        .ctx()
        .animate_bool_with_time(resp.id.with("toggle_anim"), on, 0.15);
    let x = egui::lerp(rect.left() + radius + 2.0..=rect.right() - radius - 2.0, t);
    let thumb = if on { Theme::accent() } else { Theme::t2() };
    painter.circle_filled(Pos2::new(x, rect.center().y), radius, thumb);

    resp.clicked()
}

/// Slider fraction for a pointer at `x` over a bar starting at `left`.
pub fn fraction_at(x: f32, left: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return 0.0;
    }
    ((x - left) / width).clamp(0.0, 1.0)
}

/// Horizontal `[0, 1]` slider. Returns the new value while it is dragged.
pub fn unit_slider(ui: &mut egui::Ui, value: f32, width: f32) -> Option<f32> {
    let (resp, painter) =
        ui.allocate_painter(Vec2::new(width, 18.0), egui::Sense::click_and_drag());
    let bar = Rect::from_center_size(resp.rect.center(), Vec2::new(width - 10.0, 4.0));

    painter.rect_filled(bar, Rounding::same(2.0), Theme::white_08());
    let filled = bar.width() * value.clamp(0.0, 1.0);
    if filled > 0.5 {
        let fill = Rect::from_min_size(bar.min, Vec2::new(filled, bar.height()));
        painter.rect_filled(fill, Rounding::same(2.0), Theme::accent());
    }
    painter.circle_filled(
        Pos2::new(bar.left() + filled, bar.center().y),
        5.0,
        Theme::t1(),
    );

    if resp.dragged() || resp.clicked() {
        let pos = resp.interact_pointer_pos()?;
        return Some(fraction_at(pos.x, bar.left(), bar.width()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_is_clamped() {
        assert_eq!(fraction_at(50.0, 0.0, 100.0), 0.5);
        assert_eq!(fraction_at(-20.0, 0.0, 100.0), 0.0);
        assert_eq!(fraction_at(500.0, 0.0, 100.0), 1.0);
        assert_eq!(fraction_at(10.0, 0.0, 0.0), 0.0);
    }
}
