//! Dark editor theme: palette, spacing and frame builders.

use egui::{Color32, Rounding, Stroke, Vec2};
use storyreel_editor::NoticeLevel;
use storyreel_timeline::ClipKind;

pub struct Theme;

impl Theme {
    // ── Typography ─────────────────────────────────────────────
    pub const FONT_XS: f32 = 11.0;
    pub const FONT_SM: f32 = 13.0;
    pub const FONT_MD: f32 = 15.0;

    // ── Spacing ────────────────────────────────────────────────
    pub const SPACE_XS: f32 = 4.0;
    pub const SPACE_SM: f32 = 8.0;
    pub const SPACE_MD: f32 = 16.0;

    pub const RADIUS: f32 = 6.0;
    pub const RADIUS_LG: f32 = 10.0;
    pub const STROKE_SUBTLE: f32 = 0.5;
    pub const STROKE_EMPHASIS: f32 = 1.0;

    // ── Backgrounds ────────────────────────────────────────────
    pub const fn bg() -> Color32 {
        Color32::from_rgb(17, 17, 21)
    }
    pub const fn bg1() -> Color32 {
        Color32::from_rgb(26, 26, 32)
    }
    pub const fn bg2() -> Color32 {
        Color32::from_rgb(34, 34, 42)
    }
    pub const fn bg3() -> Color32 {
        Color32::from_rgb(46, 46, 56)
    }
    pub const fn input_bg() -> Color32 {
        Color32::from_rgb(21, 21, 27)
    }

    // ── Text ───────────────────────────────────────────────────
    pub const fn t1() -> Color32 {
        Color32::from_rgba_premultiplied(232, 232, 232, 232)
    }
    pub const fn t2() -> Color32 {
        Color32::from_rgba_premultiplied(150, 150, 150, 150)
    }
    pub const fn t3() -> Color32 {
        Color32::from_rgba_premultiplied(90, 90, 90, 90)
    }

    // ── Accents ────────────────────────────────────────────────
    pub const fn accent() -> Color32 {
        Color32::from_rgb(92, 132, 255)
    }
    pub const fn red() -> Color32 {
        Color32::from_rgb(250, 90, 86)
    }
    pub const fn green() -> Color32 {
        Color32::from_rgb(52, 210, 158)
    }
    pub const fn amber() -> Color32 {
        Color32::from_rgb(252, 184, 52)
    }
    pub const fn purple() -> Color32 {
        Color32::from_rgb(166, 140, 248)
    }

    pub const fn white_04() -> Color32 {
        Color32::from_rgba_premultiplied(10, 10, 10, 10)
    }
    pub const fn white_08() -> Color32 {
        Color32::from_rgba_premultiplied(20, 20, 20, 20)
    }
    pub const fn white_15() -> Color32 {
        Color32::from_rgba_premultiplied(38, 38, 38, 38)
    }

    /// Clip body color per media kind.
    pub const fn kind_color(kind: ClipKind) -> Color32 {
        match kind {
            ClipKind::Image => Self::accent(),
            ClipKind::Video => Self::purple(),
            ClipKind::Audio => Self::green(),
        }
    }

    pub const fn notice_color(level: NoticeLevel) -> Color32 {
        match level {
            NoticeLevel::Info => Self::accent(),
            NoticeLevel::Warning => Self::amber(),
            NoticeLevel::Error => Self::red(),
        }
    }

    /// Return a color with replaced alpha.
    pub const fn with_alpha(c: Color32, a: u8) -> Color32 {
        Color32::from_rgba_premultiplied(
            (c.r() as u16 * a as u16 / 255) as u8,
            (c.g() as u16 * a as u16 / 255) as u8,
            (c.b() as u16 * a as u16 / 255) as u8,
            a,
        )
    }

    // ── Frames ─────────────────────────────────────────────────

    pub fn panel_frame() -> egui::Frame {
        egui::Frame::none()
            .fill(Self::bg1())
            .inner_margin(egui::Margin::same(Self::SPACE_SM))
    }

    pub fn input_frame() -> egui::Frame {
        egui::Frame::none()
            .fill(Self::input_bg())
            .stroke(Stroke::new(Self::STROKE_SUBTLE, Self::white_15()))
            .rounding(Rounding::same(Self::RADIUS))
            .inner_margin(egui::Margin::symmetric(Self::SPACE_SM, 5.0))
    }

    /// Card used for library items and storyboard sequences.
    pub fn card_frame(selected: bool) -> egui::Frame {
        let stroke = if selected {
            Stroke::new(Self::STROKE_EMPHASIS, Self::accent())
        } else {
            Stroke::new(Self::STROKE_SUBTLE, Self::white_08())
        };
        egui::Frame::none()
            .fill(Self::bg2())
            .stroke(stroke)
            .rounding(Rounding::same(Self::RADIUS))
            .inner_margin(egui::Margin::same(Self::SPACE_SM))
    }

    pub fn toast_frame(level: NoticeLevel) -> egui::Frame {
        egui::Frame::none()
            .fill(Self::bg2())
            .stroke(Stroke::new(
                Self::STROKE_EMPHASIS,
                Self::with_alpha(Self::notice_color(level), 160),
            ))
            .rounding(Rounding::same(Self::RADIUS_LG))
            .inner_margin(egui::Margin::symmetric(12.0, Self::SPACE_SM))
    }

    pub fn section_label(ui: &mut egui::Ui, text: &str) {
        ui.label(
            egui::RichText::new(text.to_uppercase())
                .size(Self::FONT_XS)
                .color(Self::t2())
                .strong(),
        );
    }

    // ── Theme application ──────────────────────────────────────

    pub fn apply(ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let visuals = &mut style.visuals;
        *visuals = egui::Visuals::dark();

        visuals.panel_fill = Self::bg1();
        visuals.window_fill = Self::bg2();
        visuals.extreme_bg_color = Self::bg();
        visuals.faint_bg_color = Self::bg2();

        visuals.widgets.noninteractive.bg_fill = Self::bg2();
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, Self::t2());
        visuals.widgets.noninteractive.rounding = Rounding::same(Self::RADIUS);

        visuals.widgets.inactive.bg_fill = Self::bg3();
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Self::t2());
        visuals.widgets.inactive.rounding = Rounding::same(Self::RADIUS);

        visuals.widgets.hovered.bg_fill = Self::bg3();
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Self::t1());
        visuals.widgets.hovered.bg_stroke =
            Stroke::new(Self::STROKE_SUBTLE, Self::with_alpha(Self::accent(), 60));
        visuals.widgets.hovered.rounding = Rounding::same(Self::RADIUS);

        visuals.widgets.active.bg_fill = Self::with_alpha(Self::accent(), 30);
        visuals.widgets.active.fg_stroke = Stroke::new(Self::STROKE_EMPHASIS, Self::accent());
        visuals.widgets.active.rounding = Rounding::same(Self::RADIUS);

        visuals.selection.bg_fill = Self::with_alpha(Self::accent(), 50);
        visuals.selection.stroke = Stroke::new(1.0, Self::accent());
        visuals.window_rounding = Rounding::same(Self::RADIUS_LG);

        style.spacing.item_spacing = Vec2::new(Self::SPACE_SM, 6.0);
        style.interaction.tooltip_delay = 0.4;
        ctx.set_style(style);
    }
}
