use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(8, 8, 10);
pub const BG_PANEL: Color32 = Color32::from_rgb(18, 18, 22);
pub const BG_TRACK: Color32 = Color32::from_rgb(0, 0, 0);
pub const BG_CARD: Color32 = Color32::from_rgb(28, 28, 34);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(170, 170, 180);
pub const TEXT_DIM: Color32 = Color32::from_rgb(110, 110, 120);

pub const ACCENT: Color32 = Color32::from_rgb(250, 204, 21);
pub const ACCENT_DIM: Color32 = Color32::from_rgb(161, 98, 7);
pub const CENTER_LINE: Color32 = Color32::from_rgba_premultiplied(70, 70, 70, 110);
pub const TICK_LINE: Color32 = Color32::from_rgb(64, 64, 70);

pub const MARKER_TOP: Color32 = Color32::from_rgb(52, 52, 58);
pub const MARKER_BOTTOM: Color32 = Color32::from_rgb(34, 34, 40);
pub const MARKER_BORDER: Color32 = Color32::from_rgb(82, 82, 91);

pub const SCRIM: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 128);
pub const SCRIM_HEAVY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 204);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const SECTION_HEADER_HEIGHT: f32 = 44.0;
pub const MARKER_ROUNDING: f32 = 6.0;
pub const MARKER_GAP: f32 = 4.0;
pub const NAV_BUTTON_SIZE: f32 = 44.0;
pub const POINTER_SIZE: f32 = 10.0;
pub const CARD_WIDTH: f32 = 560.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_section_title() -> FontId {
    FontId::proportional(16.0)
}

pub fn font_year() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_marker() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

// ── Section colours ──────────────────────────────────────────────────────────

/// Header colour for section `index` of `total`, spread evenly around the hue wheel.
pub fn section_color(index: usize, total: usize) -> Color32 {
    let hue = if total == 0 {
        0.0
    } else {
        index as f32 / total as f32 * 360.0
    };
    hsl(hue, 0.7, 0.5)
}

/// Black or white, whichever reads better on `background`.
pub fn text_on(background: Color32) -> Color32 {
    let [r, g, b, _] = background.to_array();
    let luminance = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    if luminance > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

fn hsl(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = (hue.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(channel(r), channel(g), channel(b))
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_CARD;
    visuals.extreme_bg_color = BG_DARK;

    visuals.widgets.noninteractive.bg_fill = BG_PANEL;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.noninteractive.rounding = Rounding::same(4.0);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(38, 38, 44);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(52, 52, 60);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);

    visuals.widgets.active.bg_fill = Color32::from_rgb(60, 60, 70);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.bg_fill = ACCENT_DIM;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    visuals.window_rounding = Rounding::same(10.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_colors_walk_the_hue_wheel() {
        // Hue 0 at 70% saturation, 50% lightness.
        assert_eq!(section_color(0, 5), Color32::from_rgb(217, 38, 38));
        assert_ne!(section_color(1, 5), section_color(2, 5));
        assert_eq!(section_color(0, 0), section_color(0, 1));
    }

    #[test]
    fn text_contrasts_with_background() {
        assert_eq!(text_on(Color32::from_rgb(250, 240, 80)), Color32::BLACK);
        assert_eq!(text_on(Color32::from_rgb(20, 30, 120)), Color32::WHITE);
    }
}
