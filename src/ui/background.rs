use crate::scroll::ViewportFeedback;
use crate::ui::theme;
use egui::{vec2, Color32, Image, Rect, Ui};

/// Paint the backdrop behind the story: either the catalog's single
/// main background or the active section's image with a cross-fade.
pub fn show_background(ui: &mut Ui, feedback: &ViewportFeedback, main_background: Option<&str>, parallax_max: f32) {
    let now = ui.input(|i| i.time);
    let rect = ui.max_rect();
    ui.painter().rect_filled(rect, 0.0, theme::BG_DARK);

    // Widen the image so the parallax shift never uncovers an edge.
    let shifted = Rect::from_min_size(
        rect.min + vec2(feedback.parallax(), 0.0),
        vec2(rect.width() + parallax_max, rect.height()),
    );

    match main_background {
        Some(url) => {
            paint_image(ui, url, shifted, 1.0);
            ui.painter().rect_filled(rect, 0.0, theme::SCRIM_HEAVY);
        }
        None => {
            let fade = feedback.fade();
            let (previous_alpha, current_alpha) = fade.opacities(now);
            if let Some(previous) = fade.previous(now) {
                paint_image(ui, previous, shifted, previous_alpha);
            }
            if let Some(current) = fade.current() {
                paint_image(ui, current, shifted, current_alpha);
            }
            ui.painter().rect_filled(rect, 0.0, theme::SCRIM);
            if fade.is_fading(now) {
                ui.ctx().request_repaint();
            }
        }
    }
}

fn paint_image(ui: &Ui, url: &str, rect: Rect, alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Image::new(image_uri(url))
        .tint(Color32::from_white_alpha(alpha))
        .show_loading_spinner(false)
        .paint_at(ui, rect);
}

/// Turn a catalog image reference into a URI the image loaders accept.
/// Bare paths are read from disk.
pub fn image_uri(source: &str) -> String {
    if source.contains("://") {
        source.to_string()
    } else {
        format!("file://{}", source)
    }
}
