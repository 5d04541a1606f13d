use crate::model::{Media, MediaKind, TimelineEvent};
use crate::ui::{background::image_uri, theme};
use egui::text::{LayoutJob, TextFormat};
use egui::{Color32, Context, RichText, Window};
use egui_phosphor::regular;
use uuid::Uuid;

/// A run of description text with one style.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

/// Split the light description markup into styled runs.
///
/// Understands `<br>` (any spelling), `<p>`, `<strong>` and `<b>`;
/// other tags are dropped and a handful of entities are decoded.
pub fn parse_markup(source: &str) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    let mut bold = 0usize;
    let mut text = String::new();
    let mut rest = source;

    let flush = |spans: &mut Vec<Span>, text: &mut String, bold: bool| {
        if text.is_empty() {
            return;
        }
        let chunk = decode_entities(text);
        text.clear();
        match spans.last_mut() {
            Some(last) if last.bold == bold => last.text.push_str(&chunk),
            _ => spans.push(Span { text: chunk, bold }),
        }
    };

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            // Unterminated tag: keep it as text.
            text.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let tag = rest[open + 1..open + close].trim().to_ascii_lowercase();
        rest = &rest[open + close + 1..];

        let name = tag.trim_end_matches('/').trim();
        match name {
            "br" => text.push('\n'),
            "/p" => text.push_str("\n\n"),
            "strong" | "b" => {
                flush(&mut spans, &mut text, bold > 0);
                bold += 1;
            }
            "/strong" | "/b" => {
                flush(&mut spans, &mut text, bold > 0);
                bold = bold.saturating_sub(1);
            }
            _ => {}
        }
    }
    text.push_str(rest);
    flush(&mut spans, &mut text, bold > 0);

    if let Some(last) = spans.last_mut() {
        let trimmed = last.text.trim_end().len();
        last.text.truncate(trimmed);
        if last.text.is_empty() {
            spans.pop();
        }
    }
    spans
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Which media item of an event is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaCarousel {
    index: usize,
}

impl MediaCarousel {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self, len: usize) {
        if self.index + 1 < len {
            self.index += 1;
        }
    }

    pub fn previous(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Keep the index valid if the list shrank.
    pub fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.index + 1 < len
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }
}

/// The open detail card.
#[derive(Debug, Clone)]
pub struct EventCard {
    pub event_id: Uuid,
    pub carousel: MediaCarousel,
}

impl EventCard {
    pub fn new(event_id: Uuid) -> Self {
        Self {
            event_id,
            carousel: MediaCarousel::default(),
        }
    }
}

/// Render the card for `event`. Returns false once the card should close.
pub fn show_event_card(card: &mut EventCard, event: &TimelineEvent, ctx: &Context) -> bool {
    let mut open = true;

    // Dim everything behind the card; clicking the dimmed area closes it.
    let screen = ctx.screen_rect();
    egui::Area::new(egui::Id::new("event_card_backdrop"))
        .fixed_pos(screen.min)
        .order(egui::Order::Middle)
        .show(ctx, |ui| {
            let response = ui.allocate_rect(screen, egui::Sense::click());
            ui.painter().rect_filled(screen, 0.0, theme::SCRIM_HEAVY);
            if response.clicked() {
                open = false;
            }
        });

    Window::new(RichText::new(&event.title).strong().size(18.0))
        .id(egui::Id::new("event_card"))
        .resizable(false)
        .collapsible(false)
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::CARD_WIDTH, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(
                RichText::new(format!("{} {}", regular::CALENDAR_BLANK, event.long_label()))
                    .color(theme::ACCENT),
            );
            ui.add_space(6.0);

            if !event.media.is_empty() {
                card.carousel.clamp(event.media.len());
                show_media(ui, &event.media, &mut card.carousel);
                ui.add_space(8.0);
            }

            egui::ScrollArea::vertical()
                .max_height(260.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    ui.label(description_job(&parse_markup(&event.description), ui.available_width()));
                });
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        open = false;
    }
    open
}

fn description_job(spans: &[Span], wrap_width: f32) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.wrap.max_width = wrap_width;
    for span in spans {
        let format = TextFormat {
            font_id: egui::FontId::proportional(14.0),
            color: if span.bold {
                Color32::WHITE
            } else {
                theme::TEXT_SECONDARY
            },
            ..Default::default()
        };
        job.append(&span.text, 0.0, format);
    }
    job
}

fn show_media(ui: &mut egui::Ui, media: &[Media], carousel: &mut MediaCarousel) {
    let Some(item) = media.get(carousel.index()) else {
        return;
    };

    ui.vertical_centered(|ui| match item.kind {
        MediaKind::Image => {
            let response = ui.add(
                egui::Image::new(image_uri(&item.url))
                    .max_height(300.0)
                    .max_width(theme::CARD_WIDTH - 24.0)
                    .maintain_aspect_ratio(true)
                    .rounding(egui::Rounding::same(6.0))
                    .sense(egui::Sense::click()),
            );
            if response.on_hover_text("Open in browser").clicked() {
                open_external(&item.url);
            }
        }
        MediaKind::Video => {
            // No in-app player: hand videos to the system.
            let button = egui::Button::new(
                RichText::new(format!("{}  Play video", regular::PLAY_CIRCLE)).size(16.0),
            )
            .min_size(egui::vec2(theme::CARD_WIDTH - 24.0, 160.0))
            .fill(theme::BG_DARK);
            if ui.add(button).clicked() {
                open_external(&item.url);
            }
        }
    });

    if media.len() > 1 {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(carousel.has_previous(), egui::Button::new(regular::CARET_LEFT))
                .clicked()
            {
                carousel.previous();
            }
            ui.label(
                RichText::new(format!("{} / {}", carousel.index() + 1, media.len()))
                    .color(theme::TEXT_DIM),
            );
            if ui
                .add_enabled(carousel.has_next(media.len()), egui::Button::new(regular::CARET_RIGHT))
                .clicked()
            {
                carousel.next(media.len());
            }
        });
    }
}

fn open_external(url: &str) {
    if let Err(e) = open::that(url) {
        log::warn!("could not open {}: {}", url, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Span {
        Span {
            text: text.to_string(),
            bold: false,
        }
    }

    fn bold(text: &str) -> Span {
        Span {
            text: text.to_string(),
            bold: true,
        }
    }

    #[test]
    fn line_breaks_in_every_spelling() {
        assert_eq!(parse_markup("a<br>b<br/>c<BR />d"), vec![plain("a\nb\nc\nd")]);
    }

    #[test]
    fn strong_and_b_make_bold_runs() {
        assert_eq!(
            parse_markup("from <strong>four</strong> countries and <b>two</b>"),
            vec![
                plain("from "),
                bold("four"),
                plain(" countries and "),
                bold("two"),
            ]
        );
    }

    #[test]
    fn unknown_tags_drop_and_entities_decode() {
        assert_eq!(
            parse_markup("<em>Fish</em> &amp; chips &lt;3<p>"),
            vec![plain("Fish & chips <3")]
        );
        assert_eq!(parse_markup("x </p>"), vec![plain("x")]);
    }

    #[test]
    fn unterminated_tag_stays_text() {
        assert_eq!(parse_markup("a < b"), vec![plain("a < b")]);
        assert!(parse_markup("").is_empty());
    }

    #[test]
    fn carousel_stays_in_bounds() {
        let mut carousel = MediaCarousel::default();
        carousel.previous();
        assert_eq!(carousel.index(), 0);
        assert!(!carousel.has_previous());

        carousel.next(2);
        assert_eq!(carousel.index(), 1);
        assert!(!carousel.has_next(2));
        carousel.next(2);
        assert_eq!(carousel.index(), 1);

        carousel.clamp(1);
        assert_eq!(carousel.index(), 0);
        carousel.clamp(0);
        assert_eq!(carousel.index(), 0);
    }
}
