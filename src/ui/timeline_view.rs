use crate::config::TimelineConfig;
use crate::layout::geometry::{lane_top, marker_width};
use crate::layout::{LayoutModel, SectionLayout};
use crate::model::{Catalog, TimelineEvent, TimelineSection};
use crate::scroll::{Direction, ScrollController, ScrollSample, ScrollUpdate, ViewportMetrics};
use crate::ui::theme;
use chrono::NaiveDate;
use egui::{
    pos2, vec2, Align2, Color32, CursorIcon, Painter, Pos2, Rect, RichText, Rounding, ScrollArea, Sense,
    Stroke, Ui, UiBuilder,
};
use egui_phosphor::regular;
use uuid::Uuid;

const HEADER_HEIGHT: f32 = theme::SECTION_HEADER_HEIGHT;

/// What happened in the timeline strip this frame.
#[derive(Debug, Clone, Default)]
pub struct TimelineOutput {
    /// Event whose marker was clicked.
    pub selected: Option<Uuid>,
    pub update: Option<ScrollUpdate>,
}

/// Render the horizontally scrolling strip of sections.
pub fn show_timeline(
    ui: &mut Ui,
    catalog: &Catalog,
    layout: &LayoutModel,
    controller: &mut ScrollController,
    config: &TimelineConfig,
    highlight: Option<Uuid>,
    today: NaiveDate,
) -> TimelineOutput {
    let mut output = TimelineOutput::default();
    let now = ui.input(|i| i.time);
    let viewport = ui.available_rect_before_wrap();

    let metrics = ViewportMetrics {
        scroll_width: layout.total_width().max(viewport.width()),
        client_width: viewport.width(),
    };
    if controller.attach(metrics) {
        // Open centred on today, without animating or ticking.
        controller.scroll_to_today(&catalog.sections, today, false);
    }
    controller.advance(now);
    handle_pointer(ui, viewport, layout, controller);

    let mut area = ScrollArea::horizontal()
        .id_salt("timeline_strip")
        .auto_shrink([false, false])
        .drag_to_scroll(false)
        .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden);
    if let Some(offset) = controller.take_pending_offset() {
        area = area.horizontal_scroll_offset(offset);
    }
    let scroll = area.show(ui, |ui| {
        draw_sections(ui, catalog, layout, config, highlight, viewport.height())
    });
    output.selected = scroll.inner;

    let sample = ScrollSample {
        position: scroll.state.offset.x,
        scroll_width: scroll.content_size.x,
        client_width: scroll.inner_rect.width(),
    };
    output.update = controller.on_scroll(sample, now);

    draw_center_pointer(ui.painter(), viewport, controller.is_ticking(now));
    if let Some(direction) = nav_buttons(ui, viewport, controller) {
        controller.navigate(direction);
    }

    if controller.is_animating() || controller.is_dragging() || controller.is_ticking(now) {
        ui.ctx().request_repaint();
    }
    output
}

/// Primary-button state for one frame.
#[derive(Debug, Clone, Copy)]
struct PointerInput {
    pressed: bool,
    down: bool,
    released: bool,
    pos: Option<Pos2>,
}

/// Feed raw pointer input to the controller's drag handling.
fn handle_pointer(ui: &Ui, viewport: Rect, layout: &LayoutModel, controller: &mut ScrollController) {
    let input = ui.input(|i| PointerInput {
        pressed: i.pointer.primary_pressed(),
        down: i.pointer.primary_down(),
        released: i.pointer.primary_released(),
        pos: i.pointer.hover_pos(),
    });
    route_pointer(input, viewport, layout, controller);

    if controller.is_dragging() {
        ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
    } else if input.pos.is_some_and(|pos| viewport.contains(pos)) {
        ui.ctx().set_cursor_icon(CursorIcon::Grab);
    }
}

/// A drag ends when the button is released or the pointer leaves the strip.
fn route_pointer(input: PointerInput, viewport: Rect, layout: &LayoutModel, controller: &mut ScrollController) {
    let Some(pos) = input.pos else {
        controller.pointer_leave();
        return;
    };

    if input.pressed && viewport.contains(pos) {
        let nested = over_scrolling_track(pos, viewport, layout, controller.position());
        controller.pointer_down(pos.x, nested);
    } else if input.down && controller.is_dragging() {
        if viewport.contains(pos) {
            controller.pointer_move(pos.x);
        } else {
            controller.pointer_leave();
        }
    }
    if input.released {
        controller.pointer_up();
    }
}

/// Whether `pos` is over the event track of a section that scrolls on its own.
fn over_scrolling_track(pos: Pos2, viewport: Rect, layout: &LayoutModel, offset: f32) -> bool {
    if pos.y < viewport.top() + HEADER_HEIGHT {
        return false;
    }
    let content_x = pos.x - viewport.left() + offset;
    layout
        .section_at(content_x)
        .and_then(|index| layout.section(index))
        .is_some_and(|section| section.scrollable)
}

fn draw_sections(
    ui: &mut Ui,
    catalog: &Catalog,
    layout: &LayoutModel,
    config: &TimelineConfig,
    highlight: Option<Uuid>,
    height: f32,
) -> Option<Uuid> {
    let (rect, _) = ui.allocate_exact_size(vec2(layout.total_width(), height), Sense::hover());
    ui.painter().rect_filled(rect, 0.0, theme::BG_TRACK);

    let total = catalog.sections.len();
    let mut selected = None;
    for (index, (section, geometry)) in catalog.sections.iter().zip(layout.sections()).enumerate() {
        let section_rect = Rect::from_min_size(
            pos2(rect.left() + geometry.left, rect.top()),
            vec2(geometry.width, height),
        );
        if !ui.is_rect_visible(section_rect) {
            continue;
        }

        let header = Rect::from_min_size(section_rect.min, vec2(geometry.width, HEADER_HEIGHT));
        draw_section_header(ui.painter(), header, section, theme::section_color(index, total));

        let track = Rect::from_min_max(pos2(section_rect.left(), header.bottom()), section_rect.max);
        let clicked = if geometry.scrollable {
            ui.allocate_new_ui(UiBuilder::new().max_rect(track), |ui| {
                ScrollArea::vertical()
                    .id_salt(("track", section.id.as_str()))
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let (inner, _) = ui.allocate_exact_size(
                            vec2(track.width(), geometry.track_height.max(track.height())),
                            Sense::hover(),
                        );
                        draw_track(ui, inner, section, geometry, config, highlight)
                    })
                    .inner
            })
            .inner
        } else {
            draw_track(ui, track, section, geometry, config, highlight)
        };
        selected = selected.or(clicked);
    }
    selected
}

fn draw_section_header(painter: &Painter, header: Rect, section: &TimelineSection, color: Color32) {
    painter.rect_filled(header, 0.0, color);
    // Gloss on the upper half
    painter.rect_filled(
        Rect::from_min_max(header.min, pos2(header.right(), header.center().y)),
        0.0,
        Color32::from_white_alpha(24),
    );
    painter.line_segment(
        [header.left_top(), header.left_bottom()],
        Stroke::new(1.0, Color32::from_black_alpha(70)),
    );
    painter.line_segment(
        [header.left_bottom(), header.right_bottom()],
        Stroke::new(1.0, Color32::from_black_alpha(90)),
    );

    let text = theme::text_on(color);
    painter.text(
        header.left_top() + vec2(6.0, 4.0),
        Align2::LEFT_TOP,
        section.start_year.to_string(),
        theme::font_year(),
        text.gamma_multiply(0.8),
    );
    painter.text(
        header.right_top() + vec2(-6.0, 4.0),
        Align2::RIGHT_TOP,
        section.end_year.to_string(),
        theme::font_year(),
        text.gamma_multiply(0.8),
    );

    let clipped = painter.with_clip_rect(header.intersect(painter.clip_rect()));
    clipped.text(
        header.center() + vec2(1.0, 3.0),
        Align2::CENTER_CENTER,
        &section.title,
        theme::font_section_title(),
        Color32::from_black_alpha(110),
    );
    clipped.text(
        header.center() + vec2(0.0, 2.0),
        Align2::CENTER_CENTER,
        &section.title,
        theme::font_section_title(),
        text,
    );
}

fn draw_track(
    ui: &mut Ui,
    track: Rect,
    section: &TimelineSection,
    geometry: &SectionLayout,
    config: &TimelineConfig,
    highlight: Option<Uuid>,
) -> Option<Uuid> {
    let painter = ui.painter_at(track);
    painter.rect_filled(track, 0.0, theme::BG_TRACK);

    for percent in &geometry.ticks {
        let x = track.left() + *percent as f32 / 100.0 * track.width();
        painter.line_segment(
            [pos2(x, track.top()), pos2(x, track.top() + 6.0)],
            Stroke::new(1.0, theme::TICK_LINE),
        );
    }
    painter.line_segment(
        [pos2(track.left(), track.center().y), pos2(track.right(), track.center().y)],
        Stroke::new(1.0, theme::CENTER_LINE),
    );

    let lanes = geometry.display_lanes();
    let mut selected = None;
    for (i, event) in section.events.iter().enumerate() {
        let (Some(position), Some(lane)) = (geometry.positions.get(i), geometry.lanes.lanes.get(i)) else {
            continue;
        };
        let width = marker_width(position, track.width(), event.is_multi_day(), config);
        let left = track.left() + position.left_percent as f32 / 100.0 * track.width();
        let top = track.top() + lane_top(*lane, lanes, track.height(), config.event_marker_height);
        let marker = Rect::from_min_size(
            pos2(left, top + theme::MARKER_GAP / 2.0),
            vec2(width, config.event_marker_height - theme::MARKER_GAP),
        );

        let response = ui.interact(
            marker.intersect(track),
            ui.make_persistent_id(("event", event.id)),
            Sense::click(),
        );
        draw_marker(&painter, marker, event, response.hovered(), highlight == Some(event.id));
        if response.on_hover_text(event.title.as_str()).clicked() {
            selected = Some(event.id);
        }
    }
    selected
}

fn draw_marker(painter: &Painter, rect: Rect, event: &TimelineEvent, hovered: bool, highlighted: bool) {
    let rounding = Rounding::same(theme::MARKER_ROUNDING);

    // Shadow
    painter.rect_filled(rect.translate(vec2(0.0, 2.0)), rounding, Color32::from_black_alpha(70));
    painter.rect_filled(rect, rounding, theme::MARKER_BOTTOM);
    painter.rect_filled(
        Rect::from_min_max(rect.min, pos2(rect.right(), rect.center().y)),
        Rounding {
            nw: theme::MARKER_ROUNDING,
            ne: theme::MARKER_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        theme::MARKER_TOP,
    );

    let border = if highlighted {
        theme::ACCENT
    } else if hovered {
        theme::TEXT_SECONDARY
    } else {
        theme::MARKER_BORDER
    };
    painter.rect_stroke(rect, rounding, Stroke::new(if highlighted { 2.0 } else { 1.0 }, border));

    let label = format!("{} {}", regular::HOURGLASS, event.short_label());
    let galley = painter.layout_no_wrap(label, theme::font_marker(), theme::TEXT_PRIMARY);
    let text_pos = pos2(rect.left() + 8.0, rect.center().y - galley.size().y / 2.0);
    painter
        .with_clip_rect(rect.shrink(2.0).intersect(painter.clip_rect()))
        .galley(text_pos, galley, theme::TEXT_PRIMARY);
}

/// Triangle at the viewport centre; it dips while a tick pulse is showing.
fn draw_center_pointer(painter: &Painter, viewport: Rect, ticking: bool) {
    let size = theme::POINTER_SIZE;
    let dip = if ticking { 4.0 } else { 0.0 };
    let x = viewport.center().x;
    let top = viewport.top() + HEADER_HEIGHT + dip;
    painter.add(egui::Shape::convex_polygon(
        vec![pos2(x - size, top), pos2(x + size, top), pos2(x, top + size * 1.4)],
        theme::ACCENT,
        Stroke::new(1.0, theme::ACCENT_DIM),
    ));
}

fn nav_buttons(ui: &mut Ui, viewport: Rect, controller: &ScrollController) -> Option<Direction> {
    let size = vec2(theme::NAV_BUTTON_SIZE, theme::NAV_BUTTON_SIZE);
    let y = viewport.top() + HEADER_HEIGHT + (viewport.height() - HEADER_HEIGHT) / 2.0;
    let inset = theme::NAV_BUTTON_SIZE / 2.0 + 8.0;
    let buttons = [
        (
            pos2(viewport.left() + inset, y),
            Direction::Left,
            regular::CARET_LEFT,
            controller.can_scroll_left(),
        ),
        (
            pos2(viewport.right() - inset, y),
            Direction::Right,
            regular::CARET_RIGHT,
            controller.can_scroll_right(),
        ),
    ];

    let mut clicked = None;
    for (center, direction, icon, enabled) in buttons {
        let rect = Rect::from_center_size(center, size);
        let button = egui::Button::new(RichText::new(icon).size(22.0).color(Color32::WHITE))
            .fill(Color32::from_black_alpha(170))
            .rounding(Rounding::same(theme::NAV_BUTTON_SIZE / 2.0))
            .min_size(size);
        let response = ui
            .allocate_new_ui(UiBuilder::new().max_rect(rect), |ui| ui.add_enabled(enabled, button))
            .inner;
        if response.clicked() {
            clicked = Some(direction);
        }
    }
    clicked
}
