use crate::config::TimelineConfig;
use crate::model::date::{day_number, year_start, DAYS_PER_YEAR};
use crate::model::{TimelineEvent, TimelineSection};

/// Padding added below the stacked lanes of a track.
pub const TRACK_PADDING: f32 = 20.0;

/// Shortest duration given to an event so a point still has width.
const MIN_EVENT_DAYS: f64 = 0.5;

/// Placement of an event inside its section, in percent of the section width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EventPosition {
    pub left_percent: f64,
    pub width_percent: f64,
}

/// Width of a section on screen.
pub fn section_width(section: &TimelineSection, pixels_per_year: f32) -> f32 {
    section.year_count().max(0) as f32 * pixels_per_year
}

/// Length of a section on the day-number scale.
pub fn section_duration(section: &TimelineSection) -> f64 {
    section.year_count() as f64 * DAYS_PER_YEAR
}

/// Where an event sits inside a section.
///
/// Out-of-range events are not corrected: they come back with offsets
/// below 0% or above 100%.
pub fn event_position(event: &TimelineEvent, section: &TimelineSection) -> EventPosition {
    let duration = section_duration(section);
    if duration <= 0.0 {
        return EventPosition::default();
    }

    let span = event.span();
    let left_percent = (span.start - year_start(section.start_year)) / duration * 100.0;
    let width_percent = span.duration().max(MIN_EVENT_DAYS) / duration * 100.0;

    EventPosition {
        left_percent,
        width_percent,
    }
}

/// Width of an event marker with the clickable minimum applied.
pub fn marker_width(
    position: &EventPosition,
    section_width_px: f32,
    multi_day: bool,
    config: &TimelineConfig,
) -> f32 {
    let floor = if multi_day {
        config.min_range_width
    } else {
        config.min_point_width
    };
    (position.width_percent as f32 / 100.0 * section_width_px).max(floor)
}

/// Height of a section's event track.
pub fn track_height(lane_count: usize, config: &TimelineConfig) -> f32 {
    lane_count.max(config.max_visible_lanes) as f32 * config.event_marker_height + TRACK_PADDING
}

/// Whether the track needs its own vertical scrolling.
pub fn track_overflows(lane_count: usize, config: &TimelineConfig) -> bool {
    lane_count > config.max_visible_lanes
}

/// Top edge of `lane`, with the whole block of lanes centred in the track.
pub fn lane_top(lane: usize, lane_count: usize, track_height: f32, marker_height: f32) -> f32 {
    let block = lane_count as f32 * marker_height;
    track_height / 2.0 - block / 2.0 + lane as f32 * marker_height
}

/// January and July tick marks for every year of a section, in percent.
pub fn month_ticks(section: &TimelineSection) -> Vec<f64> {
    let duration = section_duration(section);
    if duration <= 0.0 {
        return Vec::new();
    }
    let origin = year_start(section.start_year);
    (section.start_year..=section.end_year)
        .flat_map(|year| [day_number(year, 1, 1), day_number(year, 7, 1)])
        .map(|day| (day - origin) / duration * 100.0)
        .collect()
}

/// Left edge of every section when laid side by side.
pub fn section_offsets(sections: &[TimelineSection], pixels_per_year: f32) -> Vec<f32> {
    let mut x = 0.0;
    sections
        .iter()
        .map(|section| {
            let left = x;
            x += section_width(section, pixels_per_year);
            left
        })
        .collect()
}
