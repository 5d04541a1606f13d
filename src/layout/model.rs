use uuid::Uuid;

use super::geometry::{
    event_position, month_ticks, section_offsets, section_width, track_height, track_overflows,
    EventPosition,
};
use super::lanes::{assign_lanes, LaneAssignment};
use crate::config::TimelineConfig;
use crate::model::Catalog;

/// Precomputed geometry of one section.
#[derive(Debug, Clone)]
pub struct SectionLayout {
    pub left: f32,
    pub width: f32,
    pub lanes: LaneAssignment,
    /// Aligned with the section's events.
    pub positions: Vec<EventPosition>,
    pub track_height: f32,
    /// The track scrolls vertically because it holds too many lanes.
    pub scrollable: bool,
    pub ticks: Vec<f64>,
}

impl SectionLayout {
    /// Lanes used for centring; an empty section still reserves one.
    pub fn display_lanes(&self) -> usize {
        self.lanes.lane_count.max(1)
    }
}

/// Inputs that invalidate a layout when they change.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LayoutKey {
    revision: Uuid,
    pixels_per_year: f32,
    marker_height: f32,
    max_visible_lanes: usize,
}

impl LayoutKey {
    fn of(catalog: &Catalog, config: &TimelineConfig) -> Self {
        Self {
            revision: catalog.revision,
            pixels_per_year: config.pixels_per_year,
            marker_height: config.event_marker_height,
            max_visible_lanes: config.max_visible_lanes,
        }
    }
}

/// Cached lanes and geometry for a whole catalog.
///
/// Rebuilt only when the catalog revision or a layout tunable changes,
/// never per scroll sample.
#[derive(Debug, Default)]
pub struct LayoutModel {
    key: Option<LayoutKey>,
    sections: Vec<SectionLayout>,
    total_width: f32,
}

impl LayoutModel {
    /// Rebuild if the inputs changed. Returns true when a rebuild happened.
    pub fn ensure(&mut self, catalog: &Catalog, config: &TimelineConfig) -> bool {
        let key = LayoutKey::of(catalog, config);
        if self.key == Some(key) {
            return false;
        }

        let offsets = section_offsets(&catalog.sections, config.pixels_per_year);
        self.sections = catalog
            .sections
            .iter()
            .zip(offsets)
            .map(|(section, left)| {
                let lanes = assign_lanes(&section.events);
                SectionLayout {
                    left,
                    width: section_width(section, config.pixels_per_year),
                    positions: section
                        .events
                        .iter()
                        .map(|event| event_position(event, section))
                        .collect(),
                    track_height: track_height(lanes.lane_count, config),
                    scrollable: track_overflows(lanes.lane_count, config),
                    ticks: month_ticks(section),
                    lanes,
                }
            })
            .collect();
        self.total_width = self.sections.iter().map(|s| s.width).sum();
        self.key = Some(key);

        log::debug!(
            "rebuilt layout: {} sections, {} events, {:.0}px wide",
            self.sections.len(),
            catalog.event_count(),
            self.total_width
        );
        true
    }

    pub fn sections(&self) -> &[SectionLayout] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&SectionLayout> {
        self.sections.get(index)
    }

    pub fn total_width(&self) -> f32 {
        self.total_width
    }

    /// Index of the section under a content x coordinate.
    pub fn section_at(&self, x: f32) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| x >= s.left && x < s.left + s.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TimelineEvent, TimelineSection};

    fn catalog() -> Catalog {
        Catalog::new(
            "Story",
            vec![
                TimelineSection::new("a", "A", 2000, 2004).with_events(vec![
                    TimelineEvent::new("one", 2001).until(2003, None, None),
                    TimelineEvent::new("two", 2002),
                ]),
                TimelineSection::new("b", "B", 2005, 2005),
            ],
        )
    }

    #[test]
    fn builds_sections_and_lanes() {
        let catalog = catalog();
        let config = TimelineConfig::default();
        let mut model = LayoutModel::default();
        assert!(model.ensure(&catalog, &config));

        assert_eq!(model.sections().len(), 2);
        assert_eq!(model.total_width(), 600.0 + 120.0);
        assert_eq!(model.section(1).unwrap().left, 600.0);
        assert_eq!(model.section(0).unwrap().lanes.lane_count, 2);
        assert_eq!(model.section(1).unwrap().display_lanes(), 1);

        assert_eq!(model.section(0).unwrap().lanes.lanes, vec![0, 1]);
        assert_eq!(model.section_at(650.0), Some(1));
        assert_eq!(model.section_at(900.0), None);
    }

    #[test]
    fn rebuilds_only_when_inputs_change() {
        let catalog = catalog();
        let mut config = TimelineConfig::default();
        let mut model = LayoutModel::default();

        assert!(model.ensure(&catalog, &config));
        assert!(!model.ensure(&catalog, &config));

        config.pixels_per_year = 60.0;
        assert!(model.ensure(&catalog, &config));
        assert_eq!(model.total_width(), 360.0);

        let reloaded = Catalog {
            revision: Uuid::new_v4(),
            ..catalog.clone()
        };
        assert!(model.ensure(&reloaded, &config));
        assert!(!model.ensure(&reloaded, &config));
    }
}
