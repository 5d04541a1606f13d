//! Tunables for the timeline, read from the OS config directory.
//!
//! Every field carries a default so that a partial `config.json` is valid:
//! missing keys silently fall back to the built-in values. The file is only
//! ever read; the app never writes it. Keys are camelCase, like the
//! catalog files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    /// Horizontal zoom: width of one year in points.
    pub pixels_per_year: f32,
    /// Height of one event lane, including the gap below the marker.
    pub event_marker_height: f32,
    /// Lanes shown before a section's track scrolls vertically.
    pub max_visible_lanes: usize,
    /// Scroll distance between two ticks.
    pub tick_interval: f32,
    /// Background travel over the whole timeline.
    pub parallax_max: f32,
    pub background_fade_secs: f64,
    pub tick_pulse_secs: f64,
    pub scroll_animation_secs: f64,
    /// Narrowest marker for single-day events.
    pub min_point_width: f32,
    /// Narrowest marker for multi-day events.
    pub min_range_width: f32,
    /// Slack when deciding whether the viewport can still scroll.
    pub edge_epsilon: f32,
    /// Scroll distance per point of pointer travel while dragging.
    pub drag_multiplier: f32,
    /// Share of the viewport width moved by the arrow buttons.
    pub nudge_fraction: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            pixels_per_year: 120.0,
            event_marker_height: 48.0,
            max_visible_lanes: 3,
            tick_interval: 50.0,
            parallax_max: 60.0,
            background_fade_secs: 1.0,
            tick_pulse_secs: 0.15,
            scroll_animation_secs: 0.45,
            min_point_width: 40.0,
            min_range_width: 80.0,
            edge_epsilon: 1.0,
            drag_multiplier: 2.0,
            nudge_fraction: 0.5,
        }
    }
}

impl TimelineConfig {
    /// Load from the user config directory, falling back to defaults.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => {
                log::debug!("no config at {:?}, using defaults", path);
                return Self::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(config) => {
                log::info!("loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "StoryTimeline")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: TimelineConfig =
            serde_json::from_str(r#"{ "pixelsPerYear": 200.0, "tickInterval": 25.0 }"#).unwrap();
        assert_eq!(config.pixels_per_year, 200.0);
        assert_eq!(config.tick_interval, 25.0);
        assert_eq!(config.max_visible_lanes, 3);
        assert_eq!(config.parallax_max, 60.0);
    }

    #[test]
    fn keys_use_the_catalog_casing() {
        let json = serde_json::to_value(TimelineConfig::default()).unwrap();
        assert_eq!(json["eventMarkerHeight"], 48.0);
        assert!(json.get("event_marker_height").is_none());

        let config: TimelineConfig =
            serde_json::from_str(r#"{ "max_visible_lanes": 9, "maxVisibleLanes": 5 }"#).unwrap();
        assert_eq!(config.max_visible_lanes, 5);
    }

    #[test]
    fn missing_or_broken_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("story-timeline-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("absent.json");
        assert_eq!(TimelineConfig::load_from(&missing), TimelineConfig::default());

        let broken = dir.join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert_eq!(TimelineConfig::load_from(&broken), TimelineConfig::default());

        let good = dir.join("good.json");
        std::fs::write(&good, r#"{ "parallaxMax": 12.0 }"#).unwrap();
        assert_eq!(TimelineConfig::load_from(&good).parallax_max, 12.0);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
