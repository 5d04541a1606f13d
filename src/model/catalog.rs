use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::event::TimelineEvent;
use super::section::TimelineSection;

/// Reasons a catalog cannot be shown at all.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog has no sections")]
    Empty,
    #[error("duplicate section id '{0}'")]
    DuplicateSection(String),
}

/// Data problems that are tolerated but worth reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// An event ended before it started and was turned into a point event.
    ClampedRange { section: String, event: String },
    /// An event falls (partly) outside its section's years.
    OutsideSection { section: String, event: String },
    /// The section ends before it starts and gets no width.
    DegenerateSection { section: String },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClampedRange { section, event } => {
                write!(f, "'{}' in '{}' ends before it starts; shown as a single date", event, section)
            }
            Self::OutsideSection { section, event } => {
                write!(f, "'{}' lies outside the years of '{}'", event, section)
            }
            Self::DegenerateSection { section } => {
                write!(f, "section '{}' ends before it starts", section)
            }
        }
    }
}

/// Everything the timeline shows: page titles and the ordered sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Changes whenever a different catalog is loaded.
    #[serde(skip, default = "Uuid::new_v4")]
    pub revision: Uuid,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// A single backdrop used instead of the per-section images.
    #[serde(default)]
    pub main_background: Option<String>,
    pub sections: Vec<TimelineSection>,
}

fn default_title() -> String {
    "Timeline".to_string()
}

impl Catalog {
    pub fn new(title: impl Into<String>, sections: Vec<TimelineSection>) -> Self {
        Self {
            revision: Uuid::new_v4(),
            title: title.into(),
            subtitle: String::new(),
            main_background: None,
            sections,
        }
    }

    /// Parse catalog JSON without validating it.
    ///
    /// Accepts either a full catalog object or a bare array of sections.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        if json.trim_start().starts_with('[') {
            let sections: Vec<TimelineSection> = serde_json::from_str(json)?;
            Ok(Catalog::new(default_title(), sections))
        } else {
            Ok(serde_json::from_str(json)?)
        }
    }

    /// Reject unusable catalogs and repair what can be repaired.
    pub fn validate(&mut self) -> Result<Vec<CatalogWarning>, CatalogError> {
        if self.sections.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.id.as_str()) {
                return Err(CatalogError::DuplicateSection(section.id.clone()));
            }
        }

        let mut warnings = Vec::new();
        for section in &mut self.sections {
            if section.is_degenerate() {
                warnings.push(CatalogWarning::DegenerateSection {
                    section: section.id.clone(),
                });
            }
            for event in &mut section.events {
                if event.clamp_end() {
                    warnings.push(CatalogWarning::ClampedRange {
                        section: section.id.clone(),
                        event: event.title.clone(),
                    });
                }
            }
            for event in &section.events {
                if !section.is_degenerate() && !section.contains(event) {
                    warnings.push(CatalogWarning::OutsideSection {
                        section: section.id.clone(),
                        event: event.title.clone(),
                    });
                }
            }
        }

        for warning in &warnings {
            log::warn!("{}", warning);
        }
        Ok(warnings)
    }

    pub fn events(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.sections.iter().flat_map(|s| s.events.iter())
    }

    pub fn event(&self, id: Uuid) -> Option<&TimelineEvent> {
        self.events().find(|e| e.id == id)
    }

    pub fn event_count(&self) -> usize {
        self.sections.iter().map(|s| s.events.len()).sum()
    }

    /// The event whose start date is nearest `today`, in whole calendar days.
    /// The earliest listed event wins a tie.
    pub fn closest_event_to_today(&self, today: NaiveDate) -> Option<&TimelineEvent> {
        let mut best: Option<(&TimelineEvent, i64)> = None;
        for event in self.events() {
            let Some(start) = NaiveDate::from_ymd_opt(
                event.year,
                event.month.unwrap_or(1),
                event.day.unwrap_or(1),
            ) else {
                continue;
            };
            let distance = (today - start).num_days().abs();
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((event, distance));
            }
        }
        best.map(|(event, _)| event)
    }
}
