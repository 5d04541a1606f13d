use serde::{Deserialize, Serialize};

use super::date::year_start;
use super::event::TimelineEvent;

/// A contiguous, inclusive span of years with its own backdrop and events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSection {
    pub id: String,
    pub title: String,
    pub start_year: i32,
    pub end_year: i32,
    #[serde(default)]
    pub background_image: String,
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
}

impl TimelineSection {
    #[cfg(test)]
    pub fn new(id: impl Into<String>, title: impl Into<String>, start_year: i32, end_year: i32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_year,
            end_year,
            background_image: String::new(),
            events: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_events(mut self, events: Vec<TimelineEvent>) -> Self {
        self.events = events;
        self
    }

    /// Number of whole years covered; zero or less for a degenerate section.
    pub fn year_count(&self) -> i32 {
        self.end_year - self.start_year + 1
    }

    pub fn is_degenerate(&self) -> bool {
        self.year_count() <= 0
    }

    /// Whether the event lies entirely inside `[start_year, end_year]`.
    pub fn contains(&self, event: &TimelineEvent) -> bool {
        let span = event.span();
        span.start >= year_start(self.start_year) && span.end <= year_start(self.end_year + 1)
    }
}
