use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date::{day_number, DaySpan};

/// What a media attachment contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// A picture or clip shown in the event card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

/// A single dated moment or period on the timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    /// Runtime identity; catalogs do not need to carry one.
    #[serde(default = "Uuid::new_v4", skip_serializing)]
    pub id: Uuid,
    pub year: i32,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
    /// Present for ranged events.
    #[serde(default)]
    pub end_year: Option<i32>,
    #[serde(default)]
    pub end_month: Option<u32>,
    #[serde(default)]
    pub end_day: Option<u32>,
    pub title: String,
    /// May contain `<br>` and `<strong>` markup.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub media: Vec<Media>,
}

impl TimelineEvent {
    /// Create a point event at `year` with no month or day.
    #[cfg(test)]
    pub fn new(title: impl Into<String>, year: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            year,
            month: None,
            day: None,
            end_year: None,
            end_month: None,
            end_day: None,
            title: title.into(),
            description: String::new(),
            media: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn on(mut self, month: u32, day: u32) -> Self {
        self.month = Some(month);
        self.day = Some(day);
        self
    }

    #[cfg(test)]
    pub fn until(mut self, year: i32, month: Option<u32>, day: Option<u32>) -> Self {
        self.end_year = Some(year);
        self.end_month = month;
        self.end_day = day;
        self
    }

    pub fn start_day(&self) -> f64 {
        day_number(self.year, self.month.unwrap_or(1), self.day.unwrap_or(1))
    }

    /// End day number; equals the start for point events.
    pub fn end_day(&self) -> f64 {
        match self.end_year {
            Some(year) => day_number(year, self.end_month.unwrap_or(1), self.end_day.unwrap_or(1)),
            None => self.start_day(),
        }
    }

    pub fn span(&self) -> DaySpan {
        if self.is_range() {
            DaySpan::new(self.start_day(), self.end_day())
        } else {
            DaySpan::point(self.start_day())
        }
    }

    pub fn is_range(&self) -> bool {
        self.end_year.is_some()
    }

    /// True when an end date is given and differs from the start in any field.
    pub fn is_multi_day(&self) -> bool {
        match self.end_year {
            Some(end_year) => {
                self.year != end_year || self.month != self.end_month || self.day != self.end_day
            }
            None => false,
        }
    }

    /// Collapse an end that precedes the start into a point event.
    /// Returns true when the event was changed.
    pub fn clamp_end(&mut self) -> bool {
        if self.end_year.is_some() && self.end_day() < self.start_day() {
            self.end_year = None;
            self.end_month = None;
            self.end_day = None;
            true
        } else {
            false
        }
    }

    fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.unwrap_or(1), self.day.unwrap_or(1))
    }

    fn end_date(&self) -> Option<NaiveDate> {
        let year = self.end_year?;
        NaiveDate::from_ymd_opt(year, self.end_month.unwrap_or(1), self.end_day.unwrap_or(1))
    }

    /// Compact label drawn on the marker, e.g. `Sep 1` or `Jun 5 - 14`.
    pub fn short_label(&self) -> String {
        let (Some(_), Some(_), Some(start)) = (self.month, self.day, self.start_date()) else {
            return self.year.to_string();
        };
        let start_str = start.format("%b %-d").to_string();

        if self.is_multi_day() {
            if let (Some(end_month), Some(end_day)) = (self.end_month, self.end_day) {
                if self.month == Some(end_month) {
                    return format!("{} - {}", start_str, end_day);
                }
                if let Some(end) = self.end_date() {
                    return format!("{} - {}", start_str, end.format("%b %-d"));
                }
            }
        }
        start_str
    }

    /// Full label for the event card, e.g. `June 5 - 14, 2023`.
    pub fn long_label(&self) -> String {
        let Some(start) = self.start_date() else {
            return self.year.to_string();
        };

        let end = if self.is_multi_day() { self.end_date() } else { None };
        let Some(end) = end else {
            return match (self.month, self.day) {
                (Some(_), Some(_)) => start.format("%B %-d, %Y").to_string(),
                (Some(_), None) => start.format("%B %Y").to_string(),
                _ => start.format("%Y").to_string(),
            };
        };

        if start.year() == end.year() {
            if start.month() == end.month() {
                return format!(
                    "{} - {}, {}",
                    start.format("%B %-d"),
                    end.format("%-d"),
                    start.format("%Y")
                );
            }
            return format!(
                "{} - {}, {}",
                start.format("%B %-d"),
                end.format("%B %-d"),
                start.format("%Y")
            );
        }

        format!("{} - {}", start.format("%B %-d, %Y"), end.format("%B %-d, %Y"))
    }
}
