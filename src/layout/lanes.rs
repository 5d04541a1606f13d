//! Stacking of overlapping events into rows ("lanes").
//!
//! Events are visited in order of their start and each one drops into the
//! first lane that is already free at that start. Visiting in start order
//! makes this greedy pass optimal for intervals: the number of lanes equals
//! the largest number of events that overlap at one instant.

use crate::model::date::DaySpan;
use crate::model::TimelineEvent;

/// Lane index for every event of a section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaneAssignment {
    /// Lane of each event, aligned with the input order.
    pub lanes: Vec<usize>,
    pub lane_count: usize,
}

/// What a lane still blocks after its most recent event.
#[derive(Debug, Clone, Copy)]
struct LaneTail {
    end: f64,
    /// Point events block their own instant as well.
    inclusive: bool,
}

impl LaneTail {
    fn of(span: &DaySpan) -> Self {
        Self {
            end: span.end,
            inclusive: span.is_point(),
        }
    }

    fn admits(&self, start: f64) -> bool {
        if self.inclusive {
            start > self.end
        } else {
            start >= self.end
        }
    }
}

/// Assign lanes to spans given in input order.
///
/// Equal starts keep their input order, so the earlier-listed event takes
/// the lower lane.
pub fn assign_spans(spans: &[DaySpan]) -> LaneAssignment {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by(|&a, &b| spans[a].start.total_cmp(&spans[b].start));

    let mut tails: Vec<LaneTail> = Vec::new();
    let mut lanes = vec![0; spans.len()];

    for index in order {
        let span = &spans[index];
        let lane = match tails.iter().position(|tail| tail.admits(span.start)) {
            Some(lane) => {
                tails[lane] = LaneTail::of(span);
                lane
            }
            None => {
                tails.push(LaneTail::of(span));
                tails.len() - 1
            }
        };
        lanes[index] = lane;
    }

    LaneAssignment {
        lanes,
        lane_count: tails.len(),
    }
}

pub fn assign_lanes(events: &[TimelineEvent]) -> LaneAssignment {
    let spans: Vec<DaySpan> = events.iter().map(TimelineEvent::span).collect();
    assign_spans(&spans)
}
