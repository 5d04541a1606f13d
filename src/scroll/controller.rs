use chrono::NaiveDate;

use super::tick::TickCue;
use crate::config::TimelineConfig;
use crate::model::date::{day_number_of, year_start, DAYS_PER_YEAR};
use crate::model::TimelineSection;

/// Size of the scrollable content and of the visible window onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub scroll_width: f32,
    pub client_width: f32,
}

impl ViewportMetrics {
    pub fn max_offset(&self) -> f32 {
        (self.scroll_width - self.client_width).max(0.0)
    }
}

/// One observation of the viewport after it scrolled or resized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub position: f32,
    pub scroll_width: f32,
    pub client_width: f32,
}

impl ScrollSample {
    pub fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics {
            scroll_width: self.scroll_width,
            client_width: self.client_width,
        }
    }

    pub fn total_scrollable(&self) -> f32 {
        self.scroll_width - self.client_width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollPhase {
    Idle,
    Dragging {
        anchor_pointer_x: f32,
        anchor_position: f32,
    },
    /// `started_at` is filled in by the first `advance` after the command.
    AnimatingToTarget {
        from: f32,
        to: f32,
        started_at: Option<f64>,
    },
}

/// State derived from a scroll sample, handed to the feedback layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollUpdate {
    pub sample: ScrollSample,
    pub ticked: bool,
    pub can_scroll_left: bool,
    pub can_scroll_right: bool,
}

/// Offset that centres "today" in a viewport `client_width` wide.
pub fn today_offset(first_start_year: i32, today_day: f64, pixels_per_year: f32, client_width: f32) -> f32 {
    let days_from_start = today_day - year_start(first_start_year);
    let pixels_from_start = days_from_start / DAYS_PER_YEAR * pixels_per_year as f64;
    (pixels_from_start - client_width as f64 / 2.0) as f32
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Owns the horizontal scroll position of the timeline.
///
/// The controller never touches a widget: it records where the viewport
/// should be (`take_pending_offset`) and learns where it actually is from
/// `on_scroll`. Every command is a no-op until a viewport is attached.
pub struct ScrollController {
    config: TimelineConfig,
    viewport: Option<ViewportMetrics>,
    position: f32,
    phase: ScrollPhase,
    pending: Option<f32>,
    /// Last offset handed to the widget, to spot user scrolling mid-animation.
    applied: Option<f32>,
    last_tick_position: f32,
    tick_count: u64,
    pulse_until: f64,
    can_scroll_left: bool,
    can_scroll_right: bool,
    cue: Box<dyn TickCue>,
}

impl ScrollController {
    pub fn new(config: &TimelineConfig, cue: Box<dyn TickCue>) -> Self {
        Self {
            config: config.clone(),
            viewport: None,
            position: 0.0,
            phase: ScrollPhase::Idle,
            pending: None,
            applied: None,
            last_tick_position: 0.0,
            tick_count: 0,
            pulse_until: f64::NEG_INFINITY,
            can_scroll_left: false,
            can_scroll_right: true,
            cue,
        }
    }

    /// Attach to (or refresh) the viewport. Returns true on first attach.
    pub fn attach(&mut self, metrics: ViewportMetrics) -> bool {
        let first = self.viewport.is_none();
        self.viewport = Some(metrics);
        if first {
            log::debug!(
                "timeline viewport attached ({:.0} of {:.0})",
                metrics.client_width,
                metrics.scroll_width
            );
        }
        first
    }

    pub fn detach(&mut self) {
        self.viewport = None;
        self.phase = ScrollPhase::Idle;
        self.pending = None;
        self.applied = None;
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    #[cfg(test)]
    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    pub fn can_scroll_left(&self) -> bool {
        self.can_scroll_left
    }

    pub fn can_scroll_right(&self) -> bool {
        self.can_scroll_right
    }

    #[cfg(test)]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// True while the visual tick pulse is showing.
    pub fn is_ticking(&self, now: f64) -> bool {
        now < self.pulse_until
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, ScrollPhase::Dragging { .. })
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, ScrollPhase::AnimatingToTarget { .. })
    }

    fn clamp(&self, offset: f32, viewport: ViewportMetrics) -> f32 {
        offset.clamp(0.0, viewport.max_offset())
    }

    /// Offset the widget must jump to before it is drawn this frame.
    pub fn take_pending_offset(&mut self) -> Option<f32> {
        let pending = self.pending.take();
        if pending.is_some() {
            self.applied = pending;
        }
        pending
    }

    pub fn scroll_to(&mut self, offset: f32, smooth: bool) {
        let Some(viewport) = self.viewport else {
            return;
        };
        let target = self.clamp(offset, viewport);

        if smooth {
            if (target - self.position).abs() < 0.5 {
                return;
            }
            log::debug!("animating scroll {:.0} -> {:.0}", self.position, target);
            self.phase = ScrollPhase::AnimatingToTarget {
                from: self.position,
                to: target,
                started_at: None,
            };
        } else {
            self.phase = ScrollPhase::Idle;
            self.position = target;
            self.pending = Some(target);
            // A jump is not travel: do not tick for it.
            self.last_tick_position = target;
        }
    }

    pub fn scroll_by(&mut self, delta: f32, smooth: bool) {
        self.scroll_to(self.position + delta, smooth);
    }

    /// Move half a viewport in `direction`.
    pub fn navigate(&mut self, direction: Direction) {
        let Some(viewport) = self.viewport else {
            return;
        };
        let amount = viewport.client_width * self.config.nudge_fraction;
        let delta = match direction {
            Direction::Left => -amount,
            Direction::Right => amount,
        };
        self.scroll_by(delta, true);
    }

    /// Offset that centres `today`, or `None` without sections or viewport.
    pub fn compute_today_offset(&self, sections: &[TimelineSection], today: NaiveDate) -> Option<f32> {
        let viewport = self.viewport?;
        let first = sections.first()?;
        Some(today_offset(
            first.start_year,
            day_number_of(today),
            self.config.pixels_per_year,
            viewport.client_width,
        ))
    }

    pub fn scroll_to_today(&mut self, sections: &[TimelineSection], today: NaiveDate, smooth: bool) {
        if let Some(offset) = self.compute_today_offset(sections, today) {
            self.scroll_to(offset, smooth);
        }
    }

    /// Start a drag unless the pointer is over a track that scrolls vertically.
    pub fn pointer_down(&mut self, pointer_x: f32, over_nested_scroller: bool) -> bool {
        if self.viewport.is_none() || over_nested_scroller {
            return false;
        }
        self.phase = ScrollPhase::Dragging {
            anchor_pointer_x: pointer_x,
            anchor_position: self.position,
        };
        true
    }

    pub fn pointer_move(&mut self, pointer_x: f32) {
        let (Some(viewport), ScrollPhase::Dragging { anchor_pointer_x, anchor_position }) =
            (self.viewport, self.phase)
        else {
            return;
        };
        let walk = (pointer_x - anchor_pointer_x) * self.config.drag_multiplier;
        let target = self.clamp(anchor_position - walk, viewport);
        self.position = target;
        self.pending = Some(target);
    }

    pub fn pointer_up(&mut self) {
        if self.is_dragging() {
            self.phase = ScrollPhase::Idle;
        }
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Step a running animation to `now` (seconds). Returns true while animating.
    pub fn advance(&mut self, now: f64) -> bool {
        let ScrollPhase::AnimatingToTarget { from, to, started_at } = self.phase else {
            return false;
        };
        if self.viewport.is_none() {
            self.phase = ScrollPhase::Idle;
            return false;
        }

        let started_at = started_at.unwrap_or(now);
        let duration = self.config.scroll_animation_secs;
        let t = if duration > 0.0 {
            ((now - started_at) / duration).clamp(0.0, 1.0) as f32
        } else {
            1.0
        };

        self.position = from + (to - from) * ease_out_cubic(t);
        self.pending = Some(self.position);

        if t >= 1.0 {
            self.position = to;
            self.pending = Some(to);
            self.phase = ScrollPhase::Idle;
            false
        } else {
            self.phase = ScrollPhase::AnimatingToTarget {
                from,
                to,
                started_at: Some(started_at),
            };
            true
        }
    }

    /// Digest a viewport sample taken at `now` (seconds).
    pub fn on_scroll(&mut self, sample: ScrollSample, now: f64) -> Option<ScrollUpdate> {
        self.viewport?;
        self.viewport = Some(sample.metrics());

        if let (ScrollPhase::AnimatingToTarget { .. }, Some(applied)) = (self.phase, self.applied) {
            if (sample.position - applied).abs() > 1.0 {
                log::debug!("user scroll superseded animation");
                self.phase = ScrollPhase::Idle;
                self.pending = None;
            }
        }
        self.applied = None;

        let position = sample.position;
        self.position = position;
        self.can_scroll_left = position > self.config.edge_epsilon;
        self.can_scroll_right =
            sample.scroll_width - sample.client_width - position > self.config.edge_epsilon;

        let ticked = (position - self.last_tick_position).abs() >= self.config.tick_interval;
        if ticked {
            self.last_tick_position = position;
            self.tick_count += 1;
            self.pulse_until = now + self.config.tick_pulse_secs;
            if self.cue.is_available() {
                self.cue.play_tick();
            }
        }

        Some(ScrollUpdate {
            sample,
            ticked,
            can_scroll_left: self.can_scroll_left,
            can_scroll_right: self.can_scroll_right,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::tick::SilentCue;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingCue {
        plays: Rc<Cell<u32>>,
        available: bool,
    }

    impl TickCue for CountingCue {
        fn play_tick(&mut self) {
            self.plays.set(self.plays.get() + 1);
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    fn metrics() -> ViewportMetrics {
        ViewportMetrics {
            scroll_width: 5000.0,
            client_width: 800.0,
        }
    }

    fn sample(position: f32) -> ScrollSample {
        ScrollSample {
            position,
            scroll_width: 5000.0,
            client_width: 800.0,
        }
    }

    fn attached() -> ScrollController {
        let mut controller = ScrollController::new(&TimelineConfig::default(), Box::new(SilentCue));
        controller.attach(metrics());
        controller
    }

    #[test]
    fn detached_controller_ignores_everything() {
        let mut controller = ScrollController::new(&TimelineConfig::default(), Box::new(SilentCue));
        controller.scroll_to(300.0, false);
        controller.navigate(Direction::Right);
        assert!(!controller.pointer_down(10.0, false));
        assert!(controller.on_scroll(sample(100.0), 0.0).is_none());
        assert!(controller.take_pending_offset().is_none());
        assert_eq!(controller.phase(), ScrollPhase::Idle);
        assert!(controller
            .compute_today_offset(&[TimelineSection::new("a", "A", 2000, 2001)], NaiveDate::MIN)
            .is_none());
    }

    #[test]
    fn today_offset_is_exact() {
        let controller = attached();
        let sections = vec![
            TimelineSection::new("early", "Early", 1900, 1987),
            TimelineSection::new("late", "Late", 1988, 2040),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let expected =
            ((day_number_of(today) - year_start(1900)) / 365.25 * 120.0 - 800.0 / 2.0) as f32;
        assert_eq!(controller.compute_today_offset(&sections, today), Some(expected));
        assert_eq!(controller.compute_today_offset(&[], today), None);
    }

    #[test]
    fn instant_scroll_to_today_is_pending_before_first_frame() {
        let mut controller = attached();
        let sections = vec![TimelineSection::new("s", "S", 2000, 2040)];
        let today = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        controller.scroll_to_today(&sections, today, false);

        let expected = today_offset(2000, day_number_of(today), 120.0, 800.0);
        assert_eq!(controller.take_pending_offset(), Some(expected));
        assert_eq!(controller.phase(), ScrollPhase::Idle);
        // Landing on the target does not count as scroll travel.
        assert!(!controller.on_scroll(sample(expected), 0.0).unwrap().ticked);
    }

    #[test]
    fn targets_are_clamped_to_the_content() {
        let mut controller = attached();
        controller.scroll_to(-50.0, false);
        assert_eq!(controller.take_pending_offset(), Some(0.0));
        controller.scroll_to(99_999.0, false);
        assert_eq!(controller.take_pending_offset(), Some(4200.0));
    }

    #[test]
    fn tick_cadence_follows_distance() {
        let mut controller = attached();
        controller.on_scroll(sample(0.0), 0.0);

        let mut ticks = Vec::new();
        for step in 1..=50 {
            let position = step as f32 * 10.0;
            if controller.on_scroll(sample(position), 0.0).unwrap().ticked {
                ticks.push(position);
            }
        }
        assert_eq!(ticks.len(), 10);
        let mut previous = 0.0;
        for tick in ticks {
            assert!(tick - previous >= 50.0);
            previous = tick;
        }
        assert_eq!(controller.tick_count(), 10);
    }

    #[test]
    fn tick_plays_cue_only_when_available() {
        let plays = Rc::new(Cell::new(0));
        let mut controller = ScrollController::new(
            &TimelineConfig::default(),
            Box::new(CountingCue {
                plays: plays.clone(),
                available: true,
            }),
        );
        controller.attach(metrics());
        controller.on_scroll(sample(100.0), 1.0);
        assert_eq!(plays.get(), 1);
        assert!(controller.is_ticking(1.1));
        assert!(!controller.is_ticking(1.2));

        let muted = Rc::new(Cell::new(0));
        let mut controller = ScrollController::new(
            &TimelineConfig::default(),
            Box::new(CountingCue {
                plays: muted.clone(),
                available: false,
            }),
        );
        controller.attach(metrics());
        let update = controller.on_scroll(sample(100.0), 1.0).unwrap();
        assert!(update.ticked);
        assert!(controller.is_ticking(1.0));
        assert_eq!(muted.get(), 0);
    }

    #[test]
    fn edge_reachability() {
        let mut controller = attached();
        let update = controller.on_scroll(sample(0.5), 0.0).unwrap();
        assert!(!update.can_scroll_left);
        assert!(update.can_scroll_right);

        let update = controller.on_scroll(sample(4199.5), 0.0).unwrap();
        assert!(update.can_scroll_left);
        assert!(!update.can_scroll_right);

        let update = controller.on_scroll(sample(2000.0), 0.0).unwrap();
        assert!(update.can_scroll_left && update.can_scroll_right);
    }

    #[test]
    fn navigate_animates_half_a_viewport() {
        let mut controller = attached();
        controller.scroll_to(1000.0, false);
        controller.take_pending_offset();
        controller.on_scroll(sample(1000.0), 0.0);

        controller.navigate(Direction::Right);
        assert_eq!(
            controller.phase(),
            ScrollPhase::AnimatingToTarget {
                from: 1000.0,
                to: 1400.0,
                started_at: None
            }
        );

        assert!(controller.advance(10.0));
        assert_eq!(controller.take_pending_offset(), Some(1000.0));
        assert!(controller.advance(10.2));
        let mid = controller.take_pending_offset().unwrap();
        assert!(mid > 1000.0 && mid < 1400.0);
        assert!(!controller.advance(10.5));
        assert_eq!(controller.take_pending_offset(), Some(1400.0));
        assert_eq!(controller.phase(), ScrollPhase::Idle);

        controller.on_scroll(sample(1400.0), 10.5);
        controller.navigate(Direction::Left);
        assert!(controller.is_animating());
        controller.advance(20.0);
        controller.advance(21.0);
        assert_eq!(controller.position(), 1000.0);
    }

    #[test]
    fn user_scroll_supersedes_animation() {
        let mut controller = attached();
        controller.scroll_to(2000.0, true);
        controller.advance(0.0);
        controller.advance(0.1);
        let applied = controller.take_pending_offset().unwrap();

        // The widget reports somewhere else: the user moved it.
        controller.on_scroll(sample(applied + 120.0), 0.1);
        assert_eq!(controller.phase(), ScrollPhase::Idle);
        assert!(!controller.advance(0.2));
    }

    #[test]
    fn drag_moves_opposite_to_the_pointer_at_double_speed() {
        let mut controller = attached();
        controller.scroll_to(1000.0, false);
        controller.take_pending_offset();

        assert!(controller.pointer_down(400.0, false));
        assert!(controller.is_dragging());
        controller.pointer_move(350.0);
        assert_eq!(controller.take_pending_offset(), Some(1100.0));
        controller.pointer_move(500.0);
        assert_eq!(controller.take_pending_offset(), Some(800.0));

        controller.pointer_leave();
        assert_eq!(controller.phase(), ScrollPhase::Idle);
        controller.pointer_move(0.0);
        assert!(controller.take_pending_offset().is_none());
    }

    #[test]
    fn drag_is_suppressed_over_nested_scrollers() {
        let mut controller = attached();
        assert!(!controller.pointer_down(400.0, true));
        assert_eq!(controller.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn drag_cancels_a_running_animation() {
        let mut controller = attached();
        controller.scroll_to(3000.0, true);
        controller.advance(0.0);
        assert!(controller.pointer_down(100.0, false));
        assert!(!controller.advance(0.1));
        controller.pointer_up();
        assert_eq!(controller.phase(), ScrollPhase::Idle);
    }
}
