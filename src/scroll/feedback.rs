use super::controller::ScrollUpdate;
use crate::model::TimelineSection;

/// Section the viewport is mostly looking at, by scroll progress.
pub fn active_section_index(position: f32, total_scrollable: f32, section_count: usize) -> usize {
    if section_count == 0 || total_scrollable <= 0.0 {
        return 0;
    }
    let progress = position / total_scrollable;
    let index = (progress * section_count as f32).floor();
    (index.max(0.0) as usize).min(section_count - 1)
}

/// Background shift for the depth effect; zero when nothing scrolls.
pub fn parallax_offset(position: f32, total_scrollable: f32, max: f32) -> f32 {
    if total_scrollable <= 0.0 {
        return 0.0;
    }
    -(position / total_scrollable) * max
}

/// Cross-fade between the previous and the current section backdrop.
#[derive(Debug, Clone, Default)]
pub struct BackgroundFade {
    current: Option<String>,
    previous: Option<String>,
    started_at: Option<f64>,
    duration: f64,
}

impl BackgroundFade {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    /// Show `image` from `now` on. Returns true when it replaced another image.
    pub fn show(&mut self, image: &str, now: f64) -> bool {
        if image.is_empty() || self.current.as_deref() == Some(image) {
            return false;
        }
        match self.current.take() {
            Some(old) => {
                self.previous = Some(old);
                self.current = Some(image.to_string());
                self.started_at = Some(now);
                true
            }
            None => {
                self.current = Some(image.to_string());
                false
            }
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The image fading out, while the fade runs.
    pub fn previous(&self, now: f64) -> Option<&str> {
        if self.is_fading(now) {
            self.previous.as_deref()
        } else {
            None
        }
    }

    pub fn is_fading(&self, now: f64) -> bool {
        match self.started_at {
            Some(start) => now - start < self.duration,
            None => false,
        }
    }

    /// Alpha of the previous and the current image.
    pub fn opacities(&self, now: f64) -> (f32, f32) {
        match self.started_at {
            Some(start) if self.duration > 0.0 && now - start < self.duration => {
                let t = ((now - start) / self.duration).clamp(0.0, 1.0) as f32;
                (1.0 - t, t)
            }
            _ => (0.0, 1.0),
        }
    }
}

/// Visual state derived purely from the latest scroll sample.
#[derive(Debug, Clone)]
pub struct ViewportFeedback {
    parallax_max: f32,
    active_section: usize,
    parallax: f32,
    fade: BackgroundFade,
}

impl ViewportFeedback {
    pub fn new(parallax_max: f32, fade_secs: f64) -> Self {
        Self {
            parallax_max,
            active_section: 0,
            parallax: 0.0,
            fade: BackgroundFade::new(fade_secs),
        }
    }

    /// Start on the first section's backdrop.
    pub fn reset(&mut self, sections: &[TimelineSection]) {
        self.active_section = 0;
        self.parallax = 0.0;
        self.fade = BackgroundFade::new(self.fade.duration);
        if let Some(first) = sections.first() {
            self.fade.show(&first.background_image, 0.0);
        }
    }

    pub fn on_scroll(&mut self, update: &ScrollUpdate, sections: &[TimelineSection], now: f64) {
        let sample = update.sample;
        let total = sample.total_scrollable();
        let index = active_section_index(sample.position, total, sections.len());
        if total > 0.0 {
            self.parallax = parallax_offset(sample.position, total, self.parallax_max);
        }
        if index != self.active_section {
            log::debug!("active section {} -> {}", self.active_section, index);
            self.active_section = index;
        }
        if let Some(section) = sections.get(index) {
            self.fade.show(&section.background_image, now);
        }
    }

    pub fn active_section(&self) -> usize {
        self.active_section
    }

    pub fn parallax(&self) -> f32 {
        self.parallax
    }

    pub fn fade(&self) -> &BackgroundFade {
        &self.fade
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::controller::ScrollSample;

    fn update(position: f32, scroll_width: f32, client_width: f32) -> ScrollUpdate {
        ScrollUpdate {
            sample: ScrollSample {
                position,
                scroll_width,
                client_width,
            },
            ticked: false,
            can_scroll_left: true,
            can_scroll_right: true,
        }
    }

    fn sections() -> Vec<TimelineSection> {
        (0..5)
            .map(|i| {
                let mut s = TimelineSection::new(format!("s{}", i), "S", 2000 + i, 2000 + i);
                s.background_image = format!("bg{}.jpg", i);
                s
            })
            .collect()
    }

    #[test]
    fn active_section_by_progress() {
        assert_eq!(active_section_index(450.0, 1000.0, 5), 2);
        assert_eq!(active_section_index(0.0, 1000.0, 5), 0);
        assert_eq!(active_section_index(1000.0, 1000.0, 5), 4);
        assert_eq!(active_section_index(5000.0, 1000.0, 5), 4);
        assert_eq!(active_section_index(-20.0, 1000.0, 5), 0);
    }

    #[test]
    fn active_section_guards_degenerate_inputs() {
        assert_eq!(active_section_index(450.0, 0.0, 5), 0);
        assert_eq!(active_section_index(450.0, 1000.0, 0), 0);
    }

    #[test]
    fn parallax_scales_with_progress() {
        assert_eq!(parallax_offset(0.0, 1000.0, 60.0), 0.0);
        assert_eq!(parallax_offset(500.0, 1000.0, 60.0), -30.0);
        assert_eq!(parallax_offset(1000.0, 1000.0, 60.0), -60.0);
        assert_eq!(parallax_offset(300.0, 0.0, 60.0), 0.0);
    }

    #[test]
    fn fade_crosses_over_its_duration() {
        let mut fade = BackgroundFade::new(1.0);
        assert!(!fade.show("a.jpg", 0.0));
        assert_eq!(fade.opacities(0.0), (0.0, 1.0));
        assert!(!fade.show("a.jpg", 0.5));

        assert!(fade.show("b.jpg", 2.0));
        assert_eq!(fade.current(), Some("b.jpg"));
        assert_eq!(fade.previous(2.5), Some("a.jpg"));
        assert_eq!(fade.opacities(2.5), (0.5, 0.5));
        assert!(!fade.is_fading(3.0));
        assert_eq!(fade.previous(3.0), None);
        assert_eq!(fade.opacities(3.5), (0.0, 1.0));
    }

    #[test]
    fn feedback_follows_scroll_samples() {
        let sections = sections();
        let mut feedback = ViewportFeedback::new(60.0, 1.0);
        feedback.reset(&sections);
        assert_eq!(feedback.fade().current(), Some("bg0.jpg"));

        // 1800 wide content in an 800 wide window: 1000 scrollable.
        feedback.on_scroll(&update(450.0, 1800.0, 800.0), &sections, 1.0);
        assert_eq!(feedback.active_section(), 2);
        assert!((feedback.parallax() + 27.0).abs() < 1e-4);
        assert_eq!(feedback.fade().current(), Some("bg2.jpg"));
        assert!(feedback.fade().is_fading(1.5));

        // Content narrower than the window: keep the first section.
        feedback.on_scroll(&update(0.0, 600.0, 800.0), &sections, 3.0);
        assert_eq!(feedback.active_section(), 0);
        assert_eq!(feedback.fade().current(), Some("bg0.jpg"));
    }
}
