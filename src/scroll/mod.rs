pub mod controller;
pub mod feedback;
pub mod tick;

pub use controller::{Direction, ScrollController, ScrollSample, ScrollUpdate, ViewportMetrics};
pub use feedback::ViewportFeedback;
pub use tick::default_cue;
