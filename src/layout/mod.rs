pub mod geometry;
pub mod lanes;
pub mod model;

pub use model::{LayoutModel, SectionLayout};
