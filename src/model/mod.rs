pub mod catalog;
pub mod date;
pub mod event;
pub mod section;

pub use catalog::{Catalog, CatalogError, CatalogWarning};
pub use event::{Media, MediaKind, TimelineEvent};
pub use section::TimelineSection;
