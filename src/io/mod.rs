pub mod catalog;

pub use catalog::{builtin_catalog, load_catalog, LoadedCatalog};
