use crate::model::{Catalog, CatalogError, CatalogWarning};
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../assets/timeline.json");

/// A validated catalog and the data problems found while loading it.
#[derive(Debug)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub warnings: Vec<CatalogWarning>,
}

fn parse(json: &str) -> Result<LoadedCatalog, CatalogError> {
    let mut catalog = Catalog::from_json(json)?;
    let warnings = catalog.validate()?;
    log::info!(
        "loaded catalog '{}': {} sections, {} events",
        catalog.title,
        catalog.sections.len(),
        catalog.event_count()
    );
    Ok(LoadedCatalog { catalog, warnings })
}

/// Load and validate a catalog JSON file.
pub fn load_catalog(path: &Path) -> Result<LoadedCatalog, CatalogError> {
    let json = std::fs::read_to_string(path)?;
    parse(&json)
}

/// The catalog shipped with the app.
pub fn builtin_catalog() -> Result<LoadedCatalog, CatalogError> {
    parse(BUILTIN_CATALOG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_clean() {
        let loaded = builtin_catalog().unwrap();
        assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
        assert!(loaded.catalog.sections.len() >= 3);
        assert!(loaded.catalog.event_count() > 0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join(format!("no-such-catalog-{}.json", uuid::Uuid::new_v4()));
        assert!(matches!(load_catalog(&path), Err(CatalogError::Io(_))));
    }

    #[test]
    fn loads_a_file_from_disk() {
        let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"[{ "id": "a", "title": "A", "startYear": 2000, "endYear": 2001,
                 "events": [{ "year": 2003, "title": "Stray" }] }]"#,
        )
        .unwrap();
        let loaded = load_catalog(&path).unwrap();
        assert_eq!(loaded.warnings.len(), 1);
        let _ = std::fs::remove_file(&path);
    }
}
