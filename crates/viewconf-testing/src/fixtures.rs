//! Sample catalog shared by the integration suites.
//!
//! Three models modeled after a real deployment:
//! - `ir.attachment`: stored tree view with a datetime column, system fields
//! - `ir.model.field`: stored tree view, no buttons
//! - `res.user`: tree view with a button

use anyhow::Result;
use std::path::Path;
use viewconf_runtime::Catalog;

/// Raw JSON of the sample catalog, as `viewconf catalog import` reads it.
pub const SAMPLE_CATALOG_JSON: &str = include_str!("../fixtures/catalog.json");

pub const ATTACHMENT: &str = "ir.attachment";
pub const MODEL_FIELD: &str = "ir.model.field";
pub const USER: &str = "res.user";

/// Column names of the stored `ir.attachment` tree view, in order.
pub const ATTACHMENT_TREE_COLUMNS: [&str; 6] = [
    "resource",
    "name",
    "summary",
    "type",
    "last_user",
    "last_modification",
];

pub fn sample_catalog() -> Result<Catalog> {
    Ok(Catalog::from_json(SAMPLE_CATALOG_JSON)?)
}

/// Writes the sample catalog to `dest` for CLI imports.
pub fn write_sample_catalog(dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, SAMPLE_CATALOG_JSON)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_parses() {
        let catalog = sample_catalog().unwrap();
        let names: Vec<_> = catalog.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec![ATTACHMENT, MODEL_FIELD, USER]);
        assert_eq!(catalog.models[2].buttons.len(), 1);
    }
}
