use serde::{Deserialize, Serialize};
use std::path::Path;
use viewconf_index::{Database, NewButton, NewField, NewView};

use crate::Result;

/// Framework catalog as exchanged in JSON: models with their fields,
/// buttons and views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub models: Vec<CatalogModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogModel {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<NewField>,
    #[serde(default)]
    pub buttons: Vec<NewButton>,
    #[serde(default)]
    pub views: Vec<NewView>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub models: usize,
    pub fields: usize,
    pub buttons: usize,
    pub views: usize,
}

impl Catalog {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Upserts every model, field, button and view by name.
    pub fn import_into(&self, db: &Database) -> Result<ImportSummary> {
        db.transaction(|| -> Result<ImportSummary> {
            let mut summary = ImportSummary::default();
            for model in &self.models {
                let id = db.upsert_model(&model.name, model.description.as_deref())?;
                for field in &model.fields {
                    db.upsert_field(id, field)?;
                }
                for button in &model.buttons {
                    db.upsert_button(id, button)?;
                }
                for view in &model.views {
                    db.upsert_view(id, view)?;
                }

                summary.models += 1;
                summary.fields += model.fields.len();
                summary.buttons += model.buttons.len();
                summary.views += model.views.len();
            }

            tracing::info!(
                models = summary.models,
                fields = summary.fields,
                buttons = summary.buttons,
                views = summary.views,
                "catalog imported"
            );
            Ok(summary)
        })
    }
}
