use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use viewconf_engine::{FieldInfo, collect_fields, synthesize_arch};
use viewconf_index::Database;
use viewconf_types::{ViewId, ViewType};

use crate::{Error, RequestContext, Result};

/// Arguments of a view resolution call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewRequest {
    pub view_id: Option<ViewId>,
    /// `None` with a `view_id` takes the stored view's type; without one it
    /// means a form.
    pub view_type: Option<ViewType>,
    /// Relation depth of the field map; defaults to 1 for trees, 0 otherwise.
    pub level: Option<u32>,
}

impl ViewRequest {
    pub fn new(view_type: ViewType) -> Self {
        Self {
            view_type: Some(view_type),
            ..Self::default()
        }
    }

    pub fn tree() -> Self {
        Self::new(ViewType::Tree)
    }

    pub fn form() -> Self {
        Self::new(ViewType::Form)
    }

    pub fn with_view(mut self, view_id: Option<ViewId>) -> Self {
        self.view_id = view_id;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn level_for(&self, view_type: ViewType) -> u32 {
        self.level
            .unwrap_or(if view_type == ViewType::Tree { 1 } else { 0 })
    }
}

/// A resolved view: its arch and a description of the fields it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewResult {
    pub model: String,
    pub view_id: Option<ViewId>,
    #[serde(rename = "type")]
    pub view_type: ViewType,
    pub arch: String,
    pub fields: BTreeMap<String, FieldInfo>,
    pub field_childs: Option<String>,
}

/// The framework's "get view for model" call.
///
/// Implementations form a pipeline: decorators wrap an inner resolver and
/// decide per request whether to delegate.
pub trait ViewResolver {
    fn fields_view_get(
        &self,
        ctx: &RequestContext,
        model: &str,
        request: &ViewRequest,
    ) -> Result<ViewResult>;
}

impl<R: ViewResolver + ?Sized> ViewResolver for Arc<R> {
    fn fields_view_get(
        &self,
        ctx: &RequestContext,
        model: &str,
        request: &ViewRequest,
    ) -> Result<ViewResult> {
        (**self).fields_view_get(ctx, model, request)
    }
}

/// Default resolution straight from the stored catalog, no customization.
#[derive(Clone)]
pub struct CatalogViewResolver {
    db: Arc<Database>,
}

impl CatalogViewResolver {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl ViewResolver for CatalogViewResolver {
    fn fields_view_get(
        &self,
        _ctx: &RequestContext,
        model: &str,
        request: &ViewRequest,
    ) -> Result<ViewResult> {
        let record = self
            .db
            .get_model_by_name(model)?
            .ok_or_else(|| Error::NotFound(format!("model '{}'", model)))?;
        let fields = self.db.list_fields(record.id)?;

        let stored = match request.view_id {
            Some(view_id) => {
                let view = self
                    .db
                    .get_view(view_id)?
                    .filter(|view| view.model == record.id)
                    .ok_or_else(|| {
                        Error::NotFound(format!("view {} of model '{}'", view_id, model))
                    })?;
                Some(view)
            }
            None => {
                let view_type = request.view_type.unwrap_or(ViewType::Form);
                self.db.find_view(record.id, view_type)?
            }
        };

        let (view_id, view_type, arch) = match stored {
            Some(view) => (Some(view.id), view.view_type, view.arch),
            None => {
                let view_type = request.view_type.unwrap_or(ViewType::Form);
                let arch = synthesize_arch(view_type, &fields)?.ok_or_else(|| {
                    Error::NotFound(format!("{} view of model '{}'", view_type, model))
                })?;
                (None, view_type, arch)
            }
        };

        let fields = collect_fields(&arch, &fields, request.level_for(view_type))?;

        Ok(ViewResult {
            model: model.to_string(),
            view_id,
            view_type,
            arch,
            fields,
            field_childs: None,
        })
    }
}
