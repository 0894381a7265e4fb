use anyhow::{Context, Result, bail};
use std::path::Path;
use viewconf_runtime::Catalog;

use crate::context::ExecutionContext;
use crate::presentation::view_models::{
    ImportViewModel, ModelListViewModel, ModelSummary, ViewListViewModel, ViewSummary,
};

pub fn import(ctx: &ExecutionContext, file: &Path) -> Result<()> {
    let catalog = Catalog::load(file)
        .with_context(|| format!("Failed to read catalog {}", file.display()))?;
    let summary = ctx.workspace()?.import_catalog(&catalog)?;

    ctx.renderer().render(&ImportViewModel {
        source: file.display().to_string(),
        summary,
    })
}

pub fn models(ctx: &ExecutionContext) -> Result<()> {
    let db = ctx.workspace()?.database();

    let mut models = Vec::new();
    for model in db.list_models()? {
        models.push(ModelSummary {
            id: model.id.get(),
            fields: db.list_fields(model.id)?.len(),
            buttons: db.list_buttons(model.id)?.len(),
            views: db.list_views(model.id)?.len(),
            name: model.name,
            description: model.description,
        });
    }

    ctx.renderer().render(&ModelListViewModel { models })
}

pub fn views(ctx: &ExecutionContext, model: &str) -> Result<()> {
    let db = ctx.workspace()?.database();
    let Some(record) = db.get_model_by_name(model)? else {
        bail!("Unknown model '{}'", model);
    };

    let views = db
        .list_views(record.id)?
        .into_iter()
        .map(|view| ViewSummary {
            id: view.id.get(),
            name: view.name,
            view_type: view.view_type,
            priority: view.priority,
        })
        .collect();

    ctx.renderer().render(&ViewListViewModel {
        model: record.name,
        views,
    })
}
