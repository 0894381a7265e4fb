use anyhow::Result;
use viewconf_types::{CustomizationId, UserId, ViewId};

use crate::context::ExecutionContext;
use crate::presentation::view_models::{
    CountViewModel, CustomizationDetailViewModel, CustomizationListViewModel, CustomizationRef,
    MessageViewModel,
};

pub fn get(ctx: &ExecutionContext, model: &str, view: &str) -> Result<()> {
    let request = ctx.request()?;
    let id = ctx
        .workspace()?
        .configurator()
        .get_custom_view(&request, model, view)?;

    ctx.renderer().render(&CustomizationRef {
        id,
        model: model.to_string(),
        action: "Using",
    })
}

pub fn create(
    ctx: &ExecutionContext,
    model: &str,
    view: Option<i64>,
    for_all_users: bool,
) -> Result<()> {
    let user = if for_all_users { None } else { ctx.user()? };
    let id = ctx
        .workspace()?
        .configurator()
        .create(model, view.map(ViewId::new), user)?;

    ctx.renderer().render(&CustomizationRef {
        id,
        model: model.to_string(),
        action: "Created",
    })
}

pub fn list(ctx: &ExecutionContext, model: Option<&str>) -> Result<()> {
    let customizations = ctx
        .workspace()?
        .database()
        .list_customizations()?
        .into_iter()
        .filter(|c| model.is_none_or(|name| c.model_name == name))
        .collect();

    ctx.renderer()
        .render(&CustomizationListViewModel { customizations })
}

pub fn show(ctx: &ExecutionContext, id: i64) -> Result<()> {
    let id = CustomizationId::new(id);
    let request = ctx.request()?;
    let configurator = ctx.workspace()?.configurator();

    let customization = configurator.get(id)?;
    let lines = configurator.lines(id)?;
    let pending = configurator
        .difference(id)?
        .lines
        .iter()
        .map(|line| line.name().to_string())
        .collect();
    let arch = configurator.generate_arch(&request, id)?;

    ctx.renderer().render(&CustomizationDetailViewModel {
        customization,
        lines,
        pending,
        arch,
    })
}

pub fn snapshot(ctx: &ExecutionContext, ids: &[i64]) -> Result<()> {
    let ids: Vec<CustomizationId> = ids.iter().copied().map(CustomizationId::new).collect();
    let count = ctx.workspace()?.configurator().do_snapshot(&ids)?;

    ctx.renderer().render(&CountViewModel {
        count,
        message: "Lines added:",
    })
}

pub fn copy(ctx: &ExecutionContext, id: i64, to_user: Option<i64>) -> Result<()> {
    let user = match to_user {
        Some(user) => Some(UserId::new(user)),
        None => ctx.user()?,
    };
    let configurator = ctx.workspace()?.configurator();
    let new_id = configurator.copy(CustomizationId::new(id), user)?;
    let copy = configurator.get(new_id)?;

    ctx.renderer().render(&CustomizationRef {
        id: new_id,
        model: copy.model_name,
        action: "Copied to",
    })
}

pub fn delete(ctx: &ExecutionContext, ids: &[i64]) -> Result<()> {
    let ids: Vec<CustomizationId> = ids.iter().copied().map(CustomizationId::new).collect();
    ctx.workspace()?.configurator().delete(&ids)?;

    ctx.renderer().render(&MessageViewModel {
        message: format!("Deleted {} customization(s)", ids.len()),
    })
}
