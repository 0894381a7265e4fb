use anyhow::Result;
use viewconf_engine::parse_arch;
use viewconf_runtime::{ViewRequest, ViewResolver};
use viewconf_types::ViewId;

use crate::context::ExecutionContext;
use crate::presentation::view_models::{MessageViewModel, ViewViewModel};
use crate::types::{ColumnVisibility, ViewTypeArg};

pub fn get(
    ctx: &ExecutionContext,
    model: &str,
    view_id: Option<i64>,
    view_type: Option<ViewTypeArg>,
    level: Option<u32>,
    default: bool,
) -> Result<()> {
    let request = ViewRequest {
        view_id: view_id.map(ViewId::new),
        view_type: view_type.map(Into::into),
        level,
    };
    let mut request_ctx = ctx.request()?;
    if default {
        request_ctx = request_ctx.avoiding_custom_view();
    }

    let result = ctx
        .workspace()?
        .views()
        .fields_view_get(&request_ctx, model, &request)?;
    let columns = parse_arch(&result.arch)?.elements;

    ctx.renderer().render(&ViewViewModel { result, columns })
}

pub fn optional(
    ctx: &ExecutionContext,
    view_id: i64,
    field: &str,
    visibility: ColumnVisibility,
) -> Result<()> {
    let request = ctx.request()?;
    ctx.workspace()?.configurator().set_column_visibility(
        &request,
        ViewId::new(view_id),
        field,
        visibility.hidden(),
    )?;

    let message = match visibility {
        ColumnVisibility::Show => format!("Column {} shown", field),
        ColumnVisibility::Hide => format!("Column {} hidden", field),
        ColumnVisibility::Clear => format!("Column {} back to its default", field),
    };
    ctx.renderer().render(&MessageViewModel { message })
}
