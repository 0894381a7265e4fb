use anyhow::{Result, bail};
use viewconf_types::{CustomizationId, LineId, LineOptions, LineValues, NewLine};

use crate::args::LineOptionArgs;
use crate::context::ExecutionContext;
use crate::presentation::view_models::{LinesCreatedViewModel, MessageViewModel};

pub fn add(
    ctx: &ExecutionContext,
    customization: i64,
    field: Option<&str>,
    button: Option<&str>,
    options: &LineOptionArgs,
) -> Result<()> {
    let workspace = ctx.workspace()?;
    let customization = workspace
        .configurator()
        .get(CustomizationId::new(customization))?;
    let db = workspace.database();

    let payload = match (field, button) {
        (Some(name), _) => {
            let Some(field) = db
                .list_fields(customization.model)?
                .into_iter()
                .find(|f| f.name == name)
            else {
                bail!("Model {} has no field '{}'", customization.model_name, name);
            };
            NewLine::field(customization.id, field.id)
        }
        (None, Some(name)) => {
            let Some(button) = db
                .list_buttons(customization.model)?
                .into_iter()
                .find(|b| b.name == name)
            else {
                bail!("Model {} has no button '{}'", customization.model_name, name);
            };
            NewLine::button(customization.id, button.id)
        }
        (None, None) => bail!("Pass --field or --button"),
    };

    let ids = workspace
        .configurator()
        .create_lines(vec![payload.with_options(line_options(options))])?;
    ctx.renderer().render(&LinesCreatedViewModel { ids })
}

pub fn set(ctx: &ExecutionContext, ids: &[i64], options: &LineOptionArgs) -> Result<()> {
    let values = line_values(options);
    if values.is_empty() {
        bail!("Nothing to change: pass at least one line option");
    }

    let ids: Vec<LineId> = ids.iter().copied().map(LineId::new).collect();
    let count = ids.len();
    ctx.workspace()?
        .configurator()
        .write_lines(&[(ids, values)])?;

    ctx.renderer().render(&MessageViewModel {
        message: format!("Updated {} line(s)", count),
    })
}

pub fn remove(ctx: &ExecutionContext, ids: &[i64]) -> Result<()> {
    let ids: Vec<LineId> = ids.iter().copied().map(LineId::new).collect();
    ctx.workspace()?.configurator().delete_lines(&ids)?;

    ctx.renderer().render(&MessageViewModel {
        message: format!("Removed {} line(s)", ids.len()),
    })
}

// Options of a new line; unspecified flags take the line defaults
fn line_options(args: &LineOptionArgs) -> LineOptions {
    LineOptions {
        sequence: args.sequence,
        expand: args.expand,
        optional: args.optional.map(Into::into).unwrap_or_default(),
        searchable: args.searchable.unwrap_or(false),
        sum: args.sum.unwrap_or(false),
    }
}

fn line_values(args: &LineOptionArgs) -> LineValues {
    LineValues {
        sequence: args.sequence.map(Some),
        expand: args.expand.map(Some),
        optional: args.optional.map(Into::into),
        searchable: args.searchable,
        sum: args.sum,
    }
}
