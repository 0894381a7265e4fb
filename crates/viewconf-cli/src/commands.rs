use super::args::{CatalogCommand, Cli, Commands, CustomViewCommand, LineCommand, ViewCommand};
use super::context::ExecutionContext;
use super::handlers;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    let ctx = ExecutionContext::new(cli.data_dir.as_deref(), cli.user, cli.format)?;

    match cli.command {
        Commands::Catalog { command } => match command {
            CatalogCommand::Import { file } => handlers::catalog::import(&ctx, &file),
            CatalogCommand::Models => handlers::catalog::models(&ctx),
            CatalogCommand::Views { model } => handlers::catalog::views(&ctx, &model),
        },

        Commands::CustomView { command } => match command {
            CustomViewCommand::Get { model, view } => {
                handlers::custom_view::get(&ctx, &model, &view)
            }
            CustomViewCommand::Create {
                model,
                view,
                for_all_users,
            } => handlers::custom_view::create(&ctx, &model, view, for_all_users),
            CustomViewCommand::List { model } => {
                handlers::custom_view::list(&ctx, model.as_deref())
            }
            CustomViewCommand::Show { id } => handlers::custom_view::show(&ctx, id),
            CustomViewCommand::Snapshot { ids } => handlers::custom_view::snapshot(&ctx, &ids),
            CustomViewCommand::Copy { id, to_user } => {
                handlers::custom_view::copy(&ctx, id, to_user)
            }
            CustomViewCommand::Delete { ids } => handlers::custom_view::delete(&ctx, &ids),
        },

        Commands::Line { command } => match command {
            LineCommand::Add {
                customization,
                field,
                button,
                options,
            } => handlers::line::add(
                &ctx,
                customization,
                field.as_deref(),
                button.as_deref(),
                &options,
            ),
            LineCommand::Set { ids, options } => handlers::line::set(&ctx, &ids, &options),
            LineCommand::Remove { ids } => handlers::line::remove(&ctx, &ids),
        },

        Commands::View { command } => match command {
            ViewCommand::Get {
                model,
                view_id,
                view_type,
                level,
                default,
            } => handlers::view::get(&ctx, &model, view_id, view_type, level, default),
            ViewCommand::Optional {
                view_id,
                field,
                visibility,
            } => handlers::view::optional(&ctx, view_id, &field, visibility),
        },
    }
}
