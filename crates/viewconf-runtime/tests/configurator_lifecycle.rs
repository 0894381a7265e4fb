use anyhow::Result;
use viewconf_index::{CustomizationChanges, NewView};
use viewconf_runtime::{Error, RequestContext, ViewConf};
use viewconf_testing::TestWorld;
use viewconf_testing::assertions::{arch_names, assert_arch_names, assert_column_attribute};
use viewconf_testing::fixtures::{
    ATTACHMENT, ATTACHMENT_TREE_COLUMNS, USER, sample_catalog,
};
use viewconf_types::{
    FieldId, LineKind, LineValues, ModelId, NewLine, OptionalMode, UserId, ViewId, ViewType,
};

fn setup() -> Result<(TestWorld, ViewConf)> {
    let world = TestWorld::new().with_sample_catalog()?;
    let workspace = world.open()?;
    Ok((world, workspace))
}

fn user(id: i64) -> RequestContext {
    RequestContext::new(Some(UserId::new(id)))
}

fn model_id(workspace: &ViewConf, name: &str) -> Result<ModelId> {
    Ok(workspace
        .database()
        .get_model_by_name(name)?
        .map(|m| m.id)
        .expect("model in sample catalog"))
}

fn field_id(workspace: &ViewConf, model: &str, name: &str) -> Result<FieldId> {
    let model = model_id(workspace, model)?;
    Ok(workspace
        .database()
        .list_fields(model)?
        .into_iter()
        .find(|f| f.name == name)
        .map(|f| f.id)
        .expect("field in sample catalog"))
}

fn view_id(workspace: &ViewConf, model: &str, view_type: ViewType) -> Result<ViewId> {
    let model = model_id(workspace, model)?;
    Ok(workspace
        .database()
        .find_view(model, view_type)?
        .map(|v| v.id)
        .expect("view in sample catalog"))
}

#[test]
fn test_new_customization_mirrors_default_tree() -> Result<()> {
    let (_world, workspace) = setup()?;
    let configurator = workspace.configurator();

    let id = configurator.resolve_or_create(&RequestContext::default(), ATTACHMENT, None)?;

    let lines = configurator.lines(id)?;
    let names: Vec<_> = lines.iter().map(|l| l.name()).collect();
    assert_eq!(names, ATTACHMENT_TREE_COLUMNS);
    assert!(lines.iter().all(|l| l.kind() == LineKind::Field));
    assert!(lines.iter().all(|l| l.options.sequence == Some(100)));
    assert!(lines.iter().all(|l| l.options.optional == OptionalMode::Unset));

    let snapshot = workspace.database().list_snapshot(id)?;
    assert_eq!(snapshot.len(), ATTACHMENT_TREE_COLUMNS.len());
    assert!(configurator.difference(id)?.is_empty());

    let arch = configurator.generate_arch(&RequestContext::default(), id)?;
    assert_eq!(
        arch,
        r#"<tree><field name="resource"/><field name="name"/><field name="summary"/><field name="type"/><field name="last_user"/><field name="last_modification" widget="date"/><field name="last_modification" widget="time"/></tree>"#
    );
    Ok(())
}

#[test]
fn test_resolve_is_idempotent() -> Result<()> {
    let (_world, workspace) = setup()?;
    let configurator = workspace.configurator();
    let ctx = user(7);

    let first = configurator.resolve_or_create(&ctx, ATTACHMENT, None)?;
    let lines = configurator.lines(first)?.len();

    assert_eq!(configurator.resolve_or_create(&ctx, ATTACHMENT, None)?, first);
    assert_eq!(configurator.get_custom_view(&ctx, ATTACHMENT, "null")?, first);
    assert_eq!(configurator.get_custom_view(&ctx, ATTACHMENT, "0")?, first);

    assert_eq!(workspace.database().list_customizations()?.len(), 1);
    assert_eq!(configurator.lines(first)?.len(), lines);
    Ok(())
}

#[test]
fn test_customizations_are_per_user() -> Result<()> {
    let (_world, workspace) = setup()?;
    let configurator = workspace.configurator();

    let default = configurator.resolve_or_create(&RequestContext::default(), ATTACHMENT, None)?;
    let own = configurator.resolve_or_create(&user(7), ATTACHMENT, None)?;
    assert_ne!(default, own);
    assert_eq!(configurator.get(own)?.user, Some(UserId::new(7)));
    assert_eq!(configurator.get(default)?.user, None);

    let found = configurator.lookup(&user(7), ATTACHMENT, None)?.map(|c| c.id);
    assert_eq!(found, Some(own));
    let fallback = configurator.lookup(&user(8), ATTACHMENT, None)?.map(|c| c.id);
    assert_eq!(fallback, Some(default));
    Ok(())
}

#[test]
fn test_dropped_resources_stay_dropped() -> Result<()> {
    let (_world, workspace) = setup()?;
    let configurator = workspace.configurator();
    let ctx = RequestContext::default();
    let id = configurator.resolve_or_create(&ctx, ATTACHMENT, None)?;

    let summary = configurator
        .lines(id)?
        .into_iter()
        .find(|l| l.name() == "summary")
        .and_then(|l| l.id)
        .expect("summary line");
    configurator.delete_lines(&[summary])?;

    assert_eq!(configurator.do_snapshot(&[id])?, 0);
    assert!(configurator.difference(id)?.is_empty());

    let arch = configurator.generate_arch(&ctx, id)?;
    assert!(!arch_names(&arch)?.contains(&"summary".to_string()));
    Ok(())
}

#[test]
fn test_new_default_columns_are_appended() -> Result<()> {
    let (_world, workspace) = setup()?;
    let configurator = workspace.configurator();
    let ctx = RequestContext::default();
    let id = configurator.resolve_or_create(&ctx, ATTACHMENT, None)?;

    let mut catalog = sample_catalog()?;
    catalog.models[0].views[0].arch =
        r#"<tree><field name="name"/><field name="description"/><field name="type"/></tree>"#
            .to_string();
    workspace.import_catalog(&catalog)?;

    // Pending before the snapshot is taken
    let difference = configurator.difference(id)?;
    assert_eq!(difference.len(), 1);
    let arch = configurator.generate_arch(&ctx, id)?;
    assert_eq!(arch_names(&arch)?.last().map(String::as_str), Some("description"));

    assert_eq!(configurator.do_snapshot(&[id])?, 1);
    assert!(configurator.difference(id)?.is_empty());
    assert_eq!(configurator.do_snapshot(&[id])?, 0);

    let lines = configurator.lines(id)?;
    assert_eq!(lines.last().map(|l| l.name()), Some("description"));
    assert_eq!(lines.len(), ATTACHMENT_TREE_COLUMNS.len() + 1);
    Ok(())
}

#[test]
fn test_buttons_follow_fields() -> Result<()> {
    let (_world, workspace) = setup()?;
    let configurator = workspace.configurator();
    let ctx = RequestContext::default();
    let id = configurator.resolve_or_create(&ctx, USER, None)?;

    let lines = configurator.lines(id)?;
    let kinds: Vec<_> = lines.iter().map(|l| (l.name(), l.kind())).collect();
    assert_eq!(
        kinds,
        vec![
            ("name", LineKind::Field),
            ("login", LineKind::Field),
            ("sessions", LineKind::Field),
            ("reset_password", LineKind::Button),
        ]
    );
    assert_eq!(lines[3].options.sequence, Some(900));

    let arch = configurator.generate_arch(&ctx, id)?;
    assert_eq!(
        arch,
        r#"<tree><field name="name"/><field name="login"/><field name="sessions"/><button name="reset_password"/></tree>"#
    );
    Ok(())
}

#[test]
fn test_line_options_render() -> Result<()> {
    let (_world, workspace) = setup()?;
    let configurator = workspace.configurator();
    let ctx = RequestContext::default();
    let id = configurator.resolve_or_create(&ctx, USER, None)?;

    let lines = configurator.lines(id)?;
    let sessions = lines[2].id.expect("persisted");
    let name = lines[0].id.expect("persisted");
    configurator.write_lines(&[
        (
            vec![sessions],
            LineValues {
                sum: Some(true),
                expand: Some(Some(2)),
                ..LineValues::default()
            },
        ),
        (
            vec![name],
            LineValues {
                sequence: Some(Some(500)),
                searchable: Some(true),
                ..LineValues::default()
            },
        ),
    ])?;

    let arch = configurator.generate_arch(&ctx, id)?;
    assert_arch_names(&arch, &["login", "sessions", "name", "reset_password"])?;
    assert_column_attribute(&arch, "sessions", "sum", "1")?;
    assert_column_attribute(&arch, "sessions", "expand", "2")?;
    assert_column_attribute(&arch, "name", "tree_invisible", "1")?;
    Ok(())
}

#[test]
fn test_copy_keeps_lines_and_snapshot() -> Result<()> {
    let (_world, workspace) = setup()?;
    let configurator = workspace.configurator();
    let id = configurator.resolve_or_create(&RequestContext::default(), ATTACHMENT, None)?;

    let lines = configurator.lines(id)?;
    let summary = lines.iter().find(|l| l.name() == "summary").and_then(|l| l.id);
    configurator.delete_lines(&summary.into_iter().collect::<Vec<_>>())?;
    let name = lines.iter().find(|l| l.name() == "name").and_then(|l| l.id);
    configurator.write_lines(&[(
        name.into_iter().collect(),
        LineValues {
            expand: Some(Some(3)),
            ..LineValues::default()
        },
    )])?;

    let copy = configurator.copy(id, Some(UserId::new(9)))?;
    assert_ne!(copy, id);
    assert_eq!(configurator.get(copy)?.user, Some(UserId::new(9)));

    let source_lines = configurator.lines(id)?;
    let copied_lines = configurator.lines(copy)?;
    let source: Vec<_> = source_lines.iter().map(|l| (l.name(), &l.options)).collect();
    let copied: Vec<_> = copied_lines.iter().map(|l| (l.name(), &l.options)).collect();
    assert_eq!(copied, source);

    assert!(configurator.difference(copy)?.is_empty());
    assert_eq!(
        workspace.database().list_snapshot(copy)?.len(),
        ATTACHMENT_TREE_COLUMNS.len()
    );
    Ok(())
}

#[test]
fn test_delete_cascades() -> Result<()> {
    let (_world, workspace) = setup()?;
    let configurator = workspace.configurator();
    let id = configurator.resolve_or_create(&RequestContext::default(), ATTACHMENT, None)?;

    configurator.delete(&[id])?;

    assert!(matches!(configurator.get(id), Err(Error::NotFound(_))));
    assert!(matches!(configurator.lines(id), Err(Error::NotFound(_))));
    assert!(workspace.database().list_lines(id)?.is_empty());
    assert!(workspace.database().list_snapshot(id)?.is_empty());
    assert!(matches!(configurator.delete(&[id]), Err(Error::NotFound(_))));
    Ok(())
}

#[test]
fn test_lines_must_target_the_customized_model() -> Result<()> {
    let (_world, workspace) = setup()?;
    let configurator = workspace.configurator();
    let id = configurator.resolve_or_create(&RequestContext::default(), ATTACHMENT, None)?;

    let login = field_id(&workspace, USER, "login")?;
    let err = configurator
        .create_lines(vec![NewLine::field(id, login)])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(msg) if msg.contains("login")));

    let mut missing = NewLine::field(id, login);
    missing.field = None;
    let err = configurator.create_lines(vec![missing]).unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));

    let data = field_id(&workspace, ATTACHMENT, "data")?;
    let created = configurator.create_lines(vec![NewLine::field(id, data)])?;
    assert_eq!(created.len(), 1);
    // Explicit lines without a sequence sort first
    assert_eq!(configurator.lines(id)?[0].name(), "data");
    Ok(())
}

#[test]
fn test_base_view_must_be_a_tree() -> Result<()> {
    let (_world, workspace) = setup()?;
    let configurator = workspace.configurator();
    let ctx = RequestContext::default();

    let form = view_id(&workspace, ATTACHMENT, ViewType::Form)?;
    let err = configurator
        .resolve_or_create(&ctx, ATTACHMENT, Some(form))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));

    let foreign = view_id(&workspace, USER, ViewType::Tree)?;
    let err = configurator
        .resolve_or_create(&ctx, ATTACHMENT, Some(foreign))
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = configurator
        .resolve_or_create(&ctx, "ir.unknown", None)
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(workspace.database().list_customizations()?.is_empty());
    Ok(())
}

#[test]
fn test_write_moves_customization() -> Result<()> {
    let (_world, workspace) = setup()?;
    let configurator = workspace.configurator();
    let id = configurator.resolve_or_create(&RequestContext::default(), ATTACHMENT, None)?;
    let tree = view_id(&workspace, ATTACHMENT, ViewType::Tree)?;

    configurator.write(
        id,
        &CustomizationChanges {
            view: Some(Some(tree)),
            user: Some(Some(UserId::new(3))),
        },
    )?;
    let customization = configurator.get(id)?;
    assert_eq!(customization.view, Some(tree));
    assert_eq!(customization.user, Some(UserId::new(3)));

    let form = view_id(&workspace, ATTACHMENT, ViewType::Form)?;
    let err = configurator
        .write(
            id,
            &CustomizationChanges {
                view: Some(Some(form)),
                user: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
    Ok(())
}

#[test]
fn test_column_preferences_apply_per_user() -> Result<()> {
    let (_world, workspace) = setup()?;
    let configurator = workspace.configurator();
    let owner = user(5);
    let tree = view_id(&workspace, ATTACHMENT, ViewType::Tree)?;
    let id = configurator.resolve_or_create(&owner, ATTACHMENT, Some(tree))?;

    let line = configurator
        .lines(id)?
        .into_iter()
        .find(|l| l.name() == "type")
        .and_then(|l| l.id)
        .expect("type line");
    configurator.write_lines(&[(
        vec![line],
        LineValues {
            optional: Some(OptionalMode::Show),
            ..LineValues::default()
        },
    )])?;

    configurator.set_column_visibility(&owner, tree, "type", Some(true))?;
    let arch = configurator.generate_arch(&owner, id)?;
    assert_column_attribute(&arch, "type", "optional", "1")?;

    // Another user sees the line default
    let arch = configurator.generate_arch(&user(6), id)?;
    assert_column_attribute(&arch, "type", "optional", "0")?;

    configurator.set_column_visibility(&owner, tree, "type", None)?;
    let arch = configurator.generate_arch(&owner, id)?;
    assert_column_attribute(&arch, "type", "optional", "0")?;

    let err = configurator
        .set_column_visibility(&RequestContext::default(), tree, "type", Some(true))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
    Ok(())
}

#[test]
fn test_customizations_survive_reopen() -> Result<()> {
    let (world, workspace) = setup()?;
    let id = workspace
        .configurator()
        .resolve_or_create(&RequestContext::default(), ATTACHMENT, None)?;
    drop(workspace);

    let reopened = world.open()?;
    let lines = reopened.configurator().lines(id)?;
    assert_eq!(lines.len(), ATTACHMENT_TREE_COLUMNS.len());

    // Re-importing the same catalog keeps every id stable
    reopened.import_catalog(&sample_catalog()?)?;
    assert!(reopened.configurator().difference(id)?.is_empty());

    let emptied = NewView {
        name: "attachment_view_tree".to_string(),
        view_type: ViewType::Tree,
        priority: 16,
        arch: "<tree/>".to_string(),
    };
    let model = model_id(&reopened, ATTACHMENT)?;
    reopened.database().upsert_view(model, &emptied)?;
    assert!(reopened.configurator().difference(id)?.is_empty());
    Ok(())
}
