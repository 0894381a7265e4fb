use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashMap;
use viewconf_types::{
    ButtonId, FieldId, FieldKind, ModelButton, ModelField, ModelId, ModelRecord, UserId, ViewId,
    ViewRecord, ViewType,
};

use super::conversion_error;
use crate::{NewButton, NewField, NewView, Result};

pub fn upsert_model(conn: &Connection, name: &str, description: Option<&str>) -> Result<ModelId> {
    let id: i64 = conn.query_row(
        r#"
        INSERT INTO models (name, description)
        VALUES (?1, ?2)
        ON CONFLICT(name) DO UPDATE SET
            description = COALESCE(?2, description)
        RETURNING id
        "#,
        params![name, description],
        |row| row.get(0),
    )?;

    Ok(ModelId::new(id))
}

pub fn upsert_field(conn: &Connection, model: ModelId, field: &NewField) -> Result<FieldId> {
    let id: i64 = conn.query_row(
        r#"
        INSERT INTO model_fields (model_id, name, kind, relation, description)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(model_id, name) DO UPDATE SET
            kind = ?3,
            relation = ?4,
            description = COALESCE(?5, description)
        RETURNING id
        "#,
        params![
            model.get(),
            &field.name,
            field.kind.as_str(),
            &field.relation,
            &field.description
        ],
        |row| row.get(0),
    )?;

    Ok(FieldId::new(id))
}

pub fn upsert_button(conn: &Connection, model: ModelId, button: &NewButton) -> Result<ButtonId> {
    let id: i64 = conn.query_row(
        r#"
        INSERT INTO model_buttons (model_id, name, description)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(model_id, name) DO UPDATE SET
            description = COALESCE(?3, description)
        RETURNING id
        "#,
        params![model.get(), &button.name, &button.description],
        |row| row.get(0),
    )?;

    Ok(ButtonId::new(id))
}

pub fn upsert_view(conn: &Connection, model: ModelId, view: &NewView) -> Result<ViewId> {
    let id: i64 = conn.query_row(
        r#"
        INSERT INTO views (model_id, view_type, name, priority, arch)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(model_id, name) DO UPDATE SET
            view_type = ?2,
            priority = ?4,
            arch = ?5
        RETURNING id
        "#,
        params![
            model.get(),
            view.view_type.as_str(),
            &view.name,
            view.priority,
            &view.arch
        ],
        |row| row.get(0),
    )?;

    Ok(ViewId::new(id))
}

fn model_from_row(row: &Row<'_>) -> rusqlite::Result<ModelRecord> {
    Ok(ModelRecord {
        id: ModelId::new(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

pub fn get_model(conn: &Connection, id: ModelId) -> Result<Option<ModelRecord>> {
    let result = conn
        .query_row(
            "SELECT id, name, description FROM models WHERE id = ?1",
            [id.get()],
            model_from_row,
        )
        .optional()?;

    Ok(result)
}

pub fn get_model_by_name(conn: &Connection, name: &str) -> Result<Option<ModelRecord>> {
    let result = conn
        .query_row(
            "SELECT id, name, description FROM models WHERE name = ?1",
            [name],
            model_from_row,
        )
        .optional()?;

    Ok(result)
}

pub fn list_models(conn: &Connection) -> Result<Vec<ModelRecord>> {
    let mut stmt = conn.prepare("SELECT id, name, description FROM models ORDER BY name")?;
    let models = stmt
        .query_map([], model_from_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(models)
}

fn field_from_row(row: &Row<'_>) -> rusqlite::Result<ModelField> {
    Ok(ModelField {
        id: FieldId::new(row.get(0)?),
        model: ModelId::new(row.get(1)?),
        name: row.get(2)?,
        kind: FieldKind::from(row.get::<_, String>(3)?),
        relation: row.get(4)?,
        description: row.get(5)?,
    })
}

pub fn list_fields(conn: &Connection, model: ModelId) -> Result<Vec<ModelField>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, model_id, name, kind, relation, description
        FROM model_fields
        WHERE model_id = ?1
        ORDER BY id
        "#,
    )?;
    let fields = stmt
        .query_map([model.get()], field_from_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(fields)
}

pub fn get_field(conn: &Connection, id: FieldId) -> Result<Option<ModelField>> {
    let result = conn
        .query_row(
            r#"
            SELECT id, model_id, name, kind, relation, description
            FROM model_fields
            WHERE id = ?1
            "#,
            [id.get()],
            field_from_row,
        )
        .optional()?;

    Ok(result)
}

fn button_from_row(row: &Row<'_>) -> rusqlite::Result<ModelButton> {
    Ok(ModelButton {
        id: ButtonId::new(row.get(0)?),
        model: ModelId::new(row.get(1)?),
        name: row.get(2)?,
        description: row.get(3)?,
    })
}

pub fn list_buttons(conn: &Connection, model: ModelId) -> Result<Vec<ModelButton>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, model_id, name, description
        FROM model_buttons
        WHERE model_id = ?1
        ORDER BY id
        "#,
    )?;
    let buttons = stmt
        .query_map([model.get()], button_from_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(buttons)
}

pub fn get_button(conn: &Connection, id: ButtonId) -> Result<Option<ModelButton>> {
    let result = conn
        .query_row(
            "SELECT id, model_id, name, description FROM model_buttons WHERE id = ?1",
            [id.get()],
            button_from_row,
        )
        .optional()?;

    Ok(result)
}

const VIEW_COLUMNS: &str = r#"
    SELECT v.id, v.model_id, m.name, v.view_type, v.name, v.priority, v.arch
    FROM views v
    JOIN models m ON v.model_id = m.id
"#;

fn view_from_row(row: &Row<'_>) -> rusqlite::Result<ViewRecord> {
    let code: String = row.get(3)?;
    Ok(ViewRecord {
        id: ViewId::new(row.get(0)?),
        model: ModelId::new(row.get(1)?),
        model_name: row.get(2)?,
        view_type: code.parse::<ViewType>().map_err(|err| conversion_error(3, err))?,
        name: row.get(4)?,
        priority: row.get(5)?,
        arch: row.get(6)?,
    })
}

pub fn get_view(conn: &Connection, id: ViewId) -> Result<Option<ViewRecord>> {
    let query = format!("{} WHERE v.id = ?1", VIEW_COLUMNS);
    let result = conn.query_row(&query, [id.get()], view_from_row).optional()?;

    Ok(result)
}

pub fn list_views(conn: &Connection, model: ModelId) -> Result<Vec<ViewRecord>> {
    let query = format!(
        "{} WHERE v.model_id = ?1 ORDER BY v.view_type, v.priority, v.id",
        VIEW_COLUMNS
    );
    let mut stmt = conn.prepare(&query)?;
    let views = stmt
        .query_map([model.get()], view_from_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(views)
}

/// Highest-priority view of the given type for a model.
pub fn find_view(
    conn: &Connection,
    model: ModelId,
    view_type: ViewType,
) -> Result<Option<ViewRecord>> {
    let query = format!(
        "{} WHERE v.model_id = ?1 AND v.view_type = ?2 ORDER BY v.priority, v.id LIMIT 1",
        VIEW_COLUMNS
    );
    let result = conn
        .query_row(&query, params![model.get(), view_type.as_str()], view_from_row)
        .optional()?;

    Ok(result)
}

pub fn set_tree_optional(
    conn: &Connection,
    view: ViewId,
    user: UserId,
    field: &str,
    value: bool,
) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO view_tree_optionals (view_id, user_id, field, value)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(view_id, user_id, field) DO UPDATE SET
            value = ?4
        "#,
        params![view.get(), user.get(), field, value],
    )?;

    Ok(())
}

pub fn clear_tree_optional(conn: &Connection, view: ViewId, user: UserId, field: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM view_tree_optionals WHERE view_id = ?1 AND user_id = ?2 AND field = ?3",
        params![view.get(), user.get(), field],
    )?;

    Ok(())
}

/// Column-visibility preferences of one user on one view, keyed by field name.
pub fn tree_optionals(conn: &Connection, view: ViewId, user: UserId) -> Result<HashMap<String, bool>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT field, value
        FROM view_tree_optionals
        WHERE view_id = ?1 AND user_id = ?2
        "#,
    )?;
    let prefs = stmt
        .query_map(params![view.get(), user.get()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
        })?
        .collect::<std::result::Result<HashMap<_, _>, rusqlite::Error>>()?;

    Ok(prefs)
}
