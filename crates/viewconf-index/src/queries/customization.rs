use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use viewconf_types::{Customization, CustomizationId, ModelId, UserId, ViewId};

use crate::{CustomizationChanges, CustomizationFilter, Result, UserMatch, ViewMatch};

const CUSTOMIZATION_COLUMNS: &str = r#"
    SELECT c.id, c.model_id, m.name, c.view_id, c.user_id, c.created_at, c.updated_at
    FROM customizations c
    JOIN models m ON c.model_id = m.id
"#;

fn customization_from_row(row: &Row<'_>) -> rusqlite::Result<Customization> {
    Ok(Customization {
        id: CustomizationId::new(row.get(0)?),
        model: ModelId::new(row.get(1)?),
        model_name: row.get(2)?,
        view: row.get::<_, Option<i64>>(3)?.map(ViewId::new),
        user: row.get::<_, Option<i64>>(4)?.map(UserId::new),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub fn insert(
    conn: &Connection,
    model: ModelId,
    view: Option<ViewId>,
    user: Option<UserId>,
    now: &str,
) -> Result<CustomizationId> {
    conn.execute(
        r#"
        INSERT INTO customizations (model_id, view_id, user_id, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?4)
        "#,
        params![model.get(), view.map(ViewId::get), user.map(UserId::get), now],
    )?;

    Ok(CustomizationId::new(conn.last_insert_rowid()))
}

pub fn update(
    conn: &Connection,
    id: CustomizationId,
    changes: &CustomizationChanges,
    now: &str,
) -> Result<usize> {
    let mut assignments = vec!["updated_at = ?"];
    let mut values: Vec<Value> = vec![Value::Text(now.to_string())];

    if let Some(view) = changes.view {
        assignments.push("view_id = ?");
        values.push(view.map_or(Value::Null, |v| Value::Integer(v.get())));
    }
    if let Some(user) = changes.user {
        assignments.push("user_id = ?");
        values.push(user.map_or(Value::Null, |u| Value::Integer(u.get())));
    }
    values.push(Value::Integer(id.get()));

    let query = format!(
        "UPDATE customizations SET {} WHERE id = ?",
        assignments.join(", ")
    );
    let updated = conn.execute(&query, params_from_iter(values.iter()))?;

    Ok(updated)
}

pub fn get(conn: &Connection, id: CustomizationId) -> Result<Option<Customization>> {
    let query = format!("{} WHERE c.id = ?1", CUSTOMIZATION_COLUMNS);
    let result = conn
        .query_row(&query, [id.get()], customization_from_row)
        .optional()?;

    Ok(result)
}

pub fn find(conn: &Connection, filter: &CustomizationFilter<'_>) -> Result<Vec<Customization>> {
    let mut where_clauses = vec!["m.name = ?"];
    let mut values: Vec<Value> = vec![Value::Text(filter.model_name.to_string())];

    match filter.view {
        ViewMatch::Any => {}
        ViewMatch::Exactly(Some(view)) => {
            where_clauses.push("c.view_id = ?");
            values.push(Value::Integer(view.get()));
        }
        ViewMatch::Exactly(None) => where_clauses.push("c.view_id IS NULL"),
    }

    let order_clause = match filter.user {
        UserMatch::Exactly(Some(user)) => {
            where_clauses.push("c.user_id = ?");
            values.push(Value::Integer(user.get()));
            "ORDER BY c.id"
        }
        UserMatch::Exactly(None) | UserMatch::OwnOrDefault(None) => {
            where_clauses.push("c.user_id IS NULL");
            "ORDER BY c.id"
        }
        UserMatch::OwnOrDefault(Some(user)) => {
            where_clauses.push("(c.user_id = ? OR c.user_id IS NULL)");
            values.push(Value::Integer(user.get()));
            // Rows owned by the user win over the shared default
            "ORDER BY c.user_id IS NULL, c.id"
        }
    };

    let limit_clause = filter
        .limit
        .map(|l| format!("LIMIT {}", l))
        .unwrap_or_default();

    let query = format!(
        "{} WHERE {} {} {}",
        CUSTOMIZATION_COLUMNS,
        where_clauses.join(" AND "),
        order_clause,
        limit_clause
    );

    let mut stmt = conn.prepare(&query)?;
    let customizations = stmt
        .query_map(params_from_iter(values.iter()), customization_from_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(customizations)
}

pub fn list(conn: &Connection) -> Result<Vec<Customization>> {
    let query = format!("{} ORDER BY m.name, c.id", CUSTOMIZATION_COLUMNS);
    let mut stmt = conn.prepare(&query)?;
    let customizations = stmt
        .query_map([], customization_from_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(customizations)
}

/// Removes a customization together with its lines and snapshot entries.
pub fn delete_cascade(conn: &Connection, id: CustomizationId) -> Result<usize> {
    conn.execute(
        r#"
        DELETE FROM field_lines WHERE customization_id = ?1
        "#,
        [id.get()],
    )?;
    conn.execute(
        "DELETE FROM button_lines WHERE customization_id = ?1",
        [id.get()],
    )?;
    // Line ids no longer referenced by either concrete table
    conn.execute(
        r#"
        DELETE FROM line_ids
        WHERE id NOT IN (SELECT id FROM field_lines)
          AND id NOT IN (SELECT id FROM button_lines)
        "#,
        [],
    )?;
    conn.execute(
        "DELETE FROM snapshots WHERE customization_id = ?1",
        [id.get()],
    )?;
    let deleted = conn.execute("DELETE FROM customizations WHERE id = ?1", [id.get()])?;

    Ok(deleted)
}
