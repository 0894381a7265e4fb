use rusqlite::{Connection, params};
use viewconf_types::{ButtonId, CustomizationId, FieldId, ResourceRef, SnapshotEntry, SnapshotId};

use crate::{Error, Result};

pub fn list(conn: &Connection, customization: CustomizationId) -> Result<Vec<SnapshotEntry>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, customization_id, field_id, button_id
        FROM snapshots
        WHERE customization_id = ?1
        ORDER BY id
        "#,
    )?;

    let rows = stmt
        .query_map([customization.get()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, Option<i64>>(3)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    rows.into_iter()
        .map(|(id, customization, field, button)| {
            let resource = match (field, button) {
                (Some(field), None) => ResourceRef::Field(FieldId::new(field)),
                (None, Some(button)) => ResourceRef::Button(ButtonId::new(button)),
                _ => {
                    return Err(Error::Query(format!(
                        "snapshot {} must reference exactly one resource",
                        id
                    )));
                }
            };
            Ok(SnapshotEntry {
                id: Some(SnapshotId::new(id)),
                customization: CustomizationId::new(customization),
                resource,
            })
        })
        .collect()
}

pub fn insert_many(conn: &Connection, entries: &[SnapshotEntry]) -> Result<Vec<SnapshotId>> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO snapshots (customization_id, field_id, button_id)
        VALUES (?1, ?2, ?3)
        "#,
    )?;

    let mut ids = Vec::with_capacity(entries.len());
    for entry in entries {
        let (field, button) = match entry.resource {
            ResourceRef::Field(field) => (Some(field.get()), None),
            ResourceRef::Button(button) => (None, Some(button.get())),
        };
        stmt.execute(params![entry.customization.get(), field, button])?;
        ids.push(SnapshotId::new(conn.last_insert_rowid()));
    }

    Ok(ids)
}
