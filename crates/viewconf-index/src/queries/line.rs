use rusqlite::{Connection, OptionalExtension, Row};
use viewconf_types::{
    ButtonId, CustomizationId, FieldId, FieldKind, Line, LineId, LineKind, LineOptions,
    LineTarget, ModelButton, ModelField, ModelId, OptionalMode,
};

use super::conversion_error;
use crate::{Error, Result};

const LINE_COLUMNS: &str = r#"
    SELECT l.id, l.customization_id, l.kind, l.sequence, l.expand, l.optional, l.searchable, l."sum",
           f.id, f.model_id, f.name, f.kind, f.relation, f.description,
           b.id, b.model_id, b.name, b.description
    FROM lines l
    LEFT JOIN model_fields f ON l.field_id = f.id
    LEFT JOIN model_buttons b ON l.button_id = b.id
"#;

fn line_from_row(row: &Row<'_>) -> rusqlite::Result<Option<Line>> {
    let kind = row
        .get::<_, String>(2)?
        .parse::<LineKind>()
        .map_err(|err| conversion_error(2, err))?;
    let optional = OptionalMode::from_code(row.get::<_, Option<String>>(5)?.as_deref())
        .map_err(|err| conversion_error(5, err))?;

    let target = match kind {
        LineKind::Field => match row.get::<_, Option<i64>>(8)? {
            Some(id) => LineTarget::Field(ModelField {
                id: FieldId::new(id),
                model: ModelId::new(row.get(9)?),
                name: row.get(10)?,
                kind: FieldKind::from(row.get::<_, String>(11)?),
                relation: row.get(12)?,
                description: row.get(13)?,
            }),
            None => return Ok(None),
        },
        LineKind::Button => match row.get::<_, Option<i64>>(14)? {
            Some(id) => LineTarget::Button(ModelButton {
                id: ButtonId::new(id),
                model: ModelId::new(row.get(15)?),
                name: row.get(16)?,
                description: row.get(17)?,
            }),
            None => return Ok(None),
        },
    };

    Ok(Some(Line {
        id: Some(LineId::new(row.get(0)?)),
        customization: CustomizationId::new(row.get(1)?),
        target,
        options: LineOptions {
            sequence: row.get(3)?,
            expand: row.get(4)?,
            optional,
            searchable: row.get(6)?,
            sum: row.get(7)?,
        },
    }))
}

/// Lines of a customization in display order: sequence (unset first), then insertion.
///
/// Lines whose resource vanished from the catalog are left out.
pub fn list(conn: &Connection, customization: CustomizationId) -> Result<Vec<Line>> {
    let query = format!(
        "{} WHERE l.customization_id = ?1 ORDER BY l.sequence ASC NULLS FIRST, l.id ASC",
        LINE_COLUMNS
    );
    let mut stmt = conn.prepare(&query)?;
    let lines = stmt
        .query_map([customization.get()], line_from_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(lines.into_iter().flatten().collect())
}

pub fn get(conn: &Connection, id: LineId) -> Result<Option<Line>> {
    let query = format!("{} WHERE l.id = ?1", LINE_COLUMNS);
    let result = conn
        .query_row(&query, [id.get()], line_from_row)
        .optional()?;

    Ok(result.flatten())
}

/// Resolves a logical line id to the concrete table holding it.
pub fn kind_of(conn: &Connection, id: LineId) -> Result<LineKind> {
    let code: Option<String> = conn
        .query_row("SELECT kind FROM lines WHERE id = ?1", [id.get()], |row| {
            row.get(0)
        })
        .optional()?;

    match code {
        Some(code) => Ok(code.parse()?),
        None => Err(Error::NotFound(format!("line {}", id))),
    }
}

/// Allocates a logical line id shared by both concrete tables.
pub fn allocate_id(conn: &Connection) -> Result<LineId> {
    conn.execute("INSERT INTO line_ids DEFAULT VALUES", [])?;
    Ok(LineId::new(conn.last_insert_rowid()))
}
