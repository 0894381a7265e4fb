use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};
use viewconf_types::{CustomizationId, Line, LineId, LineKind, LineValues, NewLine};

use crate::queries::line;
use crate::{Error, Result};

/// Storage of one concrete line kind.
///
/// Both kinds share the logical id space and the option columns, so only
/// creation differs per table.
pub trait LineStore {
    fn connection(&self) -> &Connection;

    fn kind(&self) -> LineKind;

    fn table(&self) -> &'static str;

    /// Inserts the payloads in order and returns their logical ids.
    fn create(&self, lines: &[NewLine]) -> Result<Vec<LineId>>;

    /// Column assignments this table accepts for an update.
    fn assignments(&self, values: &LineValues) -> Vec<(&'static str, Value)> {
        option_assignments(values)
    }

    fn write(&self, ids: &[LineId], values: &LineValues) -> Result<usize> {
        let assignments = self.assignments(values);
        if ids.is_empty() || assignments.is_empty() {
            return Ok(0);
        }

        let set_clause = assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "UPDATE {} SET {} WHERE id IN ({})",
            self.table(),
            set_clause,
            placeholders(ids.len())
        );

        let params = assignments
            .into_iter()
            .map(|(_, value)| value)
            .chain(ids.iter().map(|id| Value::Integer(id.get())));
        let updated = self
            .connection()
            .execute(&query, params_from_iter(params))?;

        Ok(updated)
    }

    fn delete(&self, ids: &[LineId]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let in_clause = placeholders(ids.len());
        let raw_ids = || ids.iter().map(|id| id.get());
        let deleted = self.connection().execute(
            &format!("DELETE FROM {} WHERE id IN ({})", self.table(), in_clause),
            params_from_iter(raw_ids()),
        )?;
        self.connection().execute(
            &format!("DELETE FROM line_ids WHERE id IN ({})", in_clause),
            params_from_iter(raw_ids()),
        )?;

        Ok(deleted)
    }

    fn list(&self, customization: CustomizationId) -> Result<Vec<Line>> {
        let kind = self.kind();
        Ok(line::list(self.connection(), customization)?
            .into_iter()
            .filter(|line| line.kind() == kind)
            .collect())
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn option_assignments(values: &LineValues) -> Vec<(&'static str, Value)> {
    let mut assignments = Vec::new();
    if let Some(sequence) = values.sequence {
        assignments.push(("sequence", sequence.map_or(Value::Null, |s| Value::Integer(s.into()))));
    }
    if let Some(expand) = values.expand {
        assignments.push(("expand", expand.map_or(Value::Null, |e| Value::Integer(e.into()))));
    }
    if let Some(optional) = values.optional {
        assignments.push((
            "optional",
            optional
                .as_code()
                .map_or(Value::Null, |code| Value::Text(code.to_string())),
        ));
    }
    if let Some(searchable) = values.searchable {
        assignments.push(("searchable", Value::Integer(searchable.into())));
    }
    assignments
}

pub struct FieldLineStore<'a> {
    conn: &'a Connection,
}

impl<'a> FieldLineStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl LineStore for FieldLineStore<'_> {
    fn connection(&self) -> &Connection {
        self.conn
    }

    fn kind(&self) -> LineKind {
        LineKind::Field
    }

    fn table(&self) -> &'static str {
        "field_lines"
    }

    fn create(&self, lines: &[NewLine]) -> Result<Vec<LineId>> {
        let mut stmt = self.conn.prepare(
            r#"
            INSERT INTO field_lines (id, customization_id, field_id, sequence, expand, optional, searchable, "sum")
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )?;

        let mut ids = Vec::with_capacity(lines.len());
        for payload in lines {
            let field = payload.field.ok_or_else(|| {
                Error::Query(format!(
                    "field line of customization {} has no field",
                    payload.customization
                ))
            })?;
            let id = line::allocate_id(self.conn)?;
            stmt.execute(params![
                id.get(),
                payload.customization.get(),
                field.get(),
                payload.options.sequence,
                payload.options.expand,
                payload.options.optional.as_code(),
                payload.options.searchable,
                payload.options.sum
            ])?;
            ids.push(id);
        }

        Ok(ids)
    }

    fn assignments(&self, values: &LineValues) -> Vec<(&'static str, Value)> {
        let mut assignments = option_assignments(values);
        if let Some(sum) = values.sum {
            assignments.push(("\"sum\"", Value::Integer(sum.into())));
        }
        assignments
    }
}

pub struct ButtonLineStore<'a> {
    conn: &'a Connection,
}

impl<'a> ButtonLineStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

// Buttons have no aggregate; a `sum` value in an update is ignored.
impl LineStore for ButtonLineStore<'_> {
    fn connection(&self) -> &Connection {
        self.conn
    }

    fn kind(&self) -> LineKind {
        LineKind::Button
    }

    fn table(&self) -> &'static str {
        "button_lines"
    }

    fn create(&self, lines: &[NewLine]) -> Result<Vec<LineId>> {
        let mut stmt = self.conn.prepare(
            r#"
            INSERT INTO button_lines (id, customization_id, button_id, sequence, expand, optional, searchable)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )?;

        let mut ids = Vec::with_capacity(lines.len());
        for payload in lines {
            let button = payload.button.ok_or_else(|| {
                Error::Query(format!(
                    "button line of customization {} has no button",
                    payload.customization
                ))
            })?;
            let id = line::allocate_id(self.conn)?;
            stmt.execute(params![
                id.get(),
                payload.customization.get(),
                button.get(),
                payload.options.sequence,
                payload.options.expand,
                payload.options.optional.as_code(),
                payload.options.searchable
            ])?;
            ids.push(id);
        }

        Ok(ids)
    }
}

/// The logical line entity: routes each operation to the concrete store by
/// discriminant and batches records of one kind into a single store call.
pub struct LineRepository<'a> {
    conn: &'a Connection,
    fields: FieldLineStore<'a>,
    buttons: ButtonLineStore<'a>,
}

impl<'a> LineRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            fields: FieldLineStore::new(conn),
            buttons: ButtonLineStore::new(conn),
        }
    }

    pub fn store(&self, kind: LineKind) -> &dyn LineStore {
        match kind {
            LineKind::Field => &self.fields,
            LineKind::Button => &self.buttons,
        }
    }

    /// Creates lines and returns their ids in payload order.
    pub fn create(&self, payloads: Vec<NewLine>) -> Result<Vec<LineId>> {
        let total = payloads.len();
        let mut batches: Vec<(LineKind, Vec<usize>, Vec<NewLine>)> = Vec::new();

        for (index, mut payload) in payloads.into_iter().enumerate() {
            match payload.kind {
                LineKind::Field => payload.button = None,
                LineKind::Button => payload.field = None,
            }
            match batches.iter_mut().find(|(kind, _, _)| *kind == payload.kind) {
                Some((_, indexes, lines)) => {
                    indexes.push(index);
                    lines.push(payload);
                }
                None => batches.push((payload.kind, vec![index], vec![payload])),
            }
        }

        let mut ids: Vec<Option<LineId>> = vec![None; total];
        for (kind, indexes, lines) in batches {
            tracing::debug!(kind = %kind, count = lines.len(), "creating lines");
            let created = self.store(kind).create(&lines)?;
            for (index, id) in indexes.into_iter().zip(created) {
                ids[index] = Some(id);
            }
        }

        Ok(ids.into_iter().flatten().collect())
    }

    /// Applies `(ids, values)` actions. Records of one kind receiving identical
    /// values are updated by a single statement.
    pub fn write(&self, actions: &[(Vec<LineId>, LineValues)]) -> Result<()> {
        let mut batches: Vec<(LineKind, &LineValues, Vec<LineId>)> = Vec::new();

        for (ids, values) in actions {
            for id in ids {
                let kind = line::kind_of(self.conn, *id)?;
                match batches
                    .iter_mut()
                    .find(|(k, v, _)| *k == kind && *v == values)
                {
                    Some((_, _, batch)) => batch.push(*id),
                    None => batches.push((kind, values, vec![*id])),
                }
            }
        }

        for (kind, values, ids) in batches {
            tracing::debug!(kind = %kind, count = ids.len(), "writing lines");
            self.store(kind).write(&ids, values)?;
        }

        Ok(())
    }

    pub fn delete(&self, ids: &[LineId]) -> Result<()> {
        let mut fields = Vec::new();
        let mut buttons = Vec::new();
        for id in ids {
            match line::kind_of(self.conn, *id)? {
                LineKind::Field => fields.push(*id),
                LineKind::Button => buttons.push(*id),
            }
        }

        self.fields.delete(&fields)?;
        self.buttons.delete(&buttons)?;

        Ok(())
    }

    pub fn list(&self, customization: CustomizationId) -> Result<Vec<Line>> {
        line::list(self.conn, customization)
    }

    pub fn get(&self, id: LineId) -> Result<Option<Line>> {
        line::get(self.conn, id)
    }
}
