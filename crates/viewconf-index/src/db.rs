use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use viewconf_types::{
    ButtonId, Customization, CustomizationId, FieldId, Line, ModelButton, ModelField, ModelId,
    ModelRecord, SnapshotEntry, SnapshotId, UserId, ViewId, ViewRecord, ViewType,
};

use crate::line_store::LineRepository;
use crate::queries::{catalog, customization, snapshot};
use crate::{
    CustomizationChanges, CustomizationFilter, Error, NewButton, NewField, NewView, Result,
    schema,
};

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn init_schema(&self) -> Result<()> {
        schema::init_schema(&self.conn)
    }

    /// Runs `f` inside a transaction, committing on success.
    ///
    /// Re-entrant: when a transaction is already open, `f` joins it and the
    /// outermost call decides the outcome.
    pub fn transaction<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: From<Error>,
    {
        if !self.conn.is_autocommit() {
            return f();
        }

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|err| E::from(Error::from(err)))?;
        let value = f()?;
        tx.commit().map_err(|err| E::from(Error::from(err)))?;
        Ok(value)
    }

    // --- Catalog -----------------------------------------------------------

    pub fn upsert_model(&self, name: &str, description: Option<&str>) -> Result<ModelId> {
        catalog::upsert_model(&self.conn, name, description)
    }

    pub fn upsert_field(&self, model: ModelId, field: &NewField) -> Result<FieldId> {
        catalog::upsert_field(&self.conn, model, field)
    }

    pub fn upsert_button(&self, model: ModelId, button: &NewButton) -> Result<ButtonId> {
        catalog::upsert_button(&self.conn, model, button)
    }

    pub fn upsert_view(&self, model: ModelId, view: &NewView) -> Result<ViewId> {
        catalog::upsert_view(&self.conn, model, view)
    }

    pub fn get_model(&self, id: ModelId) -> Result<Option<ModelRecord>> {
        catalog::get_model(&self.conn, id)
    }

    pub fn get_model_by_name(&self, name: &str) -> Result<Option<ModelRecord>> {
        catalog::get_model_by_name(&self.conn, name)
    }

    pub fn list_models(&self) -> Result<Vec<ModelRecord>> {
        catalog::list_models(&self.conn)
    }

    pub fn list_fields(&self, model: ModelId) -> Result<Vec<ModelField>> {
        catalog::list_fields(&self.conn, model)
    }

    pub fn get_field(&self, id: FieldId) -> Result<Option<ModelField>> {
        catalog::get_field(&self.conn, id)
    }

    pub fn list_buttons(&self, model: ModelId) -> Result<Vec<ModelButton>> {
        catalog::list_buttons(&self.conn, model)
    }

    pub fn get_button(&self, id: ButtonId) -> Result<Option<ModelButton>> {
        catalog::get_button(&self.conn, id)
    }

    pub fn get_view(&self, id: ViewId) -> Result<Option<ViewRecord>> {
        catalog::get_view(&self.conn, id)
    }

    pub fn list_views(&self, model: ModelId) -> Result<Vec<ViewRecord>> {
        catalog::list_views(&self.conn, model)
    }

    pub fn find_view(&self, model: ModelId, view_type: ViewType) -> Result<Option<ViewRecord>> {
        catalog::find_view(&self.conn, model, view_type)
    }

    pub fn set_tree_optional(
        &self,
        view: ViewId,
        user: UserId,
        field: &str,
        value: bool,
    ) -> Result<()> {
        catalog::set_tree_optional(&self.conn, view, user, field, value)
    }

    pub fn clear_tree_optional(&self, view: ViewId, user: UserId, field: &str) -> Result<()> {
        catalog::clear_tree_optional(&self.conn, view, user, field)
    }

    pub fn tree_optionals(&self, view: ViewId, user: UserId) -> Result<HashMap<String, bool>> {
        catalog::tree_optionals(&self.conn, view, user)
    }

    // --- Customizations ----------------------------------------------------

    pub fn insert_customization(
        &self,
        model: ModelId,
        view: Option<ViewId>,
        user: Option<UserId>,
    ) -> Result<CustomizationId> {
        let now = chrono::Utc::now().to_rfc3339();
        customization::insert(&self.conn, model, view, user, &now)
    }

    pub fn update_customization(
        &self,
        id: CustomizationId,
        changes: &CustomizationChanges,
    ) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        match customization::update(&self.conn, id, changes, &now)? {
            0 => Err(Error::NotFound(format!("customization {}", id))),
            _ => Ok(()),
        }
    }

    pub fn get_customization(&self, id: CustomizationId) -> Result<Option<Customization>> {
        customization::get(&self.conn, id)
    }

    pub fn find_customizations(
        &self,
        filter: &CustomizationFilter<'_>,
    ) -> Result<Vec<Customization>> {
        customization::find(&self.conn, filter)
    }

    pub fn list_customizations(&self) -> Result<Vec<Customization>> {
        customization::list(&self.conn)
    }

    /// Deletes the customization with its lines and snapshot entries.
    pub fn delete_customization(&self, id: CustomizationId) -> Result<()> {
        self.transaction(|| match customization::delete_cascade(&self.conn, id)? {
            0 => Err(Error::NotFound(format!("customization {}", id))),
            _ => Ok(()),
        })
    }

    // --- Lines & snapshots -------------------------------------------------

    /// Logical line entity dispatching to the concrete stores.
    pub fn line_repository(&self) -> LineRepository<'_> {
        LineRepository::new(&self.conn)
    }

    pub fn list_lines(&self, customization: CustomizationId) -> Result<Vec<Line>> {
        crate::queries::line::list(&self.conn, customization)
    }

    pub fn list_snapshot(&self, customization: CustomizationId) -> Result<Vec<SnapshotEntry>> {
        snapshot::list(&self.conn, customization)
    }

    pub fn insert_snapshots(&self, entries: &[SnapshotEntry]) -> Result<Vec<SnapshotId>> {
        snapshot::insert_many(&self.conn, entries)
    }
}
