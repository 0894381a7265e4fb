use std::collections::HashSet;
use std::sync::Arc;
use viewconf_engine::{ColumnPreferences, DiffInput, Difference, compute_difference, generate_arch};
use viewconf_index::{CustomizationChanges, CustomizationFilter, Database, UserMatch, ViewMatch};
use viewconf_types::{
    Customization, CustomizationId, Line, LineId, LineKind, LineValues, ModelId, NewLine,
    SnapshotEntry, UserId, ViewId, ViewType,
};

use crate::{Error, RequestContext, Result, ViewCache, ViewRequest, ViewResolver};

/// Parses the base view argument of the RPC entry point.
///
/// `""`, `"null"` and `"0"` mean no base view.
pub fn parse_view_id(raw: &str) -> Result<Option<ViewId>> {
    match raw.trim() {
        "" | "null" => Ok(None),
        text => match text.parse::<i64>() {
            Ok(0) => Ok(None),
            Ok(id) => Ok(Some(ViewId::new(id))),
            Err(_) => Err(Error::InvalidOperation(format!(
                "'{}' is not a view id",
                text
            ))),
        },
    }
}

/// Lifecycle of customizations and their lines.
///
/// Every mutation clears the whole render cache.
pub struct Configurator {
    db: Arc<Database>,
    cache: Arc<ViewCache>,
    defaults: Arc<dyn ViewResolver>,
}

impl Configurator {
    /// `defaults` resolves uncustomized views; it is always called with
    /// `avoid_custom_view` set.
    pub fn new(db: Arc<Database>, cache: Arc<ViewCache>, defaults: Arc<dyn ViewResolver>) -> Self {
        Self {
            db,
            cache,
            defaults,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn cache(&self) -> &ViewCache {
        &self.cache
    }

    // --- Customizations ----------------------------------------------------

    /// RPC form of [`Configurator::resolve_or_create`].
    pub fn get_custom_view(
        &self,
        ctx: &RequestContext,
        model_name: &str,
        view_id: &str,
    ) -> Result<CustomizationId> {
        let base_view = parse_view_id(view_id)?;
        self.resolve_or_create(ctx, model_name, base_view)
    }

    /// Returns the acting user's customization of `model_name`, creating and
    /// populating one when none exists. Without `base_view` any base view
    /// matches.
    pub fn resolve_or_create(
        &self,
        ctx: &RequestContext,
        model_name: &str,
        base_view: Option<ViewId>,
    ) -> Result<CustomizationId> {
        let view_match = match base_view {
            Some(view) => ViewMatch::Exactly(Some(view)),
            None => ViewMatch::Any,
        };
        let filter = CustomizationFilter::new(model_name)
            .view(view_match)
            .user(UserMatch::Exactly(ctx.user))
            .limit(1);

        let resolved = self.db.transaction(|| -> Result<CustomizationId> {
            if let Some(existing) = self.db.find_customizations(&filter)?.into_iter().next() {
                return Ok(existing.id);
            }
            self.create(model_name, base_view, ctx.user)
        });

        match resolved {
            Err(err) if err.is_conflict() => {
                // Created by another connection since the lookup
                let exact = filter.view(ViewMatch::Exactly(base_view));
                match self.db.find_customizations(&exact)?.into_iter().next() {
                    Some(winner) => Ok(winner.id),
                    None => Err(err),
                }
            }
            other => other,
        }
    }

    /// Creates a customization and materializes the default view into lines.
    pub fn create(
        &self,
        model_name: &str,
        view: Option<ViewId>,
        user: Option<UserId>,
    ) -> Result<CustomizationId> {
        let (id, populated) = self.db.transaction(|| -> Result<(CustomizationId, usize)> {
            let model = self
                .db
                .get_model_by_name(model_name)?
                .ok_or_else(|| Error::NotFound(format!("model '{}'", model_name)))?;
            if let Some(view) = view {
                self.ensure_tree_view(model.id, view)?;
            }

            let id = self.db.insert_customization(model.id, view, user)?;
            let customization = self.get(id)?;
            let populated = self.populate(&customization)?;
            Ok((id, populated))
        })?;
        self.cache.invalidate_all();

        tracing::info!(
            customization = %id,
            model = model_name,
            lines = populated,
            "customization created"
        );
        Ok(id)
    }

    pub fn get(&self, id: CustomizationId) -> Result<Customization> {
        self.db
            .get_customization(id)?
            .ok_or_else(|| Error::NotFound(format!("customization {}", id)))
    }

    /// Changes the base view or owner of a customization.
    pub fn write(&self, id: CustomizationId, changes: &CustomizationChanges) -> Result<()> {
        self.db.transaction(|| -> Result<()> {
            let customization = self.get(id)?;
            if let Some(Some(view)) = changes.view {
                self.ensure_tree_view(customization.model, view)?;
            }
            self.db.update_customization(id, changes)?;
            Ok(())
        })?;
        self.cache.invalidate_all();
        Ok(())
    }

    /// Deletes customizations with their lines and snapshots.
    pub fn delete(&self, ids: &[CustomizationId]) -> Result<()> {
        self.db.transaction(|| -> Result<()> {
            for id in ids {
                self.db.delete_customization(*id)?;
            }
            Ok(())
        })?;
        self.cache.invalidate_all();
        tracing::info!(count = ids.len(), "customizations deleted");
        Ok(())
    }

    /// Duplicates a customization for `user`.
    ///
    /// Lines are copied with their options. The snapshot of the copy covers
    /// the source's snapshot plus every copied line, so resources the source
    /// dropped stay dropped.
    pub fn copy(&self, id: CustomizationId, user: Option<UserId>) -> Result<CustomizationId> {
        let new_id = self.db.transaction(|| -> Result<CustomizationId> {
            let source = self.get(id)?;
            let new_id = self.db.insert_customization(source.model, source.view, user)?;

            let lines = self.db.list_lines(source.id)?;
            let payloads = lines
                .iter()
                .map(|line| NewLine {
                    customization: new_id,
                    ..NewLine::from(line)
                })
                .collect();
            self.db.line_repository().create(payloads)?;

            let mut seen = HashSet::new();
            let snapshot: Vec<SnapshotEntry> = self
                .db
                .list_snapshot(source.id)?
                .into_iter()
                .map(|entry| entry.resource)
                .chain(lines.iter().map(Line::resource))
                .filter(|resource| seen.insert(*resource))
                .map(|resource| SnapshotEntry::new(new_id, resource))
                .collect();
            self.db.insert_snapshots(&snapshot)?;

            let copy = self.get(new_id)?;
            self.populate(&copy)?;
            Ok(new_id)
        })?;
        self.cache.invalidate_all();

        tracing::info!(source = %id, customization = %new_id, "customization copied");
        Ok(new_id)
    }

    /// Best match for a view request: the user's own customization first,
    /// then the default-for-all-users one.
    pub fn lookup(
        &self,
        ctx: &RequestContext,
        model_name: &str,
        view: Option<ViewId>,
    ) -> Result<Option<Customization>> {
        let filter = CustomizationFilter::new(model_name)
            .view(ViewMatch::Exactly(view))
            .user(UserMatch::OwnOrDefault(ctx.user))
            .limit(1);
        Ok(self.db.find_customizations(&filter)?.into_iter().next())
    }

    // --- Diff & render -----------------------------------------------------

    /// Resources of the default view not yet materialized. Nothing is stored.
    pub fn difference(&self, id: CustomizationId) -> Result<Difference> {
        let customization = self.get(id)?;
        self.difference_for(&customization)
    }

    /// Persists the pending difference of each customization and returns the
    /// number of lines added.
    pub fn do_snapshot(&self, ids: &[CustomizationId]) -> Result<usize> {
        let added = self.db.transaction(|| -> Result<usize> {
            let mut added = 0;
            for id in ids {
                let customization = self.get(*id)?;
                added += self.populate(&customization)?;
            }
            Ok(added)
        })?;
        self.cache.invalidate_all();

        tracing::info!(customizations = ids.len(), lines = added, "snapshot refreshed");
        Ok(added)
    }

    /// Tree arch of the customization: stored lines followed by the pending
    /// difference.
    pub fn generate_arch(&self, ctx: &RequestContext, id: CustomizationId) -> Result<String> {
        let customization = self.get(id)?;

        let mut lines = self.db.list_lines(id)?;
        lines.extend(self.difference_for(&customization)?.lines);

        let preferences = match (customization.view, ctx.user) {
            (Some(view), Some(user)) => self.db.tree_optionals(view, user)?,
            _ => ColumnPreferences::new(),
        };

        Ok(generate_arch(&lines, &preferences)?)
    }

    fn difference_for(&self, customization: &Customization) -> Result<Difference> {
        let ctx = RequestContext::new(customization.user).avoiding_custom_view();
        let default = self.defaults.fields_view_get(
            &ctx,
            &customization.model_name,
            &ViewRequest::tree().with_view(customization.view),
        )?;

        let fields = self.db.list_fields(customization.model)?;
        let buttons = self.db.list_buttons(customization.model)?;
        let snapshot = self.db.list_snapshot(customization.id)?;

        Ok(compute_difference(&DiffInput {
            customization: customization.id,
            default_arch: &default.arch,
            fields: &fields,
            buttons: &buttons,
            snapshot: &snapshot,
        })?)
    }

    fn populate(&self, customization: &Customization) -> Result<usize> {
        let difference = self.difference_for(customization)?;
        if difference.is_empty() {
            return Ok(0);
        }

        let payloads = difference.lines.iter().map(NewLine::from).collect();
        self.db.line_repository().create(payloads)?;
        self.db.insert_snapshots(&difference.snapshots)?;

        Ok(difference.len())
    }

    fn ensure_tree_view(&self, model: ModelId, view: ViewId) -> Result<()> {
        let record = self
            .db
            .get_view(view)?
            .filter(|record| record.model == model)
            .ok_or_else(|| Error::NotFound(format!("view {} of model {}", view, model)))?;
        if record.view_type != ViewType::Tree {
            return Err(Error::InvalidOperation(format!(
                "{} is a {} view; only tree views can be customized",
                record.rec_name(),
                record.view_type
            )));
        }
        Ok(())
    }

    // --- Lines -------------------------------------------------------------

    pub fn lines(&self, id: CustomizationId) -> Result<Vec<Line>> {
        self.get(id)?;
        Ok(self.db.list_lines(id)?)
    }

    pub fn create_lines(&self, payloads: Vec<NewLine>) -> Result<Vec<LineId>> {
        let ids = self.db.transaction(|| -> Result<Vec<LineId>> {
            for payload in &payloads {
                self.check_line_target(payload)?;
            }
            Ok(self.db.line_repository().create(payloads)?)
        })?;
        self.cache.invalidate_all();
        Ok(ids)
    }

    pub fn write_lines(&self, actions: &[(Vec<LineId>, LineValues)]) -> Result<()> {
        self.db
            .transaction(|| self.db.line_repository().write(actions))?;
        self.cache.invalidate_all();
        Ok(())
    }

    pub fn delete_lines(&self, ids: &[LineId]) -> Result<()> {
        self.db
            .transaction(|| self.db.line_repository().delete(ids))?;
        self.cache.invalidate_all();
        Ok(())
    }

    // A line may only reference a resource of its customization's model
    fn check_line_target(&self, payload: &NewLine) -> Result<()> {
        let customization = self.get(payload.customization)?;

        let (resource, owner) = match payload.kind {
            LineKind::Field => {
                let id = payload.field.ok_or_else(|| {
                    Error::InvalidOperation("field line without a field".to_string())
                })?;
                let field = self
                    .db
                    .get_field(id)?
                    .ok_or_else(|| Error::NotFound(format!("field {}", id)))?;
                (field.name, field.model)
            }
            LineKind::Button => {
                let id = payload.button.ok_or_else(|| {
                    Error::InvalidOperation("button line without a button".to_string())
                })?;
                let button = self
                    .db
                    .get_button(id)?
                    .ok_or_else(|| Error::NotFound(format!("button {}", id)))?;
                (button.name, button.model)
            }
        };

        if owner != customization.model {
            return Err(Error::InvalidOperation(format!(
                "'{}' does not belong to model '{}'",
                resource, customization.model_name
            )));
        }
        Ok(())
    }

    // --- Column preferences ------------------------------------------------

    /// Stores (`Some`) or clears (`None`) the acting user's hidden state of a
    /// column on a base view.
    pub fn set_column_visibility(
        &self,
        ctx: &RequestContext,
        view: ViewId,
        field: &str,
        hidden: Option<bool>,
    ) -> Result<()> {
        let user = ctx.user.ok_or_else(|| {
            Error::InvalidOperation("column preferences need an acting user".to_string())
        })?;
        self.db
            .get_view(view)?
            .ok_or_else(|| Error::NotFound(format!("view {}", view)))?;

        match hidden {
            Some(hidden) => self.db.set_tree_optional(view, user, field, hidden)?,
            None => self.db.clear_tree_optional(view, user, field)?,
        }
        self.cache.invalidate_all();
        Ok(())
    }
}
