use serde::{Deserialize, Serialize};
use viewconf_types::{FieldKind, UserId, ViewId, ViewType};

/// Field definition written by catalog import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewField {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub relation: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Button definition written by catalog import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewButton {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// View definition written by catalog import. Upserted by (model, name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewView {
    pub name: String,
    #[serde(rename = "type")]
    pub view_type: ViewType,
    #[serde(default = "default_priority")]
    pub priority: i32,
    pub arch: String,
}

fn default_priority() -> i32 {
    16
}

/// How the base view column takes part in a customization search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMatch {
    /// No constraint on the base view.
    Any,
    /// Exactly this base view; `None` matches customizations without one.
    Exactly(Option<ViewId>),
}

/// How the owner column takes part in a customization search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserMatch {
    /// Exactly this owner; `None` matches default-for-all-users rows only.
    Exactly(Option<UserId>),
    /// Rows owned by the user or by nobody, user-specific rows first.
    OwnOrDefault(Option<UserId>),
}

/// Search over customizations of one model.
#[derive(Debug, Clone, Copy)]
pub struct CustomizationFilter<'a> {
    pub model_name: &'a str,
    pub view: ViewMatch,
    pub user: UserMatch,
    pub limit: Option<usize>,
}

impl<'a> CustomizationFilter<'a> {
    pub fn new(model_name: &'a str) -> Self {
        Self {
            model_name,
            view: ViewMatch::Any,
            user: UserMatch::Exactly(None),
            limit: None,
        }
    }

    pub fn view(mut self, view: ViewMatch) -> Self {
        self.view = view;
        self
    }

    pub fn user(mut self, user: UserMatch) -> Self {
        self.user = user;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Column updates for an existing customization. `None` leaves a column as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CustomizationChanges {
    pub view: Option<Option<ViewId>>,
    pub user: Option<Option<UserId>>,
}
