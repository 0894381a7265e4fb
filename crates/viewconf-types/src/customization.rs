use serde::{Deserialize, Serialize};

use crate::{ButtonId, CustomizationId, FieldId, ModelId, SnapshotId, UserId, ViewId};

/// Model name of customizations themselves; its views are never customized.
pub const CUSTOMIZATION_MODEL: &str = "view.configurator";

/// Stored override of a model's tree view for one user (or for everyone).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customization {
    pub id: CustomizationId,
    pub model: ModelId,
    pub model_name: String,
    /// Base view being customized; `None` targets the model's default tree view.
    pub view: Option<ViewId>,
    /// Owning user; `None` applies to every user without their own customization.
    pub user: Option<UserId>,
    pub created_at: String,
    pub updated_at: String,
}

/// Identity of a model resource, compared by reference rather than by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ResourceRef {
    Field(FieldId),
    Button(ButtonId),
}

/// Marker that a resource has been turned into a line once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// `None` until persisted.
    pub id: Option<SnapshotId>,
    pub customization: CustomizationId,
    pub resource: ResourceRef,
}

impl SnapshotEntry {
    pub fn new(customization: CustomizationId, resource: ResourceRef) -> Self {
        Self {
            id: None,
            customization,
            resource,
        }
    }
}
