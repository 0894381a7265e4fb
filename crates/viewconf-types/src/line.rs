use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{
    ButtonId, CustomizationId, Error, FieldId, LineId, ModelButton, ModelField, ResourceRef,
};

/// Sequence given to field lines materialized by a diff.
pub const DEFAULT_FIELD_SEQUENCE: i32 = 100;
/// Sequence given to button lines materialized by a diff. Buttons sort after fields.
pub const DEFAULT_BUTTON_SEQUENCE: i32 = 900;

/// Discriminator of the two concrete line kinds.
///
/// The wire form is the framework's resource model name; the short forms
/// `field` / `button` are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    #[serde(rename = "ir.model.field", alias = "field")]
    Field,
    #[serde(rename = "ir.model.button", alias = "button")]
    Button,
}

impl LineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Field => "ir.model.field",
            LineKind::Button => "ir.model.button",
        }
    }
}

impl FromStr for LineKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ir.model.field" | "field" => Ok(LineKind::Field),
            "ir.model.button" | "button" => Ok(LineKind::Button),
            other => Err(Error::parse("line type", other)),
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a column can be toggled by the user, and its initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalMode {
    /// Column is always present.
    #[default]
    Unset,
    /// Optional, shown by default.
    Show,
    /// Optional, hidden by default.
    Hide,
}

impl OptionalMode {
    /// Stored representation; `None` for `Unset`.
    pub fn as_code(&self) -> Option<&'static str> {
        match self {
            OptionalMode::Unset => None,
            OptionalMode::Show => Some("show"),
            OptionalMode::Hide => Some("hide"),
        }
    }

    pub fn from_code(code: Option<&str>) -> Result<Self, Error> {
        match code {
            None | Some("") => Ok(OptionalMode::Unset),
            Some("show") => Ok(OptionalMode::Show),
            Some("hide") => Ok(OptionalMode::Hide),
            Some(other) => Err(Error::parse("optional mode", other)),
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, OptionalMode::Unset)
    }

    /// Value of the `optional` attribute when no user preference exists.
    pub fn default_attribute(&self) -> Option<&'static str> {
        match self {
            OptionalMode::Unset => None,
            OptionalMode::Show => Some("0"),
            OptionalMode::Hide => Some("1"),
        }
    }
}

/// Per-line presentation options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineOptions {
    /// `None` sorts first.
    #[serde(default)]
    pub sequence: Option<i32>,
    /// Relative column width.
    #[serde(default)]
    pub expand: Option<i32>,
    #[serde(default)]
    pub optional: OptionalMode,
    /// Renders as `tree_invisible`: hidden column that stays searchable.
    #[serde(default)]
    pub searchable: bool,
    /// Column aggregate; only honored on field lines of a summable kind.
    #[serde(default)]
    pub sum: bool,
}

/// The resource a line points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "resource")]
pub enum LineTarget {
    #[serde(rename = "ir.model.field")]
    Field(ModelField),
    #[serde(rename = "ir.model.button")]
    Button(ModelButton),
}

impl LineTarget {
    pub fn kind(&self) -> LineKind {
        match self {
            LineTarget::Field(_) => LineKind::Field,
            LineTarget::Button(_) => LineKind::Button,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            LineTarget::Field(field) => &field.name,
            LineTarget::Button(button) => &button.name,
        }
    }
}

/// One column or button entry of a customization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    /// `None` until persisted.
    pub id: Option<LineId>,
    pub customization: CustomizationId,
    #[serde(flatten)]
    pub target: LineTarget,
    #[serde(flatten)]
    pub options: LineOptions,
}

impl Line {
    /// Field line with the defaults used when a diff materializes a resource.
    pub fn for_field(customization: CustomizationId, field: ModelField) -> Self {
        Self {
            id: None,
            customization,
            target: LineTarget::Field(field),
            options: LineOptions {
                sequence: Some(DEFAULT_FIELD_SEQUENCE),
                ..LineOptions::default()
            },
        }
    }

    /// Button line with the defaults used when a diff materializes a resource.
    pub fn for_button(customization: CustomizationId, button: ModelButton) -> Self {
        Self {
            id: None,
            customization,
            target: LineTarget::Button(button),
            options: LineOptions {
                sequence: Some(DEFAULT_BUTTON_SEQUENCE),
                ..LineOptions::default()
            },
        }
    }

    pub fn kind(&self) -> LineKind {
        self.target.kind()
    }

    pub fn name(&self) -> &str {
        self.target.name()
    }

    pub fn resource(&self) -> ResourceRef {
        match &self.target {
            LineTarget::Field(field) => ResourceRef::Field(field.id),
            LineTarget::Button(button) => ResourceRef::Button(button.id),
        }
    }
}

/// Creation payload for a logical line.
///
/// Carries both reference slots like the framework's union model does; the
/// one that does not match `kind` is stripped before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLine {
    pub customization: CustomizationId,
    #[serde(rename = "type")]
    pub kind: LineKind,
    #[serde(default)]
    pub field: Option<FieldId>,
    #[serde(default)]
    pub button: Option<ButtonId>,
    #[serde(flatten)]
    pub options: LineOptions,
}

impl NewLine {
    pub fn field(customization: CustomizationId, field: FieldId) -> Self {
        Self {
            customization,
            kind: LineKind::Field,
            field: Some(field),
            button: None,
            options: LineOptions::default(),
        }
    }

    pub fn button(customization: CustomizationId, button: ButtonId) -> Self {
        Self {
            customization,
            kind: LineKind::Button,
            field: None,
            button: Some(button),
            options: LineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LineOptions) -> Self {
        self.options = options;
        self
    }
}

impl From<&Line> for NewLine {
    /// Creation payload reproducing `line` (used when copying customizations).
    fn from(line: &Line) -> Self {
        let payload = match &line.target {
            LineTarget::Field(field) => NewLine::field(line.customization, field.id),
            LineTarget::Button(button) => NewLine::button(line.customization, button.id),
        };
        payload.with_options(line.options.clone())
    }
}

/// Partial update applied to existing lines. `None` leaves a column untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LineValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Option<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<Option<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<OptionalMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<bool>,
}

impl LineValues {
    pub fn is_empty(&self) -> bool {
        self == &LineValues::default()
    }
}
