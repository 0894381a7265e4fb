use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ButtonId, Error, FieldId, ModelId, ViewId};

/// Audit columns every model carries. They never show up in a generated view.
pub const SYSTEM_FIELDS: [&str; 4] = ["create_uid", "create_date", "write_uid", "write_date"];

pub fn is_system_field(name: &str) -> bool {
    SYSTEM_FIELDS.contains(&name)
}

/// Declared value kind of a model field.
///
/// Stored as the framework's type code (`char`, `numeric`, `timedelta`, ...).
/// Codes this crate does not know about are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Char,
    Text,
    Boolean,
    Integer,
    Float,
    Numeric,
    Date,
    DateTime,
    Time,
    TimeDelta,
    Selection,
    Binary,
    Many2One,
    One2Many,
    Many2Many,
    Reference,
    Other(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Char => "char",
            FieldKind::Text => "text",
            FieldKind::Boolean => "boolean",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Numeric => "numeric",
            FieldKind::Date => "date",
            FieldKind::DateTime => "datetime",
            FieldKind::Time => "time",
            FieldKind::TimeDelta => "timedelta",
            FieldKind::Selection => "selection",
            FieldKind::Binary => "binary",
            FieldKind::Many2One => "many2one",
            FieldKind::One2Many => "one2many",
            FieldKind::Many2Many => "many2many",
            FieldKind::Reference => "reference",
            FieldKind::Other(code) => code,
        }
    }

    /// Kinds a column aggregate can be computed for.
    pub fn is_summable(&self) -> bool {
        matches!(
            self,
            FieldKind::Integer | FieldKind::Float | FieldKind::Numeric | FieldKind::TimeDelta
        )
    }

    pub fn is_datetime(&self) -> bool {
        matches!(self, FieldKind::DateTime)
    }

    pub fn is_relation(&self) -> bool {
        matches!(
            self,
            FieldKind::Many2One | FieldKind::One2Many | FieldKind::Many2Many | FieldKind::Reference
        )
    }
}

impl From<&str> for FieldKind {
    fn from(code: &str) -> Self {
        match code {
            "char" => FieldKind::Char,
            "text" => FieldKind::Text,
            "boolean" => FieldKind::Boolean,
            "integer" => FieldKind::Integer,
            "float" => FieldKind::Float,
            "numeric" => FieldKind::Numeric,
            "date" => FieldKind::Date,
            "datetime" | "timestamp" => FieldKind::DateTime,
            "time" => FieldKind::Time,
            "timedelta" => FieldKind::TimeDelta,
            "selection" => FieldKind::Selection,
            "binary" => FieldKind::Binary,
            "many2one" => FieldKind::Many2One,
            "one2many" => FieldKind::One2Many,
            "many2many" => FieldKind::Many2Many,
            "reference" => FieldKind::Reference,
            other => FieldKind::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldKind {
    fn from(code: String) -> Self {
        FieldKind::from(code.as_str())
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering mode of a view definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewType {
    Tree,
    Form,
    Graph,
    Calendar,
}

impl ViewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Tree => "tree",
            ViewType::Form => "form",
            ViewType::Graph => "graph",
            ViewType::Calendar => "calendar",
        }
    }
}

impl FromStr for ViewType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tree" => Ok(ViewType::Tree),
            "form" => Ok(ViewType::Form),
            "graph" => Ok(ViewType::Graph),
            "calendar" => Ok(ViewType::Calendar),
            other => Err(Error::parse("view type", other)),
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business-object model known to the framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub id: ModelId,
    /// Dotted model name, e.g. `ir.attachment`.
    pub name: String,
    pub description: Option<String>,
}

/// Field declared on a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelField {
    pub id: FieldId,
    pub model: ModelId,
    pub name: String,
    pub kind: FieldKind,
    /// Target model name for relation kinds.
    pub relation: Option<String>,
    pub description: Option<String>,
}

/// Button declared on a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelButton {
    pub id: ButtonId,
    pub model: ModelId,
    pub name: String,
    pub description: Option<String>,
}

/// Stored view definition for a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRecord {
    pub id: ViewId,
    pub model: ModelId,
    pub model_name: String,
    pub view_type: ViewType,
    pub name: String,
    /// Lower wins when several views of one type exist.
    pub priority: i32,
    pub arch: String,
}

impl ViewRecord {
    /// Display name, `<model> (<view name>)`.
    pub fn rec_name(&self) -> String {
        format!("{} ({})", self.model_name, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summable_kinds() {
        for code in ["integer", "float", "numeric", "timedelta"] {
            assert!(FieldKind::from(code).is_summable(), "{code}");
        }
        for code in ["char", "text", "datetime", "many2one", "boolean"] {
            assert!(!FieldKind::from(code).is_summable(), "{code}");
        }
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind = FieldKind::from("dict");
        assert_eq!(kind, FieldKind::Other("dict".to_string()));
        assert_eq!(kind.as_str(), "dict");
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"dict\"");
    }

    #[test]
    fn test_view_type_parse() {
        assert_eq!("tree".parse::<ViewType>().unwrap(), ViewType::Tree);
        assert!("list".parse::<ViewType>().is_err());
    }

    #[test]
    fn test_view_rec_name() {
        let view = ViewRecord {
            id: ViewId::new(3),
            model: ModelId::new(1),
            model_name: "ir.model.field".to_string(),
            view_type: ViewType::Tree,
            name: "model_field_list".to_string(),
            priority: 16,
            arch: "<tree/>".to_string(),
        };
        assert_eq!(view.rec_name(), "ir.model.field (model_field_list)");
    }

    #[test]
    fn test_system_fields() {
        assert!(is_system_field("write_date"));
        assert!(!is_system_field("name"));
    }
}
