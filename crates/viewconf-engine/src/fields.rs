use serde::Serialize;
use std::collections::BTreeMap;
use viewconf_types::{FieldKind, ModelField};

use crate::Result;
use crate::arch::walk;

/// Field description shipped alongside a resolved view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(rename = "string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Target model of a relation field; only filled when `level > 0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

/// Describes every model field referenced by a `field` element of `arch`,
/// at any depth. Names the model does not define are ignored.
pub fn collect_fields(
    arch: &str,
    fields: &[ModelField],
    level: u32,
) -> Result<BTreeMap<String, FieldInfo>> {
    let mut collected = BTreeMap::new();

    walk(arch, |_, start| {
        if start.name().as_ref() != b"field" {
            return Ok(());
        }
        let Some(name) = start.try_get_attribute("name")? else {
            return Ok(());
        };
        let name = name.unescape_value()?;
        if collected.contains_key(&*name) {
            return Ok(());
        }
        if let Some(field) = fields.iter().find(|f| f.name == name) {
            let relation = if level > 0 && field.kind.is_relation() {
                field.relation.clone()
            } else {
                None
            };
            collected.insert(
                field.name.clone(),
                FieldInfo {
                    name: field.name.clone(),
                    kind: field.kind.clone(),
                    description: field.description.clone(),
                    relation,
                },
            );
        }
        Ok(())
    })?;

    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewconf_types::{FieldId, ModelId};

    fn fields() -> Vec<ModelField> {
        vec![
            ModelField {
                id: FieldId::new(1),
                model: ModelId::new(1),
                name: "name".to_string(),
                kind: FieldKind::Char,
                relation: None,
                description: Some("Name".to_string()),
            },
            ModelField {
                id: FieldId::new(2),
                model: ModelId::new(1),
                name: "resource".to_string(),
                kind: FieldKind::Reference,
                relation: Some("ir.model".to_string()),
                description: None,
            },
        ]
    }

    #[test]
    fn test_collects_nested_fields_once() {
        let arch = r#"<form>
            <label name="name"/><field name="name"/>
            <group><field name="resource"/><field name="ghost"/></group>
            <field name="name" widget="time"/>
        </form>"#;

        let collected = collect_fields(arch, &fields(), 0).unwrap();
        assert_eq!(
            collected.keys().collect::<Vec<_>>(),
            vec!["name", "resource"]
        );
        assert_eq!(collected["name"].description.as_deref(), Some("Name"));
        assert_eq!(collected["resource"].relation, None);
    }

    #[test]
    fn test_relation_exposed_below_top_level() {
        let arch = r#"<tree><field name="resource"/></tree>"#;
        let collected = collect_fields(arch, &fields(), 1).unwrap();
        assert_eq!(collected["resource"].relation.as_deref(), Some("ir.model"));
    }
}
