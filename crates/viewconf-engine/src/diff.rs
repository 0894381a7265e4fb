use std::collections::{HashMap, HashSet};
use viewconf_types::{
    CustomizationId, Line, ModelButton, ModelField, ResourceRef, SnapshotEntry, is_system_field,
};

use crate::{Error, Result, parse_arch};

/// Everything the diff needs to know about one customization.
#[derive(Debug, Clone, Copy)]
pub struct DiffInput<'a> {
    pub customization: CustomizationId,
    /// Uncustomized tree arch of the model (or of the customized base view).
    pub default_arch: &'a str,
    pub fields: &'a [ModelField],
    pub buttons: &'a [ModelButton],
    pub snapshot: &'a [SnapshotEntry],
}

/// Resources the default view shows that were never materialized into lines.
///
/// `lines[i]` and `snapshots[i]` reference the same resource. Nothing here is
/// persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Difference {
    pub lines: Vec<Line>,
    pub snapshots: Vec<SnapshotEntry>,
}

impl Difference {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

#[derive(Clone, Copy)]
enum Resource<'a> {
    Field(&'a ModelField),
    Button(&'a ModelButton),
}

impl Resource<'_> {
    fn reference(&self) -> ResourceRef {
        match self {
            Resource::Field(field) => ResourceRef::Field(field.id),
            Resource::Button(button) => ResourceRef::Button(button.id),
        }
    }
}

pub fn compute_difference(input: &DiffInput<'_>) -> Result<Difference> {
    let arch = parse_arch(input.default_arch)?;
    if arch.root != "tree" {
        return Err(Error::UnexpectedRoot(arch.root));
    }

    // Buttons share the name space with fields and win on collision
    let mut resources: HashMap<&str, Resource<'_>> = input
        .fields
        .iter()
        .filter(|field| !is_system_field(&field.name))
        .map(|field| (field.name.as_str(), Resource::Field(field)))
        .collect();
    for button in input.buttons {
        resources.insert(button.name.as_str(), Resource::Button(button));
    }

    let mut materialized: HashSet<ResourceRef> =
        input.snapshot.iter().map(|entry| entry.resource).collect();

    let mut pairs = Vec::new();
    for element in &arch.elements {
        if element.tag != "field" && element.tag != "button" {
            continue;
        }
        let Some(name) = element.name.as_deref() else {
            tracing::trace!(tag = %element.tag, "default view element has no name");
            continue;
        };

        let Some(resource) = resources.get(name) else {
            tracing::trace!(name, "default view element has no matching resource");
            continue;
        };
        let reference = resource.reference();
        if !materialized.insert(reference) {
            continue;
        }

        let line = match resource {
            Resource::Field(field) => Line::for_field(input.customization, (*field).clone()),
            Resource::Button(button) => Line::for_button(input.customization, (*button).clone()),
        };
        pairs.push((line, SnapshotEntry::new(input.customization, reference)));
    }

    // Fresh field lines come before fresh button lines, document order otherwise
    pairs.sort_by_key(|(line, _)| line.options.sequence);

    tracing::debug!(
        customization = %input.customization,
        new_lines = pairs.len(),
        "computed difference"
    );

    let (lines, snapshots) = pairs.into_iter().unzip();
    Ok(Difference { lines, snapshots })
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewconf_types::{
        ButtonId, FieldId, FieldKind, LineKind, ModelId, OptionalMode, DEFAULT_BUTTON_SEQUENCE,
        DEFAULT_FIELD_SEQUENCE,
    };

    const CUSTOM: CustomizationId = CustomizationId::new(1);

    fn field(id: i64, name: &str, kind: FieldKind) -> ModelField {
        ModelField {
            id: FieldId::new(id),
            model: ModelId::new(1),
            name: name.to_string(),
            kind,
            relation: None,
            description: None,
        }
    }

    fn button(id: i64, name: &str) -> ModelButton {
        ModelButton {
            id: ButtonId::new(id),
            model: ModelId::new(1),
            name: name.to_string(),
            description: None,
        }
    }

    fn catalog() -> (Vec<ModelField>, Vec<ModelButton>) {
        (
            vec![
                field(1, "name", FieldKind::Char),
                field(2, "size", FieldKind::Integer),
                field(3, "create_date", FieldKind::DateTime),
                field(4, "open", FieldKind::Char),
            ],
            vec![button(1, "open")],
        )
    }

    fn names(diff: &Difference) -> Vec<&str> {
        diff.lines.iter().map(|l| l.name()).collect()
    }

    #[test]
    fn test_new_resources_in_document_order() {
        let (fields, buttons) = catalog();
        let diff = compute_difference(&DiffInput {
            customization: CUSTOM,
            default_arch: r#"<tree><field name="size"/><field name="name"/></tree>"#,
            fields: &fields,
            buttons: &buttons,
            snapshot: &[],
        })
        .unwrap();

        assert_eq!(names(&diff), vec!["size", "name"]);
        for (line, snapshot) in diff.lines.iter().zip(&diff.snapshots) {
            assert_eq!(line.options.sequence, Some(DEFAULT_FIELD_SEQUENCE));
            assert_eq!(line.options.optional, OptionalMode::Unset);
            assert!(!line.options.searchable && !line.options.sum);
            assert_eq!(line.options.expand, None);
            assert_eq!(snapshot.customization, CUSTOM);
            assert_eq!(line.id, None);
        }
        assert_eq!(diff.snapshots[0].resource, ResourceRef::Field(FieldId::new(2)));
    }

    #[test]
    fn test_buttons_take_precedence_and_sort_last() {
        let (fields, buttons) = catalog();
        let diff = compute_difference(&DiffInput {
            customization: CUSTOM,
            default_arch: r#"<tree><field name="open"/><field name="name"/></tree>"#,
            fields: &fields,
            buttons: &buttons,
            snapshot: &[],
        })
        .unwrap();

        assert_eq!(names(&diff), vec!["name", "open"]);
        assert_eq!(diff.lines[1].kind(), LineKind::Button);
        assert_eq!(diff.lines[1].options.sequence, Some(DEFAULT_BUTTON_SEQUENCE));
        assert_eq!(diff.snapshots[1].resource, ResourceRef::Button(ButtonId::new(1)));
    }

    #[test]
    fn test_snapshot_blocks_reinsertion() {
        let (fields, buttons) = catalog();
        let arch = r#"<tree><field name="name"/><field name="size"/></tree>"#;
        let first = compute_difference(&DiffInput {
            customization: CUSTOM,
            default_arch: arch,
            fields: &fields,
            buttons: &buttons,
            snapshot: &[],
        })
        .unwrap();
        assert_eq!(first.len(), 2);

        let second = compute_difference(&DiffInput {
            customization: CUSTOM,
            default_arch: arch,
            fields: &fields,
            buttons: &buttons,
            snapshot: &first.snapshots,
        })
        .unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn test_skips_unknown_system_and_repeated_names() {
        let (fields, buttons) = catalog();
        let diff = compute_difference(&DiffInput {
            customization: CUSTOM,
            default_arch: r#"<tree>
                <field name="rec_name"/>
                <field name="create_date"/>
                <separator/>
                <field name="name"/>
                <field name="name"/>
            </tree>"#,
            fields: &fields,
            buttons: &buttons,
            snapshot: &[],
        })
        .unwrap();

        assert_eq!(names(&diff), vec!["name"]);
    }

    #[test]
    fn test_rejects_non_tree_root() {
        let (fields, buttons) = catalog();
        let input = |arch| DiffInput {
            customization: CUSTOM,
            default_arch: arch,
            fields: &fields,
            buttons: &buttons,
            snapshot: &[],
        };

        assert!(matches!(
            compute_difference(&input("<form/>")),
            Err(Error::UnexpectedRoot(tag)) if tag == "form"
        ));
    }

    #[test]
    fn test_nameless_elements_are_skipped() {
        let (fields, buttons) = catalog();
        let diff = compute_difference(&DiffInput {
            customization: CUSTOM,
            default_arch: r#"<tree><field string="x"/><field name="size"/><button string="Go"/></tree>"#,
            fields: &fields,
            buttons: &buttons,
            snapshot: &[],
        })
        .unwrap();

        assert_eq!(names(&diff), vec!["size"]);
        assert_eq!(diff.snapshots.len(), 1);
    }
}
