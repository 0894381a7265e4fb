//! Diff and generator working together the way the configurator drives them:
//! stored lines first, freshly diffed lines appended.

use viewconf_engine::{ColumnPreferences, DiffInput, compute_difference, generate_arch};
use viewconf_types::{
    ButtonId, CustomizationId, FieldId, FieldKind, Line, ModelButton, ModelField, ModelId,
    SnapshotEntry, ResourceRef,
};

const CUSTOM: CustomizationId = CustomizationId::new(7);

const DEFAULT_ARCH: &str = r#"<?xml version="1.0"?>
<tree>
    <field name="name" expand="1"/>
    <field name="type"/>
    <field name="last_modification" widget="date"/>
    <field name="last_modification" widget="time"/>
    <field name="last_user"/>
    <button name="download"/>
</tree>
"#;

fn model_field(id: i64, name: &str, kind: FieldKind) -> ModelField {
    ModelField {
        id: FieldId::new(id),
        model: ModelId::new(1),
        name: name.to_string(),
        kind,
        relation: None,
        description: None,
    }
}

fn catalog() -> (Vec<ModelField>, Vec<ModelButton>) {
    let fields = vec![
        model_field(1, "name", FieldKind::Char),
        model_field(2, "type", FieldKind::Selection),
        model_field(3, "last_modification", FieldKind::DateTime),
        model_field(4, "create_uid", FieldKind::Many2One),
        model_field(5, "size", FieldKind::Integer),
    ];
    let buttons = vec![ModelButton {
        id: ButtonId::new(1),
        model: ModelId::new(1),
        name: "download".to_string(),
        description: None,
    }];
    (fields, buttons)
}

#[test]
fn test_fresh_customization_mirrors_default_view() {
    let (fields, buttons) = catalog();
    let diff = compute_difference(&DiffInput {
        customization: CUSTOM,
        default_arch: DEFAULT_ARCH,
        fields: &fields,
        buttons: &buttons,
        snapshot: &[],
    })
    .unwrap();

    let arch = generate_arch(&diff.lines, &ColumnPreferences::new()).unwrap();
    insta::assert_snapshot!(arch, @r#"<tree><field name="name"/><field name="type"/><field name="last_modification" widget="date"/><field name="last_modification" widget="time"/><button name="download"/></tree>"#);
}

#[test]
fn test_stored_line_then_new_resources() {
    let (fields, buttons) = catalog();

    // Only "name" kept by the user, "type" removed but already snapshotted
    let stored = vec![Line::for_field(CUSTOM, fields[0].clone())];
    let snapshot = vec![
        SnapshotEntry::new(CUSTOM, ResourceRef::Field(fields[0].id)),
        SnapshotEntry::new(CUSTOM, ResourceRef::Field(fields[1].id)),
    ];

    let diff = compute_difference(&DiffInput {
        customization: CUSTOM,
        default_arch: DEFAULT_ARCH,
        fields: &fields,
        buttons: &buttons,
        snapshot: &snapshot,
    })
    .unwrap();
    assert_eq!(diff.len(), 2);

    let all: Vec<Line> = stored.into_iter().chain(diff.lines).collect();
    let arch = generate_arch(&all, &ColumnPreferences::new()).unwrap();
    assert_eq!(
        arch,
        r#"<tree><field name="name"/><field name="last_modification" widget="date"/><field name="last_modification" widget="time"/><button name="download"/></tree>"#
    );
}
