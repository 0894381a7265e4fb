use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::collections::HashMap;
use std::io::Cursor;
use viewconf_types::{Line, LineOptions, LineTarget, ModelField, ViewType, is_system_field};

use crate::{Result, normalize_arch};

/// A user's persisted column visibility per field name (`true` = hidden).
pub type ColumnPreferences = HashMap<String, bool>;

/// Renders `lines` into a tree arch, one element per line in slice order
/// (two for datetime fields).
pub fn generate_arch(lines: &[Line], preferences: &ColumnPreferences) -> Result<String> {
    let mut elements = Vec::with_capacity(lines.len());
    for line in lines {
        match &line.target {
            LineTarget::Field(field) => {
                if is_system_field(&field.name) {
                    continue;
                }
                let element = field_element(field, &line.options, preferences);
                if field.kind.is_datetime() {
                    elements.push(with_widget(&element, "date"));
                    elements.push(with_widget(&element, "time"));
                } else {
                    elements.push(element);
                }
            }
            LineTarget::Button(button) => {
                let mut element = BytesStart::new("button");
                element.push_attribute(("name", button.name.as_str()));
                if line.options.searchable {
                    element.push_attribute(("tree_invisible", "1"));
                }
                elements.push(element);
            }
        }
    }

    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Start(BytesStart::new("tree")))?;
    for element in elements {
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("tree")))?;

    let xml = String::from_utf8(writer.into_inner().into_inner())?;
    normalize_arch(&xml)
}

/// Arch used when a model stores no view of the requested type.
///
/// Trees show the `name` column when the model has one; forms get a
/// label/field pair per non-system field. Other view types have no fallback.
pub fn synthesize_arch(view_type: ViewType, fields: &[ModelField]) -> Result<Option<String>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let root = view_type.as_str();

    match view_type {
        ViewType::Tree => {
            writer.write_event(Event::Start(BytesStart::new(root)))?;
            if fields.iter().any(|f| f.name == "name") {
                let mut element = BytesStart::new("field");
                element.push_attribute(("name", "name"));
                writer.write_event(Event::Empty(element))?;
            }
            writer.write_event(Event::End(BytesEnd::new(root)))?;
        }
        ViewType::Form => {
            writer.write_event(Event::Start(BytesStart::new(root)))?;
            for field in fields.iter().filter(|f| !is_system_field(&f.name)) {
                let mut label = BytesStart::new("label");
                label.push_attribute(("name", field.name.as_str()));
                writer.write_event(Event::Empty(label))?;
                let mut element = BytesStart::new("field");
                element.push_attribute(("name", field.name.as_str()));
                writer.write_event(Event::Empty(element))?;
            }
            writer.write_event(Event::End(BytesEnd::new(root)))?;
        }
        ViewType::Graph | ViewType::Calendar => return Ok(None),
    }

    let xml = String::from_utf8(writer.into_inner().into_inner())?;
    normalize_arch(&xml).map(Some)
}

fn field_element(
    field: &ModelField,
    options: &LineOptions,
    preferences: &ColumnPreferences,
) -> BytesStart<'static> {
    let mut element = BytesStart::new("field");
    element.push_attribute(("name", field.name.as_str()));

    if options.optional.is_set() {
        let value = match preferences.get(&field.name) {
            Some(true) => Some("1"),
            Some(false) => Some("0"),
            None => options.optional.default_attribute(),
        };
        if let Some(value) = value {
            element.push_attribute(("optional", value));
        }
    }
    if options.searchable {
        element.push_attribute(("tree_invisible", "1"));
    }
    if let Some(expand) = options.expand.filter(|e| *e != 0) {
        element.push_attribute(("expand", expand.to_string().as_str()));
    }
    if options.sum && field.kind.is_summable() {
        element.push_attribute(("sum", "1"));
    }

    element
}

fn with_widget(element: &BytesStart<'static>, widget: &str) -> BytesStart<'static> {
    let mut element = element.clone();
    element.push_attribute(("widget", widget));
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewconf_types::{
        ButtonId, CustomizationId, FieldId, FieldKind, ModelButton, ModelId, OptionalMode,
    };

    const CUSTOM: CustomizationId = CustomizationId::new(1);

    fn field(name: &str, kind: FieldKind) -> ModelField {
        ModelField {
            id: FieldId::new(1),
            model: ModelId::new(1),
            name: name.to_string(),
            kind,
            relation: None,
            description: None,
        }
    }

    fn field_line(name: &str, kind: FieldKind, options: LineOptions) -> Line {
        let mut line = Line::for_field(CUSTOM, field(name, kind));
        line.options = options;
        line
    }

    fn render(lines: &[Line]) -> String {
        generate_arch(lines, &ColumnPreferences::new()).unwrap()
    }

    #[test]
    fn test_empty_customization() {
        assert_eq!(render(&[]), "<tree/>");
    }

    #[test]
    fn test_system_fields_never_rendered() {
        let lines = vec![
            field_line("create_uid", FieldKind::Many2One, LineOptions::default()),
            field_line("name", FieldKind::Char, LineOptions::default()),
            field_line("write_date", FieldKind::DateTime, LineOptions::default()),
        ];
        assert_eq!(render(&lines), r#"<tree><field name="name"/></tree>"#);
    }

    #[test]
    fn test_datetime_renders_twice() {
        let options = LineOptions {
            optional: OptionalMode::Hide,
            searchable: true,
            expand: Some(2),
            ..LineOptions::default()
        };
        let lines = vec![field_line("timestamp", FieldKind::DateTime, options)];
        insta::assert_snapshot!(render(&lines), @r#"<tree><field name="timestamp" optional="1" tree_invisible="1" expand="2" widget="date"/><field name="timestamp" optional="1" tree_invisible="1" expand="2" widget="time"/></tree>"#);
    }

    #[test]
    fn test_sum_only_for_summable_kinds() {
        let options = LineOptions {
            sum: true,
            ..LineOptions::default()
        };
        let lines = vec![
            field_line("description", FieldKind::Text, options.clone()),
            field_line("size", FieldKind::Integer, options.clone()),
            field_line("duration", FieldKind::TimeDelta, options),
        ];
        assert_eq!(
            render(&lines),
            r#"<tree><field name="description"/><field name="size" sum="1"/><field name="duration" sum="1"/></tree>"#
        );
    }

    #[test]
    fn test_zero_expand_is_omitted() {
        let options = LineOptions {
            expand: Some(0),
            ..LineOptions::default()
        };
        let lines = vec![field_line("name", FieldKind::Char, options)];
        assert_eq!(render(&lines), r#"<tree><field name="name"/></tree>"#);
    }

    #[test]
    fn test_optional_prefers_user_preference() {
        let show = LineOptions {
            optional: OptionalMode::Show,
            ..LineOptions::default()
        };
        let lines = vec![
            field_line("name", FieldKind::Char, show.clone()),
            field_line("size", FieldKind::Integer, show),
            field_line("type", FieldKind::Selection, LineOptions::default()),
        ];
        let preferences = ColumnPreferences::from([
            ("size".to_string(), true),
            ("type".to_string(), true),
        ]);

        assert_eq!(
            generate_arch(&lines, &preferences).unwrap(),
            r#"<tree><field name="name" optional="0"/><field name="size" optional="1"/><field name="type"/></tree>"#
        );
    }

    #[test]
    fn test_synthesized_defaults() {
        let fields = vec![
            field("name", FieldKind::Char),
            field("create_date", FieldKind::DateTime),
            field("size", FieldKind::Integer),
        ];

        assert_eq!(
            synthesize_arch(ViewType::Tree, &fields).unwrap().as_deref(),
            Some(r#"<tree><field name="name"/></tree>"#)
        );
        assert_eq!(
            synthesize_arch(ViewType::Tree, &fields[1..]).unwrap().as_deref(),
            Some("<tree/>")
        );
        assert_eq!(
            synthesize_arch(ViewType::Form, &fields).unwrap().as_deref(),
            Some(r#"<form><label name="name"/><field name="name"/><label name="size"/><field name="size"/></form>"#)
        );
        assert_eq!(synthesize_arch(ViewType::Graph, &fields).unwrap(), None);
    }

    #[test]
    fn test_buttons() {
        let mut open = Line::for_button(
            CUSTOM,
            ModelButton {
                id: ButtonId::new(1),
                model: ModelId::new(1),
                name: "open".to_string(),
                description: None,
            },
        );
        open.options.searchable = true;
        open.options.sum = true;
        open.options.expand = Some(3);

        assert_eq!(
            render(&[open]),
            r#"<tree><button name="open" tree_invisible="1"/></tree>"#
        );
    }
}
