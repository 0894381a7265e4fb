//! Assertions over rendered archs and CLI JSON output.

use anyhow::{Context, Result, bail};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::Value;

/// `(tag, name, attributes)` of every element under the root, in order.
pub type ArchColumn = (String, String, Vec<(String, String)>);

/// Lists the direct children of an arch's root element.
pub fn arch_columns(arch: &str) -> Result<Vec<ArchColumn>> {
    let mut reader = Reader::from_str(arch);
    let mut depth = 0usize;
    let mut columns = Vec::new();

    loop {
        let event = reader.read_event().context("Malformed arch")?;
        let (element, empty) = match &event {
            Event::Start(e) => (e, false),
            Event::Empty(e) => (e, true),
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        if depth == 1 {
            let tag = String::from_utf8(element.name().as_ref().to_vec())?;
            let mut name = String::new();
            let mut attributes = Vec::new();
            for attr in element.attributes() {
                let attr = attr?;
                let key = String::from_utf8(attr.key.as_ref().to_vec())?;
                let value = attr.unescape_value()?.into_owned();
                if key == "name" {
                    name = value;
                } else {
                    attributes.push((key, value));
                }
            }
            columns.push((tag, name, attributes));
        }
        if !empty {
            depth += 1;
        }
    }

    Ok(columns)
}

/// Names of the root's children, in order (datetime columns appear twice).
pub fn arch_names(arch: &str) -> Result<Vec<String>> {
    Ok(arch_columns(arch)?
        .into_iter()
        .map(|(_, name, _)| name)
        .collect())
}

/// Assert that an arch shows exactly these names, in order.
pub fn assert_arch_names(arch: &str, expected: &[&str]) -> Result<()> {
    let names = arch_names(arch)?;
    if names != expected {
        bail!("Expected columns {:?}, got {:?} in {}", expected, names, arch);
    }
    Ok(())
}

/// Assert that the column `name` carries `attribute="value"` at least once.
pub fn assert_column_attribute(arch: &str, name: &str, attribute: &str, value: &str) -> Result<()> {
    let columns = arch_columns(arch)?;
    let found = columns
        .iter()
        .filter(|(_, n, _)| n == name)
        .any(|(_, _, attrs)| attrs.iter().any(|(k, v)| k == attribute && v == value));
    if !found {
        bail!("Column {} has no {}=\"{}\" in {}", name, attribute, value, arch);
    }
    Ok(())
}

/// Assert that a JSON array at `pointer` has `expected` entries.
pub fn assert_json_len(json: &Value, pointer: &str, expected: usize) -> Result<()> {
    let items = json
        .pointer(pointer)
        .and_then(Value::as_array)
        .with_context(|| format!("Expected array at '{}' in JSON", pointer))?;
    if items.len() != expected {
        bail!("Expected {} entries at '{}', got {}", expected, pointer, items.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arch_columns_skip_nested_elements() {
        let arch = r#"<tree><field name="a" expand="1"/><group name="g"><field name="b"/></group><button name="c"/></tree>"#;
        assert_eq!(arch_names(arch).unwrap(), vec!["a", "g", "c"]);
        assert!(assert_column_attribute(arch, "a", "expand", "1").is_ok());
        assert!(assert_column_attribute(arch, "c", "expand", "1").is_err());
    }

    #[test]
    fn test_assert_arch_names() {
        assert!(assert_arch_names("<tree/>", &[]).is_ok());
        assert!(assert_arch_names(r#"<tree><field name="x"/></tree>"#, &["y"]).is_err());
    }
}
