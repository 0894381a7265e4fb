use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};
use std::io::Cursor;

use crate::{Error, Result};

/// One element of a view arch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchElement {
    pub tag: String,
    /// Value of the `name` attribute, if any.
    pub name: Option<String>,
    /// Attributes in document order, unescaped.
    pub attributes: Vec<(String, String)>,
}

impl ArchElement {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        let name = attributes
            .iter()
            .find(|(k, _)| k == "name")
            .map(|(_, v)| v.clone());

        Ok(Self {
            tag,
            name,
            attributes,
        })
    }
}

/// A parsed arch: the root tag and its direct children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arch {
    pub root: String,
    pub elements: Vec<ArchElement>,
}

/// Calls `visit(depth, element)` for every element; the root is at depth 0.
/// Comments, processing instructions and text are skipped.
pub(crate) fn walk<F>(arch: &str, mut visit: F) -> Result<()>
where
    F: FnMut(usize, &BytesStart<'_>) -> Result<()>,
{
    let mut reader = Reader::from_str(arch);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut seen_root = false;
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                visit(depth, &start)?;
                seen_root = true;
                depth += 1;
            }
            Event::Empty(start) => {
                visit(depth, &start)?;
                seen_root = true;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(Error::EmptyDocument);
    }
    Ok(())
}

pub fn parse_arch(arch: &str) -> Result<Arch> {
    let mut root = None;
    let mut elements = Vec::new();

    walk(arch, |depth, start| {
        match depth {
            0 if root.is_none() => {
                root = Some(String::from_utf8_lossy(start.name().as_ref()).into_owned());
            }
            1 => elements.push(ArchElement::from_start(start)?),
            _ => {}
        }
        Ok(())
    })?;

    let root = root.ok_or(Error::EmptyDocument)?;
    Ok(Arch { root, elements })
}

/// Re-serializes `xml` without blank text, XML declaration or indentation.
/// Elements without content collapse to their self-closing form.
pub fn normalize_arch(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut pending: Option<BytesStart<'static>> = None;
    loop {
        let event = reader.read_event()?;
        if let Event::End(_) = &event
            && let Some(start) = pending.take()
        {
            writer.write_event(Event::Empty(start))?;
            continue;
        }
        if let Some(start) = pending.take() {
            writer.write_event(Event::Start(start))?;
        }

        match event {
            Event::Start(start) => pending = Some(compact(&start)?),
            Event::Empty(start) => writer.write_event(Event::Empty(compact(&start)?))?,
            Event::Decl(_) => {}
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

// Rebuilds a tag so attribute spacing does not depend on the source text.
fn compact(start: &BytesStart<'_>) -> Result<BytesStart<'static>> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut compacted = BytesStart::new(name);
    for attr in start.attributes() {
        compacted.push_attribute(attr?);
    }
    Ok(compacted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arch_direct_children_only() {
        let arch = parse_arch(
            r#"<?xml version="1.0"?>
            <tree>
                <!-- heading -->
                <field name="name" expand="1"/>
                <group><field name="nested"/></group>
                <button name="open" string="Open &amp; go"/>
            </tree>"#,
        )
        .unwrap();

        assert_eq!(arch.root, "tree");
        let tags: Vec<&str> = arch.elements.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["field", "group", "button"]);
        assert_eq!(arch.elements[0].name.as_deref(), Some("name"));
        assert_eq!(arch.elements[0].attribute("expand"), Some("1"));
        assert_eq!(arch.elements[1].name, None);
        assert_eq!(arch.elements[2].attribute("string"), Some("Open & go"));
    }

    #[test]
    fn test_parse_arch_rejects_empty_and_malformed() {
        assert!(matches!(parse_arch("   "), Err(Error::EmptyDocument)));
        assert!(matches!(
            parse_arch("<tree><field name=\"a\"></tree>"),
            Err(Error::Xml(_))
        ));
    }

    #[test]
    fn test_normalize_arch() {
        let xml = "<?xml version=\"1.0\"?>\n<tree>\n  <field name=\"name\" />\n  <group>\n  </group>\n</tree>\n";
        assert_eq!(
            normalize_arch(xml).unwrap(),
            r#"<tree><field name="name"/><group/></tree>"#
        );
        assert_eq!(normalize_arch("<tree></tree>").unwrap(), "<tree/>");
        assert_eq!(
            normalize_arch("<tree><field  name='a'   widget='date'/></tree>").unwrap(),
            r#"<tree><field name="a" widget="date"/></tree>"#
        );
    }
}
