//! Thin element tree over `quick-xml`.
//!
//! Documents are small, so loading reads the whole file into an [`Element`]
//! tree before any of it is applied to the model.

use std::io::Write;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use super::PersistError;
use super::property::{Properties, PropertyValue};

pub const PROPERTY_TAG: &str = "property";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn require_attribute(&self, key: &str) -> Result<&str, PersistError> {
        self.attribute(key)
            .ok_or_else(|| PersistError::MissingAttribute {
                element: self.name.clone(),
                attribute: key.to_string(),
            })
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, PersistError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }
}

/// Parse a complete document into its root element
pub fn parse_document(text: &str) -> Result<Element, PersistError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Element::from_start(&start)?),
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| PersistError::Malformed("unbalanced end tag".into()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(PersistError::Malformed("unclosed element".into()));
    }
    root.ok_or_else(|| PersistError::Malformed("document has no root element".into()))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), PersistError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(PersistError::Malformed("multiple root elements".into())),
    }
    Ok(())
}

pub fn write_declaration<W: Write>(writer: &mut Writer<W>) -> Result<(), PersistError> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    Ok(())
}

pub fn write_start<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<(), PersistError> {
    let mut start = BytesStart::new(name);
    for attr in attributes {
        start.push_attribute(*attr);
    }
    writer.write_event(Event::Start(start))?;
    Ok(())
}

pub fn write_end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), PersistError> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write one `<property name=".." value=".."/>` element
pub fn write_property<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &PropertyValue,
) -> Result<(), PersistError> {
    let text = value.to_string();
    let mut element = BytesStart::new(PROPERTY_TAG);
    element.push_attribute(("name", name));
    element.push_attribute(("value", text.as_str()));
    writer.write_event(Event::Empty(element))?;
    Ok(())
}

pub fn write_properties<W: Write, P: Properties + ?Sized>(
    writer: &mut Writer<W>,
    source: &P,
) -> Result<(), PersistError> {
    for (name, value) in source.properties() {
        write_property(writer, name, &value)?;
    }
    Ok(())
}

/// Apply one `property` element to `target`.
///
/// Elements with another tag, an empty name or an empty value are ignored.
/// Assignment failures are logged and skipped; they never abort a load.
pub fn apply_property<P: Properties + ?Sized>(element: &Element, target: &mut P) {
    if element.name != PROPERTY_TAG {
        return;
    }
    let name = element.attribute("name").unwrap_or_default();
    let value = element.attribute("value").unwrap_or_default();
    if name.is_empty() || value.is_empty() {
        return;
    }
    if let Err(e) = target.set_property(name, value) {
        tracing::debug!("Skipping property: {}", e);
    }
}

/// Apply every `property` child of `element` to `target`
pub fn apply_properties<P: Properties + ?Sized>(element: &Element, target: &mut P) {
    for child in &element.children {
        apply_property(child, target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_elements() {
        let root = parse_document(
            r#"<?xml version="1.0"?>
            <root a="1">
              <child name="x" value="&lt;y&gt;"/>
              <group><leaf/></group>
            </root>"#,
        )
        .unwrap();

        assert_eq!(root.name, "root");
        assert_eq!(root.attribute("a"), Some("1"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].attribute("value"), Some("<y>"));
        assert_eq!(root.children[1].children[0].name, "leaf");
    }

    #[test]
    fn test_parse_rejects_mismatched_tags() {
        assert!(parse_document("<root><a></b></root>").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_document() {
        assert!(matches!(
            parse_document("   "),
            Err(PersistError::Malformed(_))
        ));
    }

    #[test]
    fn test_require_attribute_reports_element() {
        let element = Element {
            name: "layer".into(),
            ..Default::default()
        };
        let err = element.require_attribute("id").unwrap_err();
        assert!(err.to_string().contains("layer"));
        assert!(err.to_string().contains("id"));
    }

    #[test]
    fn test_write_property_escapes_value() {
        let mut writer = Writer::new(Vec::new());
        write_property(&mut writer, "Name", &PropertyValue::from("a<b")).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, r#"<property name="Name" value="a&lt;b"/>"#);
    }
}
