//! Owned XML document tree.
//!
//! Each field of a saved object is a child element holding text, e.g.
//! `<note><position>48</position><velocity>0.8</velocity></note>`. Readers
//! take a default that is used when the tag is absent or unparsable, so old
//! documents missing newer fields still load.
//!
//! Text is kept exactly as written; only numeric and boolean readers trim
//! surrounding whitespace. Whitespace-only text in elements that have
//! children is indentation and is dropped.

use core::fmt;
use core::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::FormatError;

/// One element: a name, its text content and its child elements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlNode>,
}

fn xml_error(e: impl fmt::Display) -> FormatError {
    FormatError::Xml(e.to_string())
}

impl XmlNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            ..Self::default()
        }
    }

    /// First child called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children called `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Append a child and return it for further writing.
    pub fn add_child(&mut self, child: XmlNode) -> &mut XmlNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    // --- Writing fields ---

    pub fn write_string(&mut self, tag: &str, value: &str) {
        let mut node = XmlNode::new(tag);
        node.text.push_str(value);
        self.children.push(node);
    }

    pub fn write_int(&mut self, tag: &str, value: i64) {
        self.write_string(tag, &value.to_string());
    }

    /// Floats are written in their shortest exact form so they read back
    /// bit-identical.
    pub fn write_float(&mut self, tag: &str, value: f32) {
        self.write_string(tag, &value.to_string());
    }

    pub fn write_bool(&mut self, tag: &str, value: bool) {
        self.write_string(tag, if value { "true" } else { "false" });
    }

    // --- Reading fields ---

    pub fn read_string(&self, tag: &str, default: &str) -> String {
        match self.child(tag) {
            Some(node) => node.text.clone(),
            None => {
                log::debug!("<{}> has no <{}>, using {:?}", self.name, tag, default);
                String::from(default)
            }
        }
    }

    pub fn read_int(&self, tag: &str, default: i64) -> i64 {
        self.read_parsed(tag, default)
    }

    /// `NaN` and infinities count as unparsable.
    pub fn read_float(&self, tag: &str, default: f32) -> f32 {
        let value = self.read_parsed(tag, default);
        if value.is_finite() {
            value
        } else {
            log::warn!("<{}>: non-finite {}, using {}", tag, value, default);
            default
        }
    }

    /// Accepts `true`/`false` as well as `1`/`0`.
    pub fn read_bool(&self, tag: &str, default: bool) -> bool {
        let Some(node) = self.child(tag) else {
            return default;
        };
        match node.text.trim() {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                log::warn!("<{}>: bad boolean {:?}, using {}", tag, other, default);
                default
            }
        }
    }

    fn read_parsed<T: FromStr + fmt::Display + Copy>(&self, tag: &str, default: T) -> T {
        let Some(node) = self.child(tag) else {
            log::debug!("<{}> has no <{}>, using {}", self.name, tag, default);
            return default;
        };
        node.text.trim().parse().unwrap_or_else(|_| {
            log::warn!("<{}>: cannot parse {:?}, using {}", tag, node.text, default);
            default
        })
    }

    /// Read a field that has no sensible default.
    pub fn read_required<T: FromStr>(&self, tag: &'static str) -> Result<T, FormatError> {
        let node = self.child(tag).ok_or(FormatError::MissingField(tag))?;
        node.text.trim().parse().map_err(|_| FormatError::InvalidValue {
            field: tag,
            value: node.text.clone(),
        })
    }

    /// Fail unless this node is called `name`.
    pub fn expect_name(&self, name: &'static str) -> Result<(), FormatError> {
        if self.name != name {
            return Err(FormatError::UnexpectedRoot {
                expected: name,
                found: self.name.clone(),
            });
        }
        Ok(())
    }

    // --- Documents ---

    /// Parse a document and return its root element. Attributes,
    /// comments and processing instructions are ignored.
    pub fn parse(xml: &str) -> Result<XmlNode, FormatError> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<XmlNode> = Vec::new();
        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(e) => stack.push(XmlNode::new(&element_name(&e))),
                Event::Empty(e) => {
                    let node = XmlNode::new(&element_name(&e));
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Ok(node),
                    }
                }
                Event::Text(t) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&t.unescape().map_err(xml_error)?);
                    }
                }
                Event::CData(c) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&c));
                    }
                }
                Event::End(_) => {
                    let mut node = stack
                        .pop()
                        .ok_or_else(|| FormatError::Xml(String::from("unbalanced closing tag")))?;
                    if !node.children.is_empty() && node.text.trim().is_empty() {
                        node.text.clear();
                    }
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Ok(node),
                    }
                }
                Event::Eof => {
                    return Err(FormatError::Xml(String::from("document has no root element")))
                }
                _ => {}
            }
        }
    }

    /// Serialize as an indented document with an XML declaration.
    pub fn to_xml_string(&self) -> Result<String, FormatError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;
        self.write_to(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(xml_error)
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), FormatError> {
        let name = self.name.as_str();
        if self.text.is_empty() && self.children.is_empty() {
            return writer
                .write_event(Event::Empty(BytesStart::new(name)))
                .map_err(xml_error);
        }
        writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_error)?;
        if !self.text.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(&self.text)))
                .map_err(xml_error)?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_round_trip_through_text() {
        let mut node = XmlNode::new("note");
        node.write_int("position", 48);
        node.write_float("velocity", 0.8);
        node.write_bool("note_off", true);
        node.write_string("key", "Fs-1");

        let xml = node.to_xml_string().unwrap();
        let back = XmlNode::parse(&xml).unwrap();
        assert_eq!(back, node);
        assert_eq!(back.read_int("position", 0), 48);
        assert_eq!(back.read_float("velocity", 0.0), 0.8);
        assert!(back.read_bool("note_off", false));
        assert_eq!(back.read_string("key", "C0"), "Fs-1");
    }

    #[test]
    fn missing_or_bad_fields_use_defaults() {
        let node =
            XmlNode::parse("<note><velocity>loud</velocity><note_off>maybe</note_off></note>")
                .unwrap();
        assert_eq!(node.read_float("velocity", 0.8), 0.8);
        assert_eq!(node.read_int("position", 7), 7);
        assert!(!node.read_bool("note_off", false));
        assert_eq!(node.read_string("key", "C0"), "C0");
    }

    #[test]
    fn non_finite_floats_use_defaults() {
        let node = XmlNode::parse(
            "<note><velocity>NaN</velocity><pan_L>inf</pan_L><pitch>-infinity</pitch></note>",
        )
        .unwrap();
        assert_eq!(node.read_float("velocity", 0.8), 0.8);
        assert_eq!(node.read_float("pan_L", 0.5), 0.5);
        assert_eq!(node.read_float("pitch", 0.0), 0.0);
    }

    #[test]
    fn surrounding_whitespace_in_text_survives() {
        let mut node = XmlNode::new("drumkit_info");
        node.write_string("name", "  808 ");
        node.write_float("volume", 0.5);
        let xml = node.to_xml_string().unwrap();
        let back = XmlNode::parse(&xml).unwrap();
        assert_eq!(back, node);
        assert_eq!(back.read_string("name", ""), "  808 ");

        let padded = XmlNode::parse("<n>\n  <v> 0.25 </v>\n</n>").unwrap();
        assert!(padded.text.is_empty());
        assert_eq!(padded.read_float("v", 0.0), 0.25);
    }

    #[test]
    fn numeric_booleans_accepted() {
        let node = XmlNode::parse("<n><a>1</a><b>0</b></n>").unwrap();
        assert!(node.read_bool("a", false));
        assert!(!node.read_bool("b", true));
    }

    #[test]
    fn required_fields_report_problems() {
        let node = XmlNode::parse("<note><instrument>abc</instrument></note>").unwrap();
        assert_eq!(
            node.read_required::<u32>("instrument"),
            Err(FormatError::InvalidValue {
                field: "instrument",
                value: String::from("abc"),
            })
        );
        assert_eq!(
            node.read_required::<u32>("position"),
            Err(FormatError::MissingField("position"))
        );
    }

    #[test]
    fn parses_nested_lists_and_empty_elements() {
        let xml = r#"<?xml version="1.0"?>
            <!-- saved by hand -->
            <pattern>
                <name>Intro &amp; Verse</name>
                <info/>
                <noteList>
                    <note><position>0</position></note>
                    <note><position>24</position></note>
                </noteList>
            </pattern>"#;
        let root = XmlNode::parse(xml).unwrap();
        assert_eq!(root.name, "pattern");
        assert_eq!(root.read_string("name", ""), "Intro & Verse");
        assert!(root.child("info").is_some());
        let list = root.child("noteList").unwrap();
        let positions: Vec<i64> = list
            .children_named("note")
            .map(|n| n.read_int("position", -1))
            .collect();
        assert_eq!(positions, [0, 24]);
    }

    #[test]
    fn text_is_escaped_on_write() {
        let mut node = XmlNode::new("drumkit_info");
        node.write_string("name", "<Rock & Roll>");
        let xml = node.to_xml_string().unwrap();
        assert!(xml.contains("&lt;Rock &amp; Roll&gt;"));
        assert_eq!(
            XmlNode::parse(&xml).unwrap().read_string("name", ""),
            "<Rock & Roll>"
        );
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(XmlNode::parse(""), Err(FormatError::Xml(_))));
        assert!(matches!(XmlNode::parse("<a><b></a>"), Err(FormatError::Xml(_))));
        assert!(matches!(XmlNode::parse("<a><b>"), Err(FormatError::Xml(_))));
    }

    #[test]
    fn expect_name_checks_root() {
        let node = XmlNode::new("song");
        assert_eq!(
            node.expect_name("pattern"),
            Err(FormatError::UnexpectedRoot {
                expected: "pattern",
                found: String::from("song"),
            })
        );
        assert!(XmlNode::new("pattern").expect_name("pattern").is_ok());
    }
}
