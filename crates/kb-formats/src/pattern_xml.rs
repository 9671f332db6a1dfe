//! `<pattern>` documents.

use kb_ir::{InstrumentList, Pattern, DEFAULT_PATTERN_SIZE};

use crate::note_xml::{load_note, note_to_xml};
use crate::xml::XmlNode;
use crate::FormatError;

/// Write `pattern` (name, size and note list) into `node`.
pub fn save_pattern(pattern: &Pattern, node: &mut XmlNode) {
    node.write_string("name", &pattern.name);
    node.write_int("size", i64::from(pattern.length));
    let list = node.add_child(XmlNode::new("noteList"));
    for note in pattern.notes() {
        list.add_child(note_to_xml(note));
    }
}

/// Read a pattern from `node`. The first note that fails to load fails the
/// whole pattern.
pub fn load_pattern(node: &XmlNode, instruments: &InstrumentList) -> Result<Pattern, FormatError> {
    let name = node.read_string("name", "unnamed");
    let size = node
        .read_int("size", i64::from(DEFAULT_PATTERN_SIZE))
        .clamp(0, i64::from(u32::MAX)) as u32;

    let mut pattern = Pattern::new(&name, size);
    if let Some(list) = node.child("noteList") {
        for note in list.children_named("note") {
            pattern.insert(load_note(note, instruments)?);
        }
    }
    log::debug!("loaded pattern {:?}: {} ticks, {} notes", pattern.name, size, pattern.len());
    Ok(pattern)
}

/// Parse a whole `<pattern>` document.
pub fn load_pattern_str(xml: &str, instruments: &InstrumentList) -> Result<Pattern, FormatError> {
    let root = XmlNode::parse(xml)?;
    root.expect_name("pattern")?;
    load_pattern(&root, instruments)
}

/// Serialize `pattern` as a standalone `<pattern>` document.
pub fn pattern_to_string(pattern: &Pattern) -> Result<String, FormatError> {
    let mut root = XmlNode::new("pattern");
    save_pattern(pattern, &mut root);
    root.to_xml_string()
}
