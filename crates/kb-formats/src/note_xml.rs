//! `<note>` elements.

use kb_ir::{InstrumentId, InstrumentList, Note};

use crate::xml::XmlNode;
use crate::FormatError;

const DEFAULT_VELOCITY: f32 = 0.8;
const DEFAULT_PAN: f32 = 0.5;
/// Play the whole sample.
const DEFAULT_LENGTH: i64 = -1;

/// Write the persisted fields of `note` into `node`.
///
/// Runtime state (envelope progress, filter buffers, sample position,
/// humanize delay, the just-recorded flag) is not saved.
pub fn save_note(note: &Note, node: &mut XmlNode) {
    node.write_int("position", i64::from(note.position()));
    node.write_float("leadlag", note.lead_lag());
    node.write_float("velocity", note.velocity());
    node.write_float("pan_L", note.pan_l());
    node.write_float("pan_R", note.pan_r());
    node.write_float("pitch", note.pitch());
    node.write_string("key", &note.key_to_string());
    node.write_int("length", i64::from(note.length()));
    node.write_int("instrument", i64::from(note.instrument().0));
    node.write_bool("note_off", note.note_off());
}

/// A fresh `<note>` element for `note`.
pub fn note_to_xml(note: &Note) -> XmlNode {
    let mut node = XmlNode::new("note");
    save_note(note, &mut node);
    node
}

/// Build a note from `node`, resolving its instrument in `instruments`.
///
/// A note whose instrument is missing from the kit is an error; optional
/// fields fall back to their defaults.
pub fn load_note(node: &XmlNode, instruments: &InstrumentList) -> Result<Note, FormatError> {
    let id = InstrumentId(node.read_required::<u32>("instrument")?);
    let instrument = instruments
        .find(id)
        .ok_or(FormatError::UnknownInstrument(id))?;

    let position = node.read_int("position", 0).clamp(0, i64::from(u32::MAX)) as u32;
    let length = node
        .read_int("length", DEFAULT_LENGTH)
        .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;

    let mut note = Note::new(
        instrument,
        position,
        node.read_float("velocity", DEFAULT_VELOCITY),
        node.read_float("pan_L", DEFAULT_PAN),
        node.read_float("pan_R", DEFAULT_PAN),
        length,
        node.read_float("pitch", 0.0),
    );
    note.set_lead_lag(node.read_float("leadlag", 0.0));
    note.set_key_octave_str(&node.read_string("key", "C0"));
    note.set_note_off(node.read_bool("note_off", false));
    Ok(note)
}
