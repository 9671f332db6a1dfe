//! `<drumkit_info>` documents: a named kit and its instrument list.

use kb_ir::{Adsr, Instrument, InstrumentId, InstrumentList, MIDI_MIDDLE_C};

use crate::xml::XmlNode;
use crate::FormatError;

/// A drumkit as stored on disk.
#[derive(Clone, Debug, Default)]
pub struct Drumkit {
    pub name: String,
    pub instruments: InstrumentList,
}

fn save_instrument(instrument: &Instrument, node: &mut XmlNode) {
    node.write_int("id", i64::from(instrument.id.0));
    node.write_string("name", instrument.name.as_str());
    node.write_float("filterCutoff", instrument.filter_cutoff());
    node.write_float("filterResonance", instrument.filter_resonance());
    node.write_int("midiOutNote", i64::from(instrument.midi_out_note()));
    node.write_float("Attack", instrument.adsr.attack());
    node.write_float("Decay", instrument.adsr.decay());
    node.write_float("Sustain", instrument.adsr.sustain());
    node.write_float("Release", instrument.adsr.release_time());
}

fn load_instrument(node: &XmlNode) -> Result<Instrument, FormatError> {
    let id = node.read_required::<u32>("id")?;
    let mut instrument = Instrument::new(id, &node.read_string("name", ""));
    instrument.set_filter_cutoff(node.read_float("filterCutoff", 1.0));
    instrument.set_filter_resonance(node.read_float("filterResonance", 0.0));
    instrument.midi_out_note = node
        .read_int("midiOutNote", i64::from(MIDI_MIDDLE_C))
        .clamp(0, 127) as i32;
    instrument.adsr = Adsr::new(
        node.read_float("Attack", 0.0),
        node.read_float("Decay", 0.0),
        node.read_float("Sustain", 1.0),
        node.read_float("Release", 1000.0),
    );
    Ok(instrument)
}

/// Write `kit` into a `<drumkit_info>` node.
pub fn save_drumkit(kit: &Drumkit, node: &mut XmlNode) {
    node.write_string("name", &kit.name);
    let list = node.add_child(XmlNode::new("instrumentList"));
    for instrument in kit.instruments.iter() {
        let mut child = XmlNode::new("instrument");
        save_instrument(instrument, &mut child);
        list.add_child(child);
    }
}

/// Read a kit from a `<drumkit_info>` node. A repeated id replaces the
/// earlier instrument.
pub fn load_drumkit(node: &XmlNode) -> Result<Drumkit, FormatError> {
    let mut instruments = InstrumentList::new();
    if let Some(list) = node.child("instrumentList") {
        for child in list.children_named("instrument") {
            let instrument = load_instrument(child)?;
            if instruments.find(instrument.id).is_some() {
                log::warn!("duplicate instrument id {}, keeping the later one", instrument.id);
            }
            instruments.add(instrument);
        }
    }
    let kit = Drumkit {
        name: node.read_string("name", "unnamed"),
        instruments,
    };
    log::debug!("loaded drumkit {:?}: {} instruments", kit.name, kit.instruments.len());
    Ok(kit)
}

/// Parse a whole `<drumkit_info>` document.
pub fn load_drumkit_str(xml: &str) -> Result<Drumkit, FormatError> {
    let root = XmlNode::parse(xml)?;
    root.expect_name("drumkit_info")?;
    load_drumkit(&root)
}

/// Serialize `kit` as a standalone `<drumkit_info>` document.
pub fn drumkit_to_string(kit: &Drumkit) -> Result<String, FormatError> {
    let mut root = XmlNode::new("drumkit_info");
    save_drumkit(kit, &mut root);
    root.to_xml_string()
}

impl Drumkit {
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            instruments: InstrumentList::new(),
        }
    }

    pub fn instrument(&self, id: InstrumentId) -> Option<&Instrument> {
        self.instruments.find(id)
    }
}
