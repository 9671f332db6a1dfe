//! Instrument definitions and the drumkit's instrument list.

use alloc::vec::Vec;
use arrayvec::ArrayString;
use core::fmt;

use crate::adsr::Adsr;

/// MIDI note number of middle C.
pub const MIDI_MIDDLE_C: i32 = 60;

/// Persisted identifier of an instrument within a drumkit.
///
/// Notes hold this instead of the instrument itself; the instrument list
/// owns the instrument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstrumentId(pub u32);

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A drumkit instrument.
#[derive(Clone, Debug)]
pub struct Instrument {
    /// Identifier referenced by notes and saved patterns
    pub id: InstrumentId,
    /// Instrument name (truncated to 32 bytes)
    pub name: ArrayString<32>,
    /// Filter cutoff coefficient (0.0-1.0, 1.0 = open)
    filter_cutoff: f32,
    /// Filter resonance coefficient (0.0-1.0)
    filter_resonance: f32,
    /// MIDI note sent when this instrument plays at C0
    pub midi_out_note: i32,
    /// Envelope template copied into every note played on this instrument
    pub adsr: Adsr,
}

impl Default for Instrument {
    fn default() -> Self {
        Self {
            id: InstrumentId::default(),
            name: ArrayString::new(),
            filter_cutoff: 1.0,
            filter_resonance: 0.0,
            midi_out_note: MIDI_MIDDLE_C,
            adsr: Adsr::default(),
        }
    }
}

impl Instrument {
    /// Create a new instrument with default settings.
    pub fn new(id: u32, name: &str) -> Self {
        let mut inst = Self {
            id: InstrumentId(id),
            ..Self::default()
        };
        inst.set_name(name);
        inst
    }

    /// Replace the name, keeping as many whole characters as fit.
    pub fn set_name(&mut self, name: &str) {
        self.name.clear();
        for c in name.chars() {
            if self.name.try_push(c).is_err() {
                break;
            }
        }
    }

    pub fn filter_cutoff(&self) -> f32 {
        self.filter_cutoff
    }

    /// Clamped to 0.0..=1.0; NaN keeps the current value.
    pub fn set_filter_cutoff(&mut self, cutoff: f32) {
        if !cutoff.is_nan() {
            self.filter_cutoff = cutoff.clamp(0.0, 1.0);
        }
    }

    pub fn filter_resonance(&self) -> f32 {
        self.filter_resonance
    }

    /// Clamped to 0.0..=1.0; NaN keeps the current value.
    pub fn set_filter_resonance(&mut self, resonance: f32) {
        if !resonance.is_nan() {
            self.filter_resonance = resonance.clamp(0.0, 1.0);
        }
    }

    pub fn midi_out_note(&self) -> i32 {
        self.midi_out_note
    }

    /// A fresh copy of the envelope template for a new note.
    pub fn copy_adsr(&self) -> Adsr {
        Adsr::new(
            self.adsr.attack(),
            self.adsr.decay(),
            self.adsr.sustain(),
            self.adsr.release_time(),
        )
    }
}

/// The instruments of a drumkit, in display order.
#[derive(Clone, Debug, Default)]
pub struct InstrumentList {
    instruments: Vec<Instrument>,
}

impl InstrumentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instrument. An existing instrument with the same id is
    /// replaced in place.
    pub fn add(&mut self, instrument: Instrument) {
        match self.instruments.iter_mut().find(|i| i.id == instrument.id) {
            Some(slot) => *slot = instrument,
            None => self.instruments.push(instrument),
        }
    }

    /// Find an instrument by id.
    pub fn find(&self, id: InstrumentId) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.id == id)
    }

    pub fn find_mut(&mut self, id: InstrumentId) -> Option<&mut Instrument> {
        self.instruments.iter_mut().find(|i| i.id == id)
    }

    /// Instrument at a display position.
    pub fn get(&self, index: usize) -> Option<&Instrument> {
        self.instruments.get(index)
    }

    /// Remove and return an instrument by id.
    pub fn remove(&mut self, id: InstrumentId) -> Option<Instrument> {
        let index = self.instruments.iter().position(|i| i.id == id)?;
        Some(self.instruments.remove(index))
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }
}

impl FromIterator<Instrument> for InstrumentList {
    fn from_iter<T: IntoIterator<Item = Instrument>>(iter: T) -> Self {
        let mut list = InstrumentList::new();
        for inst in iter {
            list.add(inst);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_open_filter_and_middle_c() {
        let inst = Instrument::new(3, "Snare");
        assert_eq!(inst.id, InstrumentId(3));
        assert_eq!(inst.name.as_str(), "Snare");
        assert_eq!(inst.filter_cutoff(), 1.0);
        assert_eq!(inst.filter_resonance(), 0.0);
        assert_eq!(inst.midi_out_note(), MIDI_MIDDLE_C);
    }

    #[test]
    fn long_names_are_truncated() {
        let long = "An extremely long instrument name for a kick drum";
        let inst = Instrument::new(0, long);
        assert_eq!(inst.name.len(), 32);
        assert!(long.starts_with(inst.name.as_str()));
    }

    #[test]
    fn filter_coefficients_are_clamped() {
        let mut inst = Instrument::default();
        inst.set_filter_cutoff(1.5);
        inst.set_filter_resonance(-0.5);
        assert_eq!(inst.filter_cutoff(), 1.0);
        assert_eq!(inst.filter_resonance(), 0.0);
    }

    #[test]
    fn nan_filter_coefficients_are_ignored() {
        let mut inst = Instrument::default();
        inst.set_filter_cutoff(0.4);
        inst.set_filter_resonance(0.3);
        inst.set_filter_cutoff(f32::NAN);
        inst.set_filter_resonance(f32::NAN);
        assert_eq!(inst.filter_cutoff(), 0.4);
        assert_eq!(inst.filter_resonance(), 0.3);

        let fresh = {
            let mut i = Instrument::default();
            i.set_filter_cutoff(f32::NAN);
            i.set_filter_resonance(f32::NAN);
            i
        };
        assert_eq!(fresh.filter_cutoff(), 1.0);
        assert_eq!(fresh.filter_resonance(), 0.0);
    }

    #[test]
    fn copied_adsr_starts_fresh() {
        let mut inst = Instrument::default();
        inst.adsr = Adsr::new(10.0, 20.0, 0.5, 300.0);
        inst.adsr.get_value(50.0);

        let copy = inst.copy_adsr();
        assert_eq!(copy, Adsr::new(10.0, 20.0, 0.5, 300.0));
    }

    #[test]
    fn list_find_and_replace() {
        let mut list: InstrumentList = [Instrument::new(0, "Kick"), Instrument::new(1, "Snare")]
            .into_iter()
            .collect();
        assert_eq!(list.len(), 2);
        assert_eq!(list.find(InstrumentId(1)).map(|i| i.name.as_str()), Some("Snare"));
        assert!(list.find(InstrumentId(7)).is_none());

        list.add(Instrument::new(1, "Rimshot"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).map(|i| i.name.as_str()), Some("Rimshot"));

        assert!(list.remove(InstrumentId(0)).is_some());
        assert!(list.remove(InstrumentId(0)).is_none());
        assert_eq!(list.len(), 1);
    }
}
