//! Patterns: a named, fixed-length run of notes.

use alloc::string::String;
use alloc::vec::Vec;

use crate::instrument::InstrumentId;
use crate::key::Key;
use crate::note::Note;

/// Default pattern length in ticks (one 4/4 bar at 48 ticks per beat).
pub const DEFAULT_PATTERN_SIZE: u32 = 192;

/// A pattern holding notes ordered by position.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub name: String,
    /// Length in ticks
    pub length: u32,
    notes: Vec<Note>,
}

impl Default for Pattern {
    fn default() -> Self {
        Self::new("Pattern 1", DEFAULT_PATTERN_SIZE)
    }
}

impl Pattern {
    /// Create an empty pattern.
    pub fn new(name: &str, length: u32) -> Self {
        Self {
            name: String::from(name),
            length,
            notes: Vec::new(),
        }
    }

    /// Insert a note after any notes already at the same position.
    pub fn insert(&mut self, note: Note) {
        let idx = self.notes.partition_point(|n| n.position() <= note.position());
        self.notes.insert(idx, note);
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Edit notes in place. Notes are put back in position order afterwards,
    /// keeping the relative order of notes that share a position.
    pub fn edit_notes<R>(&mut self, f: impl FnOnce(&mut [Note]) -> R) -> R {
        let result = f(&mut self.notes);
        self.notes.sort_by_key(Note::position);
        result
    }

    /// Notes starting at `position`.
    pub fn notes_at(&self, position: u32) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(move |n| n.position() == position)
    }

    /// The latest-positioned sounding note for `instrument` at this key and
    /// octave, if any. Among notes at the same position the last inserted
    /// wins. Used to pair an incoming key-off with the note it releases.
    pub fn find_sounding(
        &mut self,
        instrument: InstrumentId,
        key: Key,
        octave: i32,
    ) -> Option<&mut Note> {
        self.notes
            .iter_mut()
            .rev()
            .find(|n| !n.note_off() && n.matches(instrument, key, octave))
    }

    /// Remove every note of `instrument` at `position`; returns how many
    /// were removed.
    pub fn remove_at(&mut self, position: u32, instrument: InstrumentId) -> usize {
        let before = self.notes.len();
        self.notes
            .retain(|n| !(n.position() == position && n.instrument() == instrument));
        before - self.notes.len()
    }

    /// Drop all notes referring to `instrument`, e.g. after it left the kit.
    pub fn purge_instrument(&mut self, instrument: InstrumentId) -> usize {
        let before = self.notes.len();
        self.notes.retain(|n| n.instrument() != instrument);
        before - self.notes.len()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
