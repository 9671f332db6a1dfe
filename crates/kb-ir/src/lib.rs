//! Core types for the kitbeat drum machine.
//!
//! This crate defines the notes, instruments and envelopes shared by the
//! persistence layer and the audio side. Everything here is a plain value:
//! instruments are referenced by [`InstrumentId`], never owned by a note.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod adsr;
mod curve;
mod instrument;
mod key;
mod note;
mod pattern;

pub use adsr::{Adsr, AdsrState, MIN_RELEASE};
pub use curve::{interpolate, CurveKind};
pub use instrument::{Instrument, InstrumentId, InstrumentList, MIDI_MIDDLE_C};
pub use key::{
    format_key_octave, octave_in_range, parse_key_octave, Key, KEYS_PER_OCTAVE, KEY_MAX, KEY_MIN,
    OCTAVE_MAX, OCTAVE_MIN, OCTAVE_OFFSET,
};
pub use note::{
    Note, ParamError, LEAD_LAG_MAX, LEAD_LAG_MIN, MIDI_FACTOR, PAN_MAX, PAN_MIN, VELOCITY_MAX,
    VELOCITY_MIN,
};
pub use pattern::{Pattern, DEFAULT_PATTERN_SIZE};
