//! The note: one triggered instrument hit inside a pattern.
//!
//! A `Note` carries the instrument it plays (as an [`InstrumentId`]), where it
//! sits in the pattern, how it sounds (velocity, pan, pitch, key/octave) and the
//! per-voice runtime state the mixer drives once per sample: the envelope, the
//! resonant filter buffers and the fractional sample position.
//!
//! Setters never fail. Out-of-range values are clamped (velocity, pan,
//! lead/lag) or ignored (key, octave) so that parameter changes arriving
//! during playback always leave the note playable. The `try_set_*` variants
//! report the problem instead and leave the note untouched.

use alloc::string::String;
use core::fmt;

use crate::adsr::Adsr;
use crate::instrument::{Instrument, InstrumentId, MIDI_MIDDLE_C};
use crate::key::{
    format_key_octave, octave_in_range, parse_key_octave, Key, KEYS_PER_OCTAVE, OCTAVE_OFFSET,
};

/// Scale from normalized velocity to a 7-bit MIDI velocity.
pub const MIDI_FACTOR: f32 = 127.0;

pub const VELOCITY_MIN: f32 = 0.0;
pub const VELOCITY_MAX: f32 = 1.0;
pub const PAN_MIN: f32 = 0.0;
pub const PAN_MAX: f32 = 0.5;
pub const LEAD_LAG_MIN: f32 = -1.0;
pub const LEAD_LAG_MAX: f32 = 1.0;

/// A value rejected by one of the `try_set_*` setters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamError {
    Velocity(f32),
    Pan(f32),
    LeadLag(f32),
    Key(i32),
    Octave(i32),
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::Velocity(v) => {
                write!(f, "velocity {} outside {}..={}", v, VELOCITY_MIN, VELOCITY_MAX)
            }
            ParamError::Pan(v) => write!(f, "pan {} outside {}..={}", v, PAN_MIN, PAN_MAX),
            ParamError::LeadLag(v) => {
                write!(f, "lead/lag {} outside {}..={}", v, LEAD_LAG_MIN, LEAD_LAG_MAX)
            }
            ParamError::Key(k) => write!(f, "key index {} outside 0..=11", k),
            ParamError::Octave(o) => write!(f, "octave {} outside -3..=3", o),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParamError {}

fn check(value: f32, min: f32, max: f32) -> bool {
    (min..=max).contains(&value)
}

/// Clamp `value` into `min..=max`; NaN keeps `current`.
fn sanitize(current: f32, value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        current
    } else {
        value.clamp(min, max)
    }
}

/// One musical event in a pattern.
///
/// `Clone` duplicates every field including envelope progress; the clone
/// refers to the same instrument.
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    instrument: InstrumentId,
    position: u32,
    velocity: f32,
    pan_l: f32,
    pan_r: f32,
    /// Length in ticks, -1 plays the whole sample
    length: i32,
    pitch: f32,
    key: Key,
    octave: i32,
    adsr: Adsr,
    lead_lag: f32,
    cut_off: f32,
    resonance: f32,
    humanize_delay: i32,
    /// Fractional playback offset carried across process() blocks
    sample_position: f32,
    bpfb_l: f32,
    bpfb_r: f32,
    lpfb_l: f32,
    lpfb_r: f32,
    /// Slot of the owning pattern, for undo bookkeeping
    pattern_idx: i32,
    midi_msg: i32,
    note_off: bool,
    just_recorded: bool,
}

impl Note {
    /// Create a note for `instrument`. Velocity and pans pass through their
    /// clamping setters.
    pub fn new(
        instrument: &Instrument,
        position: u32,
        velocity: f32,
        pan_l: f32,
        pan_r: f32,
        length: i32,
        pitch: f32,
    ) -> Self {
        let mut note = Self {
            instrument: instrument.id,
            position,
            velocity: 0.0,
            pan_l: 0.0,
            pan_r: 0.0,
            length,
            pitch,
            key: Key::C,
            octave: 0,
            adsr: Adsr::default(),
            lead_lag: 0.0,
            cut_off: 1.0,
            resonance: 0.0,
            humanize_delay: 0,
            sample_position: 0.0,
            bpfb_l: 0.0,
            bpfb_r: 0.0,
            lpfb_l: 0.0,
            lpfb_r: 0.0,
            pattern_idx: 0,
            midi_msg: -1,
            note_off: false,
            just_recorded: false,
        };
        note.set_instrument(instrument);
        note.set_velocity(velocity);
        note.set_pan_l(pan_l);
        note.set_pan_r(pan_r);
        note
    }

    // --- Instrument ---

    /// Switch to another instrument, taking a fresh copy of its envelope and
    /// its filter coefficients.
    pub fn set_instrument(&mut self, instrument: &Instrument) {
        self.instrument = instrument.id;
        self.adsr = instrument.copy_adsr();
        self.cut_off = instrument.filter_cutoff();
        self.resonance = instrument.filter_resonance();
    }

    pub fn instrument(&self) -> InstrumentId {
        self.instrument
    }

    // --- Placement ---

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn set_position(&mut self, position: u32) {
        self.position = position;
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn set_length(&mut self, length: i32) {
        self.length = length;
    }

    pub fn lead_lag(&self) -> f32 {
        self.lead_lag
    }

    /// Clamped to -1.0..=1.0.
    pub fn set_lead_lag(&mut self, lead_lag: f32) {
        self.lead_lag = sanitize(self.lead_lag, lead_lag, LEAD_LAG_MIN, LEAD_LAG_MAX);
    }

    pub fn try_set_lead_lag(&mut self, lead_lag: f32) -> Result<(), ParamError> {
        if !check(lead_lag, LEAD_LAG_MIN, LEAD_LAG_MAX) {
            return Err(ParamError::LeadLag(lead_lag));
        }
        self.lead_lag = lead_lag;
        Ok(())
    }

    pub fn humanize_delay(&self) -> i32 {
        self.humanize_delay
    }

    pub fn set_humanize_delay(&mut self, delay: i32) {
        self.humanize_delay = delay;
    }

    pub fn pattern_idx(&self) -> i32 {
        self.pattern_idx
    }

    pub fn set_pattern_idx(&mut self, idx: i32) {
        self.pattern_idx = idx;
    }

    // --- Dynamics ---

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Clamped to 0.0..=1.0.
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = sanitize(self.velocity, velocity, VELOCITY_MIN, VELOCITY_MAX);
    }

    pub fn try_set_velocity(&mut self, velocity: f32) -> Result<(), ParamError> {
        if !check(velocity, VELOCITY_MIN, VELOCITY_MAX) {
            return Err(ParamError::Velocity(velocity));
        }
        self.velocity = velocity;
        Ok(())
    }

    pub fn pan_l(&self) -> f32 {
        self.pan_l
    }

    /// Clamped to 0.0..=0.5.
    pub fn set_pan_l(&mut self, pan: f32) {
        self.pan_l = sanitize(self.pan_l, pan, PAN_MIN, PAN_MAX);
    }

    pub fn try_set_pan_l(&mut self, pan: f32) -> Result<(), ParamError> {
        if !check(pan, PAN_MIN, PAN_MAX) {
            return Err(ParamError::Pan(pan));
        }
        self.pan_l = pan;
        Ok(())
    }

    pub fn pan_r(&self) -> f32 {
        self.pan_r
    }

    /// Clamped to 0.0..=0.5.
    pub fn set_pan_r(&mut self, pan: f32) {
        self.pan_r = sanitize(self.pan_r, pan, PAN_MIN, PAN_MAX);
    }

    pub fn try_set_pan_r(&mut self, pan: f32) -> Result<(), ParamError> {
        if !check(pan, PAN_MIN, PAN_MAX) {
            return Err(ParamError::Pan(pan));
        }
        self.pan_r = pan;
        Ok(())
    }

    pub fn note_off(&self) -> bool {
        self.note_off
    }

    pub fn set_note_off(&mut self, note_off: bool) {
        self.note_off = note_off;
    }

    pub fn just_recorded(&self) -> bool {
        self.just_recorded
    }

    pub fn set_just_recorded(&mut self, just_recorded: bool) {
        self.just_recorded = just_recorded;
    }

    // --- Pitch ---

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    /// Set key and octave independently: an out-of-range key leaves the key
    /// unchanged, an out-of-range octave leaves the octave unchanged.
    pub fn set_key_octave(&mut self, key: i32, octave: i32) {
        if let Some(key) = Key::from_index(key) {
            self.key = key;
        }
        if octave_in_range(octave) {
            self.octave = octave;
        }
    }

    /// All-or-nothing variant of [`Note::set_key_octave`].
    pub fn try_set_key_octave(&mut self, key: i32, octave: i32) -> Result<(), ParamError> {
        let k = Key::from_index(key).ok_or(ParamError::Key(key))?;
        if !octave_in_range(octave) {
            return Err(ParamError::Octave(octave));
        }
        self.key = k;
        self.octave = octave;
        Ok(())
    }

    /// Set key and octave from their saved spelling (`C0`, `Fs-2`).
    /// Unparsable input leaves both untouched.
    pub fn set_key_octave_str(&mut self, s: &str) {
        match parse_key_octave(s) {
            Some((key, octave)) => self.set_key_octave(key.index(), octave),
            None => log::warn!("unhandled key: {:?}", s),
        }
    }

    /// Key and octave plus the MIDI message that produced them.
    pub fn set_midi_info(&mut self, key: i32, octave: i32, msg: i32) {
        self.set_key_octave(key, octave);
        self.midi_msg = msg;
    }

    pub fn midi_msg(&self) -> i32 {
        self.midi_msg
    }

    /// Spelling of key and octave, e.g. `Ef-1`.
    pub fn key_to_string(&self) -> String {
        format_key_octave(self.key, self.octave)
    }

    /// MIDI note number to send for this note.
    pub fn midi_key(&self, instrument: &Instrument) -> i32 {
        let key_index = (self.octave + OCTAVE_OFFSET) * KEYS_PER_OCTAVE + self.key.index();
        key_index + instrument.midi_out_note() - MIDI_MIDDLE_C
    }

    /// Velocity scaled to 0..=127, truncating.
    pub fn midi_velocity(&self) -> i32 {
        (self.velocity * MIDI_FACTOR) as i32
    }

    /// `octave * 12 + key`.
    pub fn notekey_pitch(&self) -> f32 {
        (self.octave * KEYS_PER_OCTAVE + self.key.index()) as f32
    }

    /// `octave * 12 + key + pitch`.
    pub fn total_pitch(&self) -> f32 {
        self.notekey_pitch() + self.pitch
    }

    /// Whether this note is `instrument` playing `key` in `octave`.
    pub fn matches(&self, instrument: InstrumentId, key: Key, octave: i32) -> bool {
        self.instrument == instrument && self.key == key && self.octave == octave
    }

    // --- Runtime state ---

    pub fn cut_off(&self) -> f32 {
        self.cut_off
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn bpfb_l(&self) -> f32 {
        self.bpfb_l
    }

    pub fn bpfb_r(&self) -> f32 {
        self.bpfb_r
    }

    pub fn lpfb_l(&self) -> f32 {
        self.lpfb_l
    }

    pub fn lpfb_r(&self) -> f32 {
        self.lpfb_r
    }

    pub fn sample_position(&self) -> f32 {
        self.sample_position
    }

    /// Advance the fractional sample position and return the new value.
    pub fn update_sample_position(&mut self, incr: f32) -> f32 {
        self.sample_position += incr;
        self.sample_position
    }

    pub fn adsr(&self) -> &Adsr {
        &self.adsr
    }

    /// Put the envelope into its release stage.
    pub fn release_adsr(&mut self) -> f32 {
        self.adsr.release()
    }

    /// Envelope multiplier for the current sample, advancing by `step`.
    pub fn adsr_value(&mut self, step: f32) -> f32 {
        self.adsr.get_value(step)
    }

    /// Run one stereo sample through the note's resonant low-pass filter,
    /// using the instrument's current coefficients.
    ///
    /// The band-pass stage reads the previous low-pass output before the
    /// low-pass stage is updated.
    #[inline]
    pub fn compute_lr_values(&mut self, instrument: &Instrument, val_l: &mut f32, val_r: &mut f32) {
        let cut_off = instrument.filter_cutoff();
        let resonance = instrument.filter_resonance();
        self.bpfb_l = resonance * self.bpfb_l + cut_off * (*val_l - self.lpfb_l);
        self.lpfb_l += cut_off * self.bpfb_l;
        self.bpfb_r = resonance * self.bpfb_r + cut_off * (*val_r - self.lpfb_r);
        self.lpfb_r += cut_off * self.bpfb_r;
        *val_l = self.lpfb_l;
        *val_r = self.lpfb_r;
    }

    /// Log every field at debug level.
    pub fn dump(&self) {
        log::debug!(
            "Note: instrument={} pos={} length={} velocity={} pan_l={} pan_r={} \
             pitch={} key={} lead_lag={} note_off={} just_recorded={} \
             pattern_idx={} midi_msg={} humanize={} sample_pos={} adsr={:?}",
            self.instrument,
            self.position,
            self.length,
            self.velocity,
            self.pan_l,
            self.pan_r,
            self.pitch,
            self.key_to_string(),
            self.lead_lag,
            self.note_off,
            self.just_recorded,
            self.pattern_idx,
            self.midi_msg,
            self.humanize_delay,
            self.sample_position,
            self.adsr.state(),
        );
    }
}
