//! Attack/decay/sustain/release envelope generator.
//!
//! Each sounding note owns one `Adsr` by value, so envelope progress is never
//! shared between voices. Times are expressed in samples and advanced by the
//! caller through [`Adsr::get_value`].

use crate::curve::{interpolate, CurveKind};

/// Shortest release the generator will honour, in samples. Anything shorter
/// clicks audibly.
pub const MIN_RELEASE: f32 = 256.0;

const ATTACK_CURVE: CurveKind = CurveKind::Linear;
const FALL_CURVE: CurveKind = CurveKind::Exponential(-4.0);

/// Envelope stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdsrState {
    /// Rising from silence to full level.
    #[default]
    Attack,
    /// Falling from full level to the sustain level.
    Decay,
    /// Holding the sustain level until released.
    Sustain,
    /// Falling from the release-start level to silence.
    Release,
    /// Finished; output is silent.
    Idle,
}

/// An ADSR envelope with its runtime progress.
#[derive(Clone, Debug, PartialEq)]
pub struct Adsr {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
    state: AdsrState,
    /// Samples elapsed within the current stage.
    ticks: f32,
    value: f32,
    release_value: f32,
}

impl Default for Adsr {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1000.0)
    }
}

impl Adsr {
    /// Create an envelope. Negative times are treated as zero and the sustain
    /// level is kept within 0.0..=1.0.
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack: attack.max(0.0),
            decay: decay.max(0.0),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(0.0),
            state: AdsrState::Attack,
            ticks: 0.0,
            value: 0.0,
            release_value: 0.0,
        }
    }

    pub fn attack(&self) -> f32 {
        self.attack
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    pub fn release_time(&self) -> f32 {
        self.release
    }

    pub fn state(&self) -> AdsrState {
        self.state
    }

    /// Last value produced by [`Adsr::get_value`].
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Return the amplitude multiplier for the current position, then advance
    /// the envelope by `step` samples.
    pub fn get_value(&mut self, step: f32) -> f32 {
        match self.state {
            AdsrState::Attack => {
                self.value = if self.attack == 0.0 {
                    1.0
                } else {
                    interpolate(ATTACK_CURVE, 0.0, 1.0, self.ticks / self.attack)
                };
                self.advance(step, self.attack, AdsrState::Decay);
            }
            AdsrState::Decay => {
                self.value = if self.decay == 0.0 {
                    self.sustain
                } else {
                    interpolate(FALL_CURVE, 1.0, self.sustain, self.ticks / self.decay)
                };
                self.advance(step, self.decay, AdsrState::Sustain);
            }
            AdsrState::Sustain => {
                self.value = self.sustain;
            }
            AdsrState::Release => {
                let length = self.release.max(MIN_RELEASE);
                self.value = interpolate(FALL_CURVE, self.release_value, 0.0, self.ticks / length);
                self.advance(step, length, AdsrState::Idle);
            }
            AdsrState::Idle => {
                self.value = 0.0;
            }
        }
        self.value
    }

    /// Enter the release stage from wherever the envelope currently is.
    ///
    /// Returns the level the release starts from: 0.0 when already idle, the
    /// current value when a release is already in progress.
    pub fn release(&mut self) -> f32 {
        match self.state {
            AdsrState::Idle => 0.0,
            AdsrState::Release => self.value,
            _ => {
                self.release_value = self.value;
                self.state = AdsrState::Release;
                self.ticks = 0.0;
                self.release_value
            }
        }
    }

    fn advance(&mut self, step: f32, length: f32, next: AdsrState) {
        self.ticks += step;
        if self.ticks > length {
            self.state = next;
            self.ticks = 0.0;
        }
    }
}
