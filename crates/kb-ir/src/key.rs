//! Semitone keys and their `key+octave` spelling (`C0`, `Fs-2`, `B3`).

use alloc::format;
use alloc::string::String;

/// Lowest key index (C).
pub const KEY_MIN: i32 = 0;
/// Highest key index (B).
pub const KEY_MAX: i32 = 11;
/// Lowest octave a note may sit in.
pub const OCTAVE_MIN: i32 = -3;
/// Highest octave a note may sit in.
pub const OCTAVE_MAX: i32 = 3;
/// Shift that makes `OCTAVE_MIN` the zeroth octave.
pub const OCTAVE_OFFSET: i32 = 3;
pub const KEYS_PER_OCTAVE: i32 = 12;

/// One of the twelve semitones within an octave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Key {
    #[default]
    C = 0,
    Cs,
    D,
    Ef,
    E,
    F,
    Fs,
    G,
    Af,
    A,
    Bf,
    B,
}

const ALL_KEYS: [Key; 12] = [
    Key::C,
    Key::Cs,
    Key::D,
    Key::Ef,
    Key::E,
    Key::F,
    Key::Fs,
    Key::G,
    Key::Af,
    Key::A,
    Key::Bf,
    Key::B,
];

impl Key {
    /// Look up a key by semitone index (0 = C .. 11 = B).
    pub fn from_index(index: i32) -> Option<Key> {
        if (KEY_MIN..=KEY_MAX).contains(&index) {
            Some(ALL_KEYS[index as usize])
        } else {
            None
        }
    }

    pub const fn index(self) -> i32 {
        self as i32
    }

    /// Spelling used in saved patterns.
    pub const fn name(self) -> &'static str {
        match self {
            Key::C => "C",
            Key::Cs => "Cs",
            Key::D => "D",
            Key::Ef => "Ef",
            Key::E => "E",
            Key::F => "F",
            Key::Fs => "Fs",
            Key::G => "G",
            Key::Af => "Af",
            Key::A => "A",
            Key::Bf => "Bf",
            Key::B => "B",
        }
    }

    fn from_name(name: &str) -> Option<Key> {
        ALL_KEYS.iter().copied().find(|k| k.name() == name)
    }
}

/// Whether `octave` lies within `OCTAVE_MIN..=OCTAVE_MAX`.
pub fn octave_in_range(octave: i32) -> bool {
    (OCTAVE_MIN..=OCTAVE_MAX).contains(&octave)
}

/// Spell a key and octave, e.g. `Fs-2`.
pub fn format_key_octave(key: Key, octave: i32) -> String {
    format!("{}{}", key.name(), octave)
}

/// Parse the output of [`format_key_octave`].
///
/// The octave is not range-checked here; callers decide what to do with it.
pub fn parse_key_octave(s: &str) -> Option<(Key, i32)> {
    let s = s.trim();
    let split = s.find(|c: char| c == '-' || c.is_ascii_digit())?;
    let (name, octave) = s.split_at(split);
    let key = Key::from_name(name)?;
    let octave = octave.parse::<i32>().ok()?;
    Some((key, octave))
}
