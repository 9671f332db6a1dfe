//! Allocation-free note processing tests.
//!
//! The per-sample note path (envelope, filter, sample position) runs inside
//! the audio callback and must never touch the heap.
//!
//! Just run `cargo test`, no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use kb_ir::{Adsr, Instrument, Note};

/// Run `frames` samples of a note through envelope and filter, aborting on
/// any heap allocation.
fn assert_note_alloc_free(instrument: &Instrument, note: &mut Note, frames: usize) {
    assert_no_alloc(|| {
        for i in 0..frames {
            if i == frames / 2 {
                note.release_adsr();
            }
            let gain = note.adsr_value(1.0);
            let input = if i % 64 < 32 { gain } else { -gain };
            let (mut l, mut r) = (input * note.pan_l(), input * note.pan_r());
            note.compute_lr_values(instrument, &mut l, &mut r);
            note.update_sample_position(1.0);
        }
    });
}

#[test]
fn resonant_kick_alloc_free() {
    let mut kick = Instrument::new(0, "Kick");
    kick.set_filter_cutoff(0.2);
    kick.set_filter_resonance(0.8);
    kick.adsr = Adsr::new(32.0, 4000.0, 0.5, 8000.0);
    let mut note = Note::new(&kick, 0, 1.0, 0.5, 0.5, -1, 0.0);
    assert_note_alloc_free(&kick, &mut note, 44100 * 2);
    assert_eq!(note.sample_position(), (44100 * 2) as f32);
}

#[test]
fn open_filter_hat_alloc_free() {
    let hat = Instrument::new(2, "Hat");
    let mut note = Note::new(&hat, 0, 0.6, 0.3, 0.5, -1, 0.0);
    assert_note_alloc_free(&hat, &mut note, 44100);
    assert!(note.lpfb_l().is_finite());
}

#[test]
fn parameter_edits_alloc_free() {
    let hat = Instrument::new(2, "Hat");
    let mut note = Note::new(&hat, 0, 0.6, 0.3, 0.5, -1, 0.0);
    assert_no_alloc(|| {
        for i in 0..1000 {
            let x = i as f32 / 100.0 - 5.0;
            note.set_velocity(x);
            note.set_pan_l(x);
            note.set_pan_r(-x);
            note.set_lead_lag(x);
            note.set_key_octave(i % 16 - 2, i % 9 - 4);
        }
    });
    assert!((0.0..=1.0).contains(&note.velocity()));
}
