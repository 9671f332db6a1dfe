use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kb_ir::{Adsr, Instrument, Note};

const BLOCK: usize = 512;

fn filtered_voice(c: &mut Criterion) {
    let mut inst = Instrument::new(0, "Kick");
    inst.set_filter_cutoff(0.3);
    inst.set_filter_resonance(0.6);
    inst.adsr = Adsr::new(64.0, 2000.0, 0.4, 4000.0);

    c.bench_function("note_block_512", |b| {
        let mut note = Note::new(&inst, 0, 0.8, 0.5, 0.5, -1, 0.0);
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..BLOCK {
                let gain = note.adsr_value(1.0);
                let mut l = black_box((i as f32 * 0.01).sin()) * gain;
                let mut r = l;
                note.compute_lr_values(&inst, &mut l, &mut r);
                note.update_sample_position(1.0);
                acc += l + r;
            }
            black_box(acc)
        });
    });
}

criterion_group!(benches, filtered_voice);
criterion_main!(benches);
