use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use synth1_dsp::Synth1;
use synth1_host::{
    AudioBuffer, BufferConfig, BusesLayout, MidiBuffer, MidiMessage, ParameterId, SynthProcessor,
    WrapperConfig,
};

fn processor(block: usize) -> SynthProcessor<Synth1> {
    let config = WrapperConfig {
        log_note_events: false,
        ..WrapperConfig::default()
    };
    let mut processor = SynthProcessor::new(Synth1::new(), config);
    processor
        .prepare(BufferConfig::new(96_000.0, block, BusesLayout::synth_stereo()))
        .expect("prepare");
    processor
}

fn held_note(c: &mut Criterion) {
    let mut group = c.benchmark_group("processor");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("held_note_96k_block64", |b| {
        let mut processor = processor(64);
        let mut audio = AudioBuffer::new(2, 64);
        let mut midi = MidiBuffer::new();
        midi.add(
            0,
            MidiMessage::NoteOn {
                channel: 1,
                note: 60,
                velocity: 100,
            },
        );
        processor.process_block(&mut audio.slices_mut(), &midi);
        let empty = MidiBuffer::new();

        b.iter(|| {
            processor.process_block(&mut audio.slices_mut(), &empty);
        });
    });

    group.bench_function("automated_knobs_96k_block64", |b| {
        let mut processor = processor(64);
        let mut audio = AudioBuffer::new(2, 64);
        let detune = ParameterId::from("detune");
        let mut step = 0u32;
        let empty = MidiBuffer::new();

        b.iter(|| {
            step = step.wrapping_add(1);
            let value = (step % 100) as f32 / 100.0;
            processor
                .parameters()
                .set(&detune, value)
                .expect("valid knob");
            processor.process_block(&mut audio.slices_mut(), &empty);
        });
    });

    group.finish();
}

criterion_group!(benches, held_note);
criterion_main!(benches);
