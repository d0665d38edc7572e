#![no_main]

use libfuzzer_sys::fuzz_target;
use synth1_dsp::Synth1;
use synth1_host::{AudioBuffer, MidiBuffer, MidiMessage, SynthProcessor, WrapperConfig};

// Knob writes from arbitrary floats are either rejected or keep the output
// finite.
fuzz_target!(|data: &[u8]| {
    let mut processor = SynthProcessor::new(Synth1::new(), WrapperConfig::default());
    let mut audio = AudioBuffer::new(1, 16);
    let mut midi = MidiBuffer::new();
    midi.add(
        0,
        MidiMessage::NoteOn {
            channel: 1,
            note: 69,
            velocity: 127,
        },
    );
    processor.process_block(&mut audio.slices_mut(), &midi);

    let empty = MidiBuffer::new();
    for chunk in data.chunks_exact(5) {
        let index = usize::from(chunk[0] % 5);
        let value = f32::from_le_bytes([chunk[1], chunk[2], chunk[3], chunk[4]]);
        let _ = processor.parameters().set_at(index, value);
        processor.process_block(&mut audio.slices_mut(), &empty);
        let samples = audio.channel(0).unwrap_or_default();
        assert!(samples.iter().all(|s| s.is_finite()));
    }
});
