#![no_main]

use libfuzzer_sys::fuzz_target;
use synth1_dsp::Synth1;
use synth1_host::{AudioBuffer, MidiBuffer, MidiEvent, MidiMessage, SynthProcessor, WrapperConfig};

// Arbitrary MIDI bytes must never make the block path panic or emit
// non-finite samples.
fuzz_target!(|data: &[u8]| {
    let config = WrapperConfig {
        forward_midi_cc: data.first().is_some_and(|b| b & 1 == 1),
        log_note_events: false,
        ..WrapperConfig::default()
    };
    let mut processor = SynthProcessor::new(Synth1::new(), config);
    let mut audio = AudioBuffer::new(2, 32);

    for chunk in data.chunks(12) {
        let midi: MidiBuffer = chunk
            .chunks_exact(4)
            .map(|bytes| {
                let message = MidiMessage::from_bytes([bytes[1], bytes[2], bytes[3]]);
                MidiEvent::new(u32::from(bytes[0] % 32), message)
            })
            .collect();
        processor.process_block(&mut audio.slices_mut(), &midi);
        for channel in 0..audio.num_channels() {
            let samples = audio.channel(channel).unwrap_or_default();
            assert!(samples.iter().all(|s| s.is_finite()));
        }
    }
});
