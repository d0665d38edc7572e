//! Shared helpers for the host smoke tests.

#![allow(dead_code)]

use synth1_dsp::Synth1;
use synth1_host::{
    AudioBuffer, BufferConfig, BusesLayout, LayoutError, MidiBuffer, MidiMessage, SynthProcessor,
    WrapperConfig,
};

pub const SAMPLE_RATE: f32 = 48_000.0;
pub const BLOCK: usize = 128;

/// A processor prepared the way a host would before playback starts.
pub fn prepared(
    config: WrapperConfig,
    layout: BusesLayout,
) -> Result<SynthProcessor<Synth1>, LayoutError> {
    let mut processor = SynthProcessor::new(Synth1::new(), config);
    processor.prepare(BufferConfig::new(SAMPLE_RATE, BLOCK, layout))?;
    Ok(processor)
}

pub fn note_on(note: u8, velocity: u8) -> MidiMessage {
    MidiMessage::NoteOn {
        channel: 1,
        note,
        velocity,
    }
}

pub fn note_off(note: u8) -> MidiMessage {
    MidiMessage::NoteOff {
        channel: 1,
        note,
        velocity: 0,
    }
}

/// Runs `blocks` blocks, sending `first` in the first one, and returns the
/// rendered first channel.
pub fn run(
    processor: &mut SynthProcessor<Synth1>,
    channels: usize,
    blocks: usize,
    first: &[MidiMessage],
) -> Vec<f32> {
    let mut audio = AudioBuffer::new(channels, BLOCK);
    let mut rendered = Vec::with_capacity(blocks * BLOCK);
    for block in 0..blocks {
        let midi: MidiBuffer = if block == 0 {
            first
                .iter()
                .map(|message| synth1_host::MidiEvent::new(0, *message))
                .collect()
        } else {
            MidiBuffer::new()
        };
        processor.process_block(&mut audio.slices_mut(), &midi);
        rendered.extend_from_slice(audio.channel(0).unwrap_or_default());
    }
    rendered
}

pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
}
