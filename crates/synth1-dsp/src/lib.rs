//! Synth1 DSP
//! ==========
//!
//! The synthesis side of the Synth1 plugin. The wrapper in `synth1-host`
//! only ever talks to the [`SynthesisHandle`] trait: it forwards note events,
//! control changes and asks for one sample at a time. [`Synth1`] is the
//! monophonic engine shipped with the plugin.

mod envelope;
mod handle;
mod notes;
mod oscillator;
mod synth;

pub use envelope::{Adsr, EnvelopeStage};
pub use handle::SynthesisHandle;
pub use notes::{NoteStack, MAX_HELD_NOTES};
pub use oscillator::{Lfo, PolyBlepSaw};
pub use synth::{
    Synth1, Synth1Patch, CC_DETUNE, CC_LFO_AMOUNT, CC_LFO_RATE, CC_VOLUME, DEFAULT_SAMPLE_RATE,
};

/// Converts a MIDI note number (A4 = 69) to a frequency in Hz.
#[inline]
pub fn note_to_hz(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_is_440() {
        assert!((note_to_hz(69.0) - 440.0).abs() < 1e-3);
        assert!((note_to_hz(81.0) - 880.0).abs() < 1e-2);
    }
}
