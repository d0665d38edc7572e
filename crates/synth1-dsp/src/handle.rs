/// Synthesis object driven by the plugin wrapper.
///
/// The method set mirrors the entry points exposed by the engine: note
/// events, MIDI-style control changes and a per-sample `process` call. The
/// wrapper holds exactly one handle and calls it from the audio thread only.
pub trait SynthesisHandle: Send {
    /// Loads the engine's default patch. Called once when the wrapper is
    /// constructed, after the handle's own zeroed initialisation.
    fn load_defaults(&mut self);

    /// Informs the engine about the host sample rate.
    fn set_sample_rate(&mut self, sample_rate: f32);

    fn note_on(&mut self, note: u8, velocity: u8, channel: u8);

    fn note_off(&mut self, note: u8, channel: u8);

    /// `value` is on the MIDI scale `0.0..=127.0` but is not quantised.
    fn control_change(&mut self, control: u8, value: f32, channel: u8);

    /// Renders one sample. `input` is the host input sample for the channel
    /// currently being rendered; instruments are free to ignore it.
    fn process(&mut self, input: f32) -> f32;
}

impl<H: SynthesisHandle + ?Sized> SynthesisHandle for Box<H> {
    fn load_defaults(&mut self) {
        (**self).load_defaults()
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        (**self).set_sample_rate(sample_rate)
    }

    fn note_on(&mut self, note: u8, velocity: u8, channel: u8) {
        (**self).note_on(note, velocity, channel)
    }

    fn note_off(&mut self, note: u8, channel: u8) {
        (**self).note_off(note, channel)
    }

    fn control_change(&mut self, control: u8, value: f32, channel: u8) {
        (**self).control_change(control, value, channel)
    }

    fn process(&mut self, input: f32) -> f32 {
        (**self).process(input)
    }
}
