use std::sync::Arc;

use serde::{Deserialize, Serialize};
use synth1_dsp::SynthesisHandle;
use tracing::info;

use crate::layout::{check_layout, BusesLayout, PluginKind};
use crate::midi::{dispatch, MidiBuffer};
use crate::{
    LayoutError, ParameterSet, ParameterTracker, PluginDescriptor, WrapperConfig, DESCRIPTOR,
};

/// Host settings handed over when playback is prepared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferConfig {
    pub sample_rate: f32,
    pub max_block_size: usize,
    pub layout: BusesLayout,
}

impl BufferConfig {
    pub fn new(sample_rate: f32, max_block_size: usize, layout: BusesLayout) -> Self {
        Self {
            sample_rate,
            max_block_size,
            layout,
        }
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new(44_100.0, 512, BusesLayout::synth_stereo())
    }
}

/// The audio callback of the plugin.
///
/// Owns the synthesis handle, reads the shared knob values once per block
/// and renders into host-provided channel slices in place. Channels below
/// the main input's channel count carry input samples on entry.
pub struct SynthProcessor<H> {
    handle: H,
    parameters: Arc<ParameterSet>,
    tracker: ParameterTracker,
    config: WrapperConfig,
    buffer_config: BufferConfig,
}

impl<H: SynthesisHandle> SynthProcessor<H> {
    /// Loads the handle's default patch and registers the four knobs.
    pub fn new(handle: H, config: WrapperConfig) -> Self {
        Self::with_parameters(handle, Arc::new(ParameterSet::default()), config)
    }

    /// Like [`new`](Self::new) with knob storage shared with a control thread.
    pub fn with_parameters(
        mut handle: H,
        parameters: Arc<ParameterSet>,
        config: WrapperConfig,
    ) -> Self {
        let buffer_config = BufferConfig::default();
        handle.set_sample_rate(buffer_config.sample_rate);
        handle.load_defaults();
        let tracker = ParameterTracker::new(parameters.layout());
        Self {
            handle,
            parameters,
            tracker,
            config,
            buffer_config,
        }
    }

    pub fn descriptor(&self) -> &'static PluginDescriptor {
        &DESCRIPTOR
    }

    pub fn parameters(&self) -> &Arc<ParameterSet> {
        &self.parameters
    }

    pub fn config(&self) -> &WrapperConfig {
        &self.config
    }

    pub fn buffer_config(&self) -> &BufferConfig {
        &self.buffer_config
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    pub fn into_handle(self) -> H {
        self.handle
    }

    pub fn supports_layout(&self, layout: &BusesLayout) -> bool {
        check_layout(layout, self.descriptor().kind).is_ok()
    }

    /// Validates the layout and forwards the sample rate. Every knob is
    /// re-sent to the handle on the next block.
    pub fn prepare(&mut self, buffer_config: BufferConfig) -> Result<(), LayoutError> {
        check_layout(&buffer_config.layout, self.descriptor().kind)?;
        info!(
            sample_rate = buffer_config.sample_rate,
            max_block_size = buffer_config.max_block_size,
            output = %buffer_config.layout.main_output,
            "preparing synth processor"
        );
        self.handle.set_sample_rate(buffer_config.sample_rate);
        self.reset_tracker();
        self.buffer_config = buffer_config;
        Ok(())
    }

    /// Forgets which knob values the handle has seen, so the next block
    /// sends all of them again.
    pub fn reset_tracker(&mut self) {
        self.tracker.reset();
    }

    /// Playback stopped. Nothing is held that needs freeing.
    pub fn release(&mut self) {
        info!("releasing synth processor");
    }

    /// Renders one block.
    ///
    /// MIDI is dispatched first and passed through untouched. Knob changes
    /// are then forwarded unless MIDI control changes drive the synth
    /// directly. Output channels without a matching input are cleared and
    /// every frame is rendered with one `process` call whose result is
    /// written to all output channels.
    pub fn process_block(&mut self, buffer: &mut [&mut [f32]], midi: &MidiBuffer) {
        self.dispatch_midi(midi);

        if !self.config.forward_midi_cc {
            self.tracker
                .sync(&self.parameters, &mut self.handle, self.config.control_scale);
        }

        let inputs = self.input_channels().min(buffer.len());
        for channel in buffer.iter_mut().skip(inputs) {
            channel.fill(0.0);
        }

        let frames = buffer.iter().map(|channel| channel.len()).min().unwrap_or(0);
        let input_gain = if inputs > 0 { 1.0 / inputs as f32 } else { 0.0 };
        for frame in 0..frames {
            let input = buffer[..inputs]
                .iter()
                .map(|channel| channel[frame])
                .sum::<f32>()
                * input_gain;
            let sample = self.handle.process(input);
            for channel in buffer.iter_mut() {
                channel[frame] = sample;
            }
        }
    }

    /// Bypassed block: audio is left as the host passed it, MIDI still
    /// passes through and the synth does not advance.
    pub fn process_block_bypassed(&mut self, _buffer: &mut [&mut [f32]], _midi: &MidiBuffer) {}

    fn dispatch_midi(&mut self, midi: &MidiBuffer) {
        let forward = self.config.forward_midi_cc;
        let log_notes = self.config.log_note_events;
        for event in midi.iter() {
            dispatch(&mut self.handle, &event.message, forward, log_notes);
        }
    }

    fn input_channels(&self) -> usize {
        match self.descriptor().kind {
            PluginKind::Synth => 0,
            PluginKind::Effect | PluginKind::MidiEffect => {
                self.buffer_config.layout.main_input.channels()
            }
        }
    }

    pub fn num_programs(&self) -> usize {
        self.descriptor().num_programs
    }

    pub fn current_program(&self) -> usize {
        0
    }

    /// Only one program exists; selecting is a no-op.
    pub fn set_current_program(&mut self, _index: usize) {}

    pub fn program_name(&self, _index: usize) -> &str {
        ""
    }

    pub fn change_program_name(&mut self, _index: usize, _name: &str) {}
}
