//! Synth1 as a CLAP/VST3 plugin.
//! - Four host knobs: Volume, Detune, LFO Rate, LFO Amount
//! - Knob moves reach the synth as control changes 30..=33
//! - Monophonic, mono or stereo output, no editor
//!
//! **RT Safety:** the block path reuses a preallocated MIDI buffer; nothing
//! allocates in process() unless a host sends more events than it holds.

use std::num::NonZeroU32;
use std::sync::Arc;

use nih_plug::prelude::*;
use synth1_dsp::Synth1;
use synth1_host::{
    config, BufferConfig as HostBufferConfig, BusesLayout, ChannelSet, MidiBuffer, ParameterSet,
    SynthProcessor,
};

mod events;

pub use events::to_midi_event;

const MIDI_EVENT_CAPACITY: usize = 512;

#[derive(Params)]
pub struct Synth1Params {
    #[id = "volume"]
    pub volume: FloatParam,

    #[id = "detune"]
    pub detune: FloatParam,

    #[id = "lfo_rate"]
    pub lfo_rate: FloatParam,

    #[id = "lfo_amount"]
    pub lfo_amount: FloatParam,
}

fn knob(name: &str, default: f32) -> FloatParam {
    FloatParam::new(name, default, FloatRange::Linear { min: 0.0, max: 1.0 })
        .with_unit(" %")
        .with_value_to_string(formatters::v2s_f32_percentage(0))
        .with_string_to_value(formatters::s2v_f32_percentage())
}

impl Default for Synth1Params {
    fn default() -> Self {
        Self {
            volume: knob("Volume", 0.9),
            detune: knob("Detune", 0.0),
            lfo_rate: knob("LFO Rate", 0.0),
            lfo_amount: knob("LFO Amount", 0.0),
        }
    }
}

impl Synth1Params {
    /// Knob values in the order of [`synth1_host::synth1_layout`].
    pub fn values(&self) -> [f32; 4] {
        [
            self.volume.value(),
            self.detune.value(),
            self.lfo_rate.value(),
            self.lfo_amount.value(),
        ]
    }
}

pub struct Synth1Plugin {
    params: Arc<Synth1Params>,
    knobs: Arc<ParameterSet>,
    processor: SynthProcessor<Synth1>,
    midi: MidiBuffer,
}

impl Default for Synth1Plugin {
    fn default() -> Self {
        let knobs = Arc::new(ParameterSet::default());
        let processor =
            SynthProcessor::with_parameters(Synth1::new(), Arc::clone(&knobs), config::load());
        Self {
            params: Arc::new(Synth1Params::default()),
            knobs,
            processor,
            midi: MidiBuffer::with_capacity(MIDI_EVENT_CAPACITY),
        }
    }
}

impl Synth1Plugin {
    fn copy_knobs(&self) {
        for (index, value) in self.params.values().into_iter().enumerate() {
            let stored = self.knobs.set_at(index, value);
            nih_debug_assert!(stored.is_ok(), "knob {} rejected value {}", index, value);
        }
    }
}

impl Plugin for Synth1Plugin {
    const NAME: &'static str = "Synth1";
    const VENDOR: &'static str = "Synth1";
    const URL: &'static str = "";
    const EMAIL: &'static str = "";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: None,
            main_output_channels: NonZeroU32::new(2),
            ..AudioIOLayout::const_default()
        },
        AudioIOLayout {
            main_input_channels: None,
            main_output_channels: NonZeroU32::new(1),
            ..AudioIOLayout::const_default()
        },
    ];

    // MIDI CCs are only forwarded when the wrapper config asks for it.
    const MIDI_INPUT: MidiConfig = MidiConfig::MidiCCs;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let channels = audio_io_layout
            .main_output_channels
            .map(NonZeroU32::get)
            .unwrap_or(0) as usize;
        let layout = BusesLayout::new(ChannelSet::Disabled, ChannelSet::from_channels(channels));
        let config = HostBufferConfig::new(
            buffer_config.sample_rate,
            buffer_config.max_buffer_size as usize,
            layout,
        );
        match self.processor.prepare(config) {
            Ok(()) => true,
            Err(err) => {
                nih_log!("rejecting audio layout: {}", err);
                false
            }
        }
    }

    fn reset(&mut self) {
        self.processor.reset_tracker();
    }

    fn deactivate(&mut self) {
        self.processor.release();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        self.midi.clear();
        while let Some(event) = context.next_event() {
            if let Some(event) = to_midi_event(&event) {
                self.midi.push(event);
            }
        }

        self.copy_knobs();
        self.processor.process_block(buffer.as_slice(), &self.midi);

        ProcessStatus::Normal
    }
}

impl ClapPlugin for Synth1Plugin {
    const CLAP_ID: &'static str = "dev.synth1.synth1";
    const CLAP_DESCRIPTION: Option<&'static str> = Some("Monophonic two-oscillator synthesizer");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::Instrument,
        ClapFeature::Synthesizer,
        ClapFeature::Mono,
        ClapFeature::Stereo,
    ];
}

impl Vst3Plugin for Synth1Plugin {
    const VST3_CLASS_ID: [u8; 16] = *b"Synth1MonoSynth1";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] = &[
        Vst3SubCategory::Instrument,
        Vst3SubCategory::Synth,
        Vst3SubCategory::Mono,
        Vst3SubCategory::Stereo,
    ];
}

nih_export_clap!(Synth1Plugin);
nih_export_vst3!(Synth1Plugin);
