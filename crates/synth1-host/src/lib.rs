//! Synth1 Host
//! ===========
//!
//! Host-facing wrapper around a [`SynthesisHandle`](synth1_dsp::SynthesisHandle).
//! This crate holds everything a plugin format adapter needs that is not
//! specific to one plugin API: the four-knob parameter layout and its
//! control-change marshaling, MIDI parsing and dispatch, bus layout
//! negotiation and the block processor itself.

pub mod buffer;
pub mod config;
mod descriptor;
mod error;
pub mod layout;
pub mod midi;
pub mod parameters;
mod processor;

pub use buffer::{AudioBuffer, MAX_CHANNELS};
pub use config::WrapperConfig;
pub use descriptor::{PluginDescriptor, DESCRIPTOR};
pub use error::{ConfigError, LayoutError, ParameterError};
pub use layout::{BusesLayout, ChannelSet, PluginKind};
pub use midi::{DispatchOutcome, MidiBuffer, MidiEvent, MidiMessage};
pub use parameters::{
    synth1_layout, ParameterDefinition, ParameterId, ParameterLayout, ParameterSet,
    ParameterTracker,
};
pub use processor::{BufferConfig, SynthProcessor};

/// Common imports for format adapters and offline hosts.
pub mod prelude {
    pub use crate::{
        AudioBuffer, BufferConfig, BusesLayout, ChannelSet, MidiBuffer, MidiEvent, MidiMessage,
        ParameterId, ParameterSet, PluginKind, SynthProcessor, WrapperConfig,
    };
    pub use synth1_dsp::{Synth1, SynthesisHandle};
}
