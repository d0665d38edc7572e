use std::fmt;

use serde::{Deserialize, Serialize};

use crate::LayoutError;

/// Channel configuration of one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelSet {
    Disabled,
    Mono,
    Stereo,
    Discrete(u8),
}

impl ChannelSet {
    pub fn channels(&self) -> usize {
        match self {
            ChannelSet::Disabled => 0,
            ChannelSet::Mono => 1,
            ChannelSet::Stereo => 2,
            ChannelSet::Discrete(channels) => *channels as usize,
        }
    }

    pub fn from_channels(channels: usize) -> Self {
        match channels {
            0 => ChannelSet::Disabled,
            1 => ChannelSet::Mono,
            2 => ChannelSet::Stereo,
            other => ChannelSet::Discrete(other.min(u8::MAX as usize) as u8),
        }
    }
}

impl fmt::Display for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelSet::Disabled => f.write_str("disabled"),
            ChannelSet::Mono => f.write_str("mono"),
            ChannelSet::Stereo => f.write_str("stereo"),
            ChannelSet::Discrete(channels) => write!(f, "{channels} discrete channels"),
        }
    }
}

/// Main input and output buses proposed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusesLayout {
    pub main_input: ChannelSet,
    pub main_output: ChannelSet,
}

impl BusesLayout {
    pub fn new(main_input: ChannelSet, main_output: ChannelSet) -> Self {
        Self {
            main_input,
            main_output,
        }
    }

    /// Instrument layout: no input, stereo output.
    pub fn synth_stereo() -> Self {
        Self::new(ChannelSet::Disabled, ChannelSet::Stereo)
    }

    pub fn synth_mono() -> Self {
        Self::new(ChannelSet::Disabled, ChannelSet::Mono)
    }
}

impl Default for BusesLayout {
    fn default() -> Self {
        Self::synth_stereo()
    }
}

/// How the plugin presents itself to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PluginKind {
    Synth,
    Effect,
    MidiEffect,
}

/// Accepts mono or stereo main outputs. Effects must also have a main input
/// matching the output; MIDI effects accept any layout.
pub fn check_layout(layout: &BusesLayout, kind: PluginKind) -> Result<(), LayoutError> {
    if kind == PluginKind::MidiEffect {
        return Ok(());
    }
    if !matches!(layout.main_output, ChannelSet::Mono | ChannelSet::Stereo) {
        return Err(LayoutError::UnsupportedOutput(layout.main_output));
    }
    if kind == PluginKind::Effect && layout.main_input != layout.main_output {
        return Err(LayoutError::MismatchedInput {
            input: layout.main_input,
            output: layout.main_output,
        });
    }
    Ok(())
}

/// Boolean form of [`check_layout`] for host callbacks.
pub fn supports_layout(layout: &BusesLayout, kind: PluginKind) -> bool {
    check_layout(layout, kind).is_ok()
}
