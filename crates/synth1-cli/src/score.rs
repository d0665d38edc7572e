use std::collections::BTreeMap;

use anyhow::{bail, Result};
use serde::Deserialize;
use synth1_host::ChannelSet;

/// Offline render description read from JSON.
#[derive(Debug, Deserialize)]
pub struct Score {
    pub name: String,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f32,
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    #[serde(default = "default_channels")]
    pub channels: usize,
    pub duration_seconds: f32,
    /// Initial knob values by parameter id.
    #[serde(default)]
    pub knobs: BTreeMap<String, f32>,
    #[serde(default)]
    pub notes: Vec<ScoreNote>,
    #[serde(default)]
    pub automation: Vec<AutomationPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreNote {
    pub note: u8,
    /// Seconds from the start of the render.
    pub start: f32,
    /// Seconds the key is held.
    pub length: f32,
    #[serde(default = "default_velocity")]
    pub velocity: u8,
    #[serde(default = "default_channel")]
    pub channel: u8,
}

/// Knob value applied from `time` onwards.
#[derive(Debug, Clone, Deserialize)]
pub struct AutomationPoint {
    pub time: f32,
    pub parameter: String,
    pub value: f32,
}

impl Score {
    pub fn from_json(json: &str) -> Result<Self> {
        let score: Score = serde_json::from_str(json)?;
        score.validate()?;
        Ok(score)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            bail!("sample rate must be positive, got {}", self.sample_rate);
        }
        if self.block_size == 0 {
            bail!("block size must be at least one frame");
        }
        if !matches!(self.output(), ChannelSet::Mono | ChannelSet::Stereo) {
            bail!("only mono or stereo renders are supported, got {} channels", self.channels);
        }
        if !(self.duration_seconds.is_finite() && self.duration_seconds >= 0.0) {
            bail!("duration must be non-negative, got {}", self.duration_seconds);
        }
        for note in &self.notes {
            if note.note > 127 || note.velocity > 127 {
                bail!("note {} has out-of-range note or velocity", note.note);
            }
            if !(1..=16).contains(&note.channel) {
                bail!("note {} uses channel {}, expected 1..=16", note.note, note.channel);
            }
            if note.start < 0.0 || note.length < 0.0 {
                bail!("note {} starts or ends before the render", note.note);
            }
        }
        Ok(())
    }

    pub fn output(&self) -> ChannelSet {
        ChannelSet::from_channels(self.channels)
    }

    pub fn total_frames(&self) -> usize {
        self.seconds_to_frame(self.duration_seconds)
    }

    pub fn seconds_to_frame(&self, seconds: f32) -> usize {
        (seconds.max(0.0) * self.sample_rate).round() as usize
    }
}

fn default_sample_rate() -> f32 {
    48_000.0
}

fn default_block_size() -> usize {
    256
}

fn default_channels() -> usize {
    2
}

fn default_velocity() -> u8 {
    100
}

fn default_channel() -> u8 {
    1
}
