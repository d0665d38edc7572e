//! Host-automatable knobs and their control-change marshaling.
//!
//! Values live in atomics so a control thread can write while the audio
//! thread reads. The audio thread never touches the string ids: it walks the
//! layout by index.

use std::fmt;
use std::sync::atomic::Ordering;

use atomic_float::AtomicF32;
use serde::{Deserialize, Serialize};
use synth1_dsp::{SynthesisHandle, CC_DETUNE, CC_LFO_AMOUNT, CC_LFO_RATE, CC_VOLUME};
use tracing::trace;

use crate::ParameterError;

pub const VOLUME: &str = "volume";
pub const DETUNE: &str = "detune";
pub const LFO_RATE: &str = "lfo_rate";
pub const LFO_AMOUNT: &str = "lfo_amount";

/// Channel used for knob-generated control changes.
pub const KNOB_CONTROL_CHANNEL: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterId(String);

impl ParameterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParameterId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A continuous knob bound to one MIDI control number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub id: ParameterId,
    pub name: String,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub control: u8,
}

impl ParameterDefinition {
    pub fn new(
        id: impl Into<ParameterId>,
        name: impl Into<String>,
        range: std::ops::RangeInclusive<f32>,
        default: f32,
        control: u8,
    ) -> Result<Self, ParameterError> {
        let id = id.into();
        let min = *range.start();
        let max = *range.end();
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(ParameterError::InvalidRange { id, min, max });
        }
        let definition = Self {
            id,
            name: name.into(),
            min,
            max,
            default,
            control,
        };
        definition.validate(default)?;
        Ok(definition)
    }

    /// A `0..=1` knob. Only used for the fixed layout below.
    fn unit(id: &str, name: &str, default: f32, control: u8) -> Self {
        Self {
            id: ParameterId::from(id),
            name: name.to_owned(),
            min: 0.0,
            max: 1.0,
            default,
            control,
        }
    }

    pub fn validate(&self, value: f32) -> Result<(), ParameterError> {
        if !value.is_finite() {
            return Err(ParameterError::NotFinite(self.id.clone()));
        }
        if value < self.min || value > self.max {
            return Err(ParameterError::OutOfRange {
                id: self.id.clone(),
                min: self.min,
                max: self.max,
                value,
            });
        }
        Ok(())
    }

    /// Maps a value onto the control-change scale (`0..=scale`).
    pub fn to_control_value(&self, value: f32, scale: f32) -> f32 {
        (value - self.min) / (self.max - self.min) * scale
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterLayout {
    parameters: Vec<ParameterDefinition>,
}

impl ParameterLayout {
    pub fn new(parameters: Vec<ParameterDefinition>) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &[ParameterDefinition] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn index_of(&self, id: &ParameterId) -> Option<usize> {
        self.parameters
            .iter()
            .position(|definition| &definition.id == id)
    }

    pub fn find(&self, id: &ParameterId) -> Option<&ParameterDefinition> {
        self.index_of(id).map(|index| &self.parameters[index])
    }
}

/// The four knobs exposed to the host, bound to CC 30..=33.
pub fn synth1_layout() -> ParameterLayout {
    ParameterLayout::new(vec![
        ParameterDefinition::unit(VOLUME, "Volume", 0.9, CC_VOLUME),
        ParameterDefinition::unit(DETUNE, "Detune", 0.0, CC_DETUNE),
        ParameterDefinition::unit(LFO_RATE, "LFO Rate", 0.0, CC_LFO_RATE),
        ParameterDefinition::unit(LFO_AMOUNT, "LFO Amount", 0.0, CC_LFO_AMOUNT),
    ])
}

/// Current knob values, shareable between the control and audio threads.
#[derive(Debug)]
pub struct ParameterSet {
    layout: ParameterLayout,
    values: Vec<AtomicF32>,
}

impl ParameterSet {
    pub fn new(layout: ParameterLayout) -> Self {
        let values = layout
            .parameters()
            .iter()
            .map(|definition| AtomicF32::new(definition.default))
            .collect();
        Self { layout, values }
    }

    pub fn layout(&self) -> &ParameterLayout {
        &self.layout
    }

    pub fn get(&self, id: &ParameterId) -> Result<f32, ParameterError> {
        let index = self
            .layout
            .index_of(id)
            .ok_or_else(|| ParameterError::UnknownParameter(id.clone()))?;
        self.value_at(index).ok_or(ParameterError::UnknownIndex(index))
    }

    pub fn set(&self, id: &ParameterId, value: f32) -> Result<(), ParameterError> {
        let index = self
            .layout
            .index_of(id)
            .ok_or_else(|| ParameterError::UnknownParameter(id.clone()))?;
        self.set_at(index, value)
    }

    pub fn set_at(&self, index: usize, value: f32) -> Result<(), ParameterError> {
        let (definition, slot) = self
            .layout
            .parameters()
            .get(index)
            .zip(self.values.get(index))
            .ok_or(ParameterError::UnknownIndex(index))?;
        definition.validate(value)?;
        slot.store(value, Ordering::Relaxed);
        Ok(())
    }

    /// `None` when `index` is outside the layout.
    pub fn value_at(&self, index: usize) -> Option<f32> {
        self.values
            .get(index)
            .map(|value| value.load(Ordering::Relaxed))
    }

    pub fn reset_to_defaults(&self) {
        for (definition, value) in self.layout.parameters().iter().zip(&self.values) {
            value.store(definition.default, Ordering::Relaxed);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParameterDefinition, f32)> {
        self.layout
            .parameters()
            .iter()
            .zip(&self.values)
            .map(|(definition, value)| (definition, value.load(Ordering::Relaxed)))
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::new(synth1_layout())
    }
}

/// Forwards knob changes to the synthesis handle as control changes.
///
/// Remembers the last value sent per knob; only knobs whose value differs
/// are forwarded. After construction or [`reset`](Self::reset) every knob is
/// forwarded on the next sync.
#[derive(Debug, Clone)]
pub struct ParameterTracker {
    last_sent: Vec<Option<f32>>,
}

impl ParameterTracker {
    pub fn new(layout: &ParameterLayout) -> Self {
        Self {
            last_sent: vec![None; layout.len()],
        }
    }

    pub fn reset(&mut self) {
        self.last_sent.fill(None);
    }

    /// Returns the number of control changes sent.
    pub fn sync<H: SynthesisHandle + ?Sized>(
        &mut self,
        parameters: &ParameterSet,
        handle: &mut H,
        scale: f32,
    ) -> usize {
        let mut sent = 0;
        for ((definition, value), last) in parameters.iter().zip(self.last_sent.iter_mut()) {
            if *last == Some(value) {
                continue;
            }
            let control_value = definition.to_control_value(value, scale);
            trace!(
                parameter = %definition.id,
                control = definition.control,
                value = control_value,
                "forwarding knob change"
            );
            handle.control_change(definition.control, control_value, KNOB_CONTROL_CHANNEL);
            *last = Some(value);
            sent += 1;
        }
        sent
    }
}
