use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{note_to_hz, Adsr, Lfo, NoteStack, PolyBlepSaw, SynthesisHandle};

pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;

pub const CC_VOLUME: u8 = 30;
pub const CC_DETUNE: u8 = 31;
pub const CC_LFO_RATE: u8 = 32;
pub const CC_LFO_AMOUNT: u8 = 33;

const MAX_DETUNE_SEMITONES: f32 = 1.0;
const MAX_VIBRATO_SEMITONES: f32 = 2.0;
const LFO_MIN_HZ: f32 = 0.1;
const LFO_MAX_HZ: f32 = 20.0;
const OUTPUT_TRIM: f32 = 0.5;

/// Normalised (`0..=1`) patch values controlled through CC 30..=33.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Synth1Patch {
    pub volume: f32,
    pub detune: f32,
    pub lfo_rate: f32,
    pub lfo_amount: f32,
}

impl Default for Synth1Patch {
    fn default() -> Self {
        Self {
            volume: 0.9,
            detune: 0.0,
            lfo_rate: 0.0,
            lfo_amount: 0.0,
        }
    }
}

/// Monophonic two-oscillator synthesizer.
///
/// Last-note priority with legato: a new note only retriggers the envelope
/// when nothing else is held.
#[derive(Debug, Clone)]
pub struct Synth1 {
    sample_rate: f32,
    patch: Synth1Patch,
    notes: NoteStack,
    pitch_note: Option<u8>,
    velocity: f32,
    osc_a: PolyBlepSaw,
    osc_b: PolyBlepSaw,
    lfo: Lfo,
    envelope: Adsr,
}

impl Default for Synth1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Synth1 {
    /// Zeroed engine state. Call [`SynthesisHandle::load_defaults`] to load
    /// the default patch.
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            patch: Synth1Patch {
                volume: 0.0,
                detune: 0.0,
                lfo_rate: 0.0,
                lfo_amount: 0.0,
            },
            notes: NoteStack::new(),
            pitch_note: None,
            velocity: 0.0,
            osc_a: PolyBlepSaw::new(),
            osc_b: PolyBlepSaw::new(),
            lfo: Lfo::default(),
            envelope: Adsr::default(),
        }
    }

    pub fn patch(&self) -> Synth1Patch {
        self.patch
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Note the voice is pitched at; kept through the release stage.
    pub fn current_note(&self) -> Option<u8> {
        self.pitch_note
    }

    pub fn held_notes(&self) -> &NoteStack {
        &self.notes
    }

    /// Whether the voice is producing sound (held or releasing).
    pub fn is_sounding(&self) -> bool {
        self.envelope.is_active()
    }

    fn apply_patch(&mut self) {
        let rate = LFO_MIN_HZ + (LFO_MAX_HZ - LFO_MIN_HZ) * self.patch.lfo_rate;
        self.lfo.set_rate(rate);
    }
}

impl SynthesisHandle for Synth1 {
    fn load_defaults(&mut self) {
        self.patch = Synth1Patch::default();
        self.notes.clear();
        self.pitch_note = None;
        self.velocity = 0.0;
        self.osc_a.reset();
        self.osc_b.reset();
        self.lfo.reset();
        self.envelope.reset();
        self.envelope.set_params(0.005, 0.25, 0.75, 0.2);
        self.apply_patch();
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
        self.lfo.set_sample_rate(self.sample_rate);
        self.envelope.set_sample_rate(self.sample_rate);
    }

    fn note_on(&mut self, note: u8, velocity: u8, _channel: u8) {
        let was_idle = self.notes.is_empty();
        self.notes.push(note);
        self.pitch_note = Some(note);
        if was_idle {
            self.velocity = f32::from(velocity.min(127)) / 127.0;
            self.envelope.trigger();
        }
    }

    fn note_off(&mut self, note: u8, _channel: u8) {
        if !self.notes.remove(note) {
            return;
        }
        match self.notes.current() {
            Some(previous) => self.pitch_note = Some(previous),
            None => self.envelope.release(),
        }
    }

    fn control_change(&mut self, control: u8, value: f32, _channel: u8) {
        if !value.is_finite() {
            trace!(control, "ignoring non-finite control value");
            return;
        }
        let normalised = (value / 127.0).clamp(0.0, 1.0);
        match control {
            CC_VOLUME => self.patch.volume = normalised,
            CC_DETUNE => self.patch.detune = normalised,
            CC_LFO_RATE => self.patch.lfo_rate = normalised,
            CC_LFO_AMOUNT => self.patch.lfo_amount = normalised,
            other => {
                trace!(control = other, "ignoring unmapped control change");
                return;
            }
        }
        self.apply_patch();
    }

    fn process(&mut self, _input: f32) -> f32 {
        let lfo = self.lfo.next();
        let level = self.envelope.next();
        if !self.envelope.is_active() {
            return 0.0;
        }
        let Some(note) = self.pitch_note else {
            return 0.0;
        };

        let vibrato = lfo * self.patch.lfo_amount * MAX_VIBRATO_SEMITONES;
        let pitch = f32::from(note) + vibrato;
        let inc_a = note_to_hz(pitch) / self.sample_rate;
        let inc_b = note_to_hz(pitch + self.patch.detune * MAX_DETUNE_SEMITONES) / self.sample_rate;

        let mix = 0.5 * (self.osc_a.next(inc_a) + self.osc_b.next(inc_b));
        mix * level * self.velocity * self.patch.volume * OUTPUT_TRIM
    }
}
