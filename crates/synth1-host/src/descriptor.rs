use serde::Serialize;

use crate::PluginKind;

/// Static facts the host queries about the plugin.
#[derive(Debug, Clone, Serialize)]
pub struct PluginDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub vendor: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub kind: PluginKind,
    pub accepts_midi: bool,
    pub produces_midi: bool,
    pub tail_seconds: f64,
    pub num_programs: usize,
    pub has_editor: bool,
}

impl PluginDescriptor {
    pub fn is_midi_effect(&self) -> bool {
        self.kind == PluginKind::MidiEffect
    }

    pub fn is_synth(&self) -> bool {
        self.kind == PluginKind::Synth
    }
}

pub static DESCRIPTOR: PluginDescriptor = PluginDescriptor {
    id: "dev.synth1.synth1",
    name: "Synth1",
    vendor: "Synth1",
    version: env!("CARGO_PKG_VERSION"),
    description: "Monophonic two-oscillator synthesizer",
    kind: PluginKind::Synth,
    accepts_midi: true,
    produces_midi: false,
    tail_seconds: 0.0,
    // Some hosts misbehave with zero programs.
    num_programs: 1,
    has_editor: false,
};
