use std::path::Path;

use anyhow::{Context, Result};
use synth1_dsp::Synth1;
use synth1_host::{
    AudioBuffer, BufferConfig, BusesLayout, ChannelSet, MidiBuffer, MidiMessage, ParameterId,
    SynthProcessor, WrapperConfig,
};
use tracing::{debug, info};

use crate::score::Score;

/// Rendered audio, one vector per channel.
#[derive(Debug)]
pub struct RenderedClip {
    pub name: String,
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl RenderedClip {
    pub fn frames(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or_default()
    }

    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0_f32, |acc, sample| acc.max(sample.abs()))
    }
}

#[derive(Debug, Clone)]
enum Scheduled {
    Midi(MidiMessage),
    Knob(ParameterId, f32),
}

/// Events sorted by frame. At equal frames knob moves come first, then
/// note-offs, then note-ons, so a repeated note retriggers cleanly.
///
/// Notes last at least one frame. Overlapping notes on one pitch share a
/// single key in the synth, so a note-off is only sent once the last
/// overlapping note on that pitch has ended.
fn schedule(score: &Score) -> Vec<(usize, Scheduled)> {
    let mut events = Vec::with_capacity(score.notes.len() * 2 + score.automation.len());
    for point in &score.automation {
        events.push((
            score.seconds_to_frame(point.time),
            Scheduled::Knob(ParameterId::from(point.parameter.as_str()), point.value),
        ));
    }
    for note in &score.notes {
        let start = score.seconds_to_frame(note.start);
        let end = score.seconds_to_frame(note.start + note.length).max(start + 1);
        events.push((
            start,
            Scheduled::Midi(MidiMessage::NoteOn {
                channel: note.channel,
                note: note.note,
                velocity: note.velocity,
            }),
        ));
        events.push((
            end,
            Scheduled::Midi(MidiMessage::NoteOff {
                channel: note.channel,
                note: note.note,
                velocity: 0,
            }),
        ));
    }
    events.sort_by_key(|(frame, event)| {
        let rank = match event {
            Scheduled::Knob(..) => 0,
            Scheduled::Midi(MidiMessage::NoteOff { .. }) => 1,
            Scheduled::Midi(_) => 2,
        };
        (*frame, rank)
    });

    let mut held = [0_usize; 128];
    events.retain(|(_, event)| match event {
        Scheduled::Midi(MidiMessage::NoteOn { note, .. }) => {
            held[usize::from(*note & 0x7f)] += 1;
            true
        }
        Scheduled::Midi(MidiMessage::NoteOff { note, .. }) => {
            let count = &mut held[usize::from(*note & 0x7f)];
            *count = count.saturating_sub(1);
            *count == 0
        }
        _ => true,
    });
    events
}

pub fn render_score(score: &Score, config: WrapperConfig) -> Result<RenderedClip> {
    let output = score.output();
    let layout = BusesLayout::new(ChannelSet::Disabled, output);
    let mut processor = SynthProcessor::new(Synth1::new(), config);
    processor
        .prepare(BufferConfig::new(score.sample_rate, score.block_size, layout))
        .with_context(|| format!("score '{}' asks for an unsupported layout", score.name))?;

    for (id, value) in &score.knobs {
        processor
            .parameters()
            .set(&ParameterId::from(id.as_str()), *value)
            .with_context(|| format!("invalid initial knob '{id}'"))?;
    }

    let total = score.total_frames();
    let events = schedule(score);
    let mut pending = events.iter().peekable();
    let mut buffer = AudioBuffer::for_layout(output, score.block_size);
    let mut midi = MidiBuffer::with_capacity(64);
    let mut channels = vec![Vec::with_capacity(total); output.channels()];

    let mut start = 0;
    while start < total {
        let frames = score.block_size.min(total - start);
        buffer.set_len(frames);
        midi.clear();

        while let Some((frame, event)) = pending.next_if(|(frame, _)| *frame < start + frames) {
            match event {
                Scheduled::Midi(message) => midi.add((frame - start) as u32, *message),
                Scheduled::Knob(id, value) => processor
                    .parameters()
                    .set(id, *value)
                    .with_context(|| format!("invalid automation for '{id}'"))?,
            }
        }
        if !midi.is_empty() {
            debug!(start, events = midi.len(), "dispatching block events");
        }

        processor.process_block(&mut buffer.slices_mut(), &midi);
        for (index, channel) in channels.iter_mut().enumerate() {
            if let Some(rendered) = buffer.channel(index) {
                channel.extend_from_slice(rendered);
            }
        }
        start += frames;
    }
    processor.release();

    info!(score = %score.name, frames = total, "render finished");
    Ok(RenderedClip {
        name: score.name.clone(),
        sample_rate: score.sample_rate.round() as u32,
        channels,
    })
}

/// Writes 32-bit float WAV.
pub fn write_wav(clip: &RenderedClip, path: &Path) -> Result<()> {
    use hound::{SampleFormat, WavSpec, WavWriter};

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let spec = WavSpec {
        channels: clip.channels.len() as u16,
        sample_rate: clip.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for frame in 0..clip.frames() {
        for channel in &clip.channels {
            writer.write_sample(channel[frame])?;
        }
    }
    writer.finalize()?;
    Ok(())
}
