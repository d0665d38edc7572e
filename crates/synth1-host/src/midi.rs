//! MIDI messages, the per-block event buffer and note dispatch.

use serde::{Deserialize, Serialize};
use synth1_dsp::SynthesisHandle;
use tracing::debug;

/// Channel-voice message. Channels are numbered `1..=16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MidiMessage {
    NoteOn {
        channel: u8,
        note: u8,
        velocity: u8,
    },
    NoteOff {
        channel: u8,
        note: u8,
        velocity: u8,
    },
    ControlChange {
        channel: u8,
        control: u8,
        value: u8,
    },
    /// Polyphonic key pressure.
    Aftertouch {
        channel: u8,
        note: u8,
        pressure: u8,
    },
    ChannelPressure {
        channel: u8,
        pressure: u8,
    },
    /// 14-bit value, centre is 8192.
    PitchWheel {
        channel: u8,
        value: u16,
    },
    Other {
        data: [u8; 3],
    },
}

impl MidiMessage {
    pub fn from_bytes(data: [u8; 3]) -> Self {
        let status = data[0] & 0xF0;
        let channel = (data[0] & 0x0F) + 1;
        let data1 = data[1] & 0x7F;
        let data2 = data[2] & 0x7F;

        match status {
            0x80 => MidiMessage::NoteOff {
                channel,
                note: data1,
                velocity: data2,
            },
            0x90 => MidiMessage::NoteOn {
                channel,
                note: data1,
                velocity: data2,
            },
            0xA0 => MidiMessage::Aftertouch {
                channel,
                note: data1,
                pressure: data2,
            },
            0xB0 => MidiMessage::ControlChange {
                channel,
                control: data1,
                value: data2,
            },
            0xD0 => MidiMessage::ChannelPressure {
                channel,
                pressure: data1,
            },
            0xE0 => MidiMessage::PitchWheel {
                channel,
                value: u16::from(data1) | (u16::from(data2) << 7),
            },
            _ => MidiMessage::Other { data },
        }
    }

    pub fn to_bytes(&self) -> [u8; 3] {
        let status = |kind: u8, channel: u8| kind | (channel.saturating_sub(1) & 0x0F);
        match *self {
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => [status(0x80, channel), note, velocity],
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => [status(0x90, channel), note, velocity],
            MidiMessage::Aftertouch {
                channel,
                note,
                pressure,
            } => [status(0xA0, channel), note, pressure],
            MidiMessage::ControlChange {
                channel,
                control,
                value,
            } => [status(0xB0, channel), control, value],
            MidiMessage::ChannelPressure { channel, pressure } => {
                [status(0xD0, channel), pressure, 0]
            }
            MidiMessage::PitchWheel { channel, value } => [
                status(0xE0, channel),
                (value & 0x7F) as u8,
                ((value >> 7) & 0x7F) as u8,
            ],
            MidiMessage::Other { data } => data,
        }
    }

    pub fn channel(&self) -> Option<u8> {
        match *self {
            MidiMessage::NoteOn { channel, .. }
            | MidiMessage::NoteOff { channel, .. }
            | MidiMessage::ControlChange { channel, .. }
            | MidiMessage::Aftertouch { channel, .. }
            | MidiMessage::ChannelPressure { channel, .. }
            | MidiMessage::PitchWheel { channel, .. } => Some(channel),
            MidiMessage::Other { .. } => None,
        }
    }
}

/// A message positioned within the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiEvent {
    pub sample_offset: u32,
    pub message: MidiMessage,
}

impl MidiEvent {
    pub fn new(sample_offset: u32, message: MidiMessage) -> Self {
        Self {
            sample_offset,
            message,
        }
    }
}

/// Events for one processing block, ordered by sample offset. Events with
/// equal offsets keep their insertion order.
#[derive(Debug, Clone, Default)]
pub struct MidiBuffer {
    events: Vec<MidiEvent>,
}

impl MidiBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: MidiEvent) {
        let index = self
            .events
            .partition_point(|existing| existing.sample_offset <= event.sample_offset);
        self.events.insert(index, event);
    }

    pub fn add(&mut self, sample_offset: u32, message: MidiMessage) {
        self.push(MidiEvent::new(sample_offset, message));
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MidiEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[MidiEvent] {
        &self.events
    }
}

impl Extend<MidiEvent> for MidiBuffer {
    fn extend<T: IntoIterator<Item = MidiEvent>>(&mut self, iter: T) {
        for event in iter {
            self.push(event);
        }
    }
}

impl FromIterator<MidiEvent> for MidiBuffer {
    fn from_iter<T: IntoIterator<Item = MidiEvent>>(iter: T) -> Self {
        let mut buffer = MidiBuffer::new();
        buffer.extend(iter);
        buffer
    }
}

/// What [`dispatch`] did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    NoteOn,
    NoteOff,
    ControlChange,
    Ignored,
}

/// Forwards one message to the synthesis handle.
///
/// A note-on with velocity zero is a note-off. Aftertouch, channel pressure
/// and pitch wheel are ignored. Control changes are only forwarded when
/// `forward_controls` is set.
pub fn dispatch<H: SynthesisHandle + ?Sized>(
    handle: &mut H,
    message: &MidiMessage,
    forward_controls: bool,
    log_notes: bool,
) -> DispatchOutcome {
    match *message {
        MidiMessage::NoteOn {
            channel,
            note,
            velocity,
        } if velocity > 0 => {
            handle.note_on(note, velocity, channel);
            if log_notes {
                debug!(note, velocity, channel, "note on");
            }
            DispatchOutcome::NoteOn
        }
        MidiMessage::NoteOn { channel, note, .. } => {
            handle.note_off(note, channel);
            if log_notes {
                debug!(note, channel, "note off");
            }
            DispatchOutcome::NoteOff
        }
        MidiMessage::NoteOff { channel, note, .. } => {
            handle.note_off(note, channel);
            DispatchOutcome::NoteOff
        }
        MidiMessage::ControlChange {
            channel,
            control,
            value,
        } if forward_controls => {
            handle.control_change(control, f32::from(value), channel);
            DispatchOutcome::ControlChange
        }
        _ => DispatchOutcome::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl SynthesisHandle for Log {
        fn load_defaults(&mut self) {}
        fn set_sample_rate(&mut self, _sample_rate: f32) {}
        fn note_on(&mut self, note: u8, velocity: u8, channel: u8) {
            self.0.push(format!("on {note} {velocity} {channel}"));
        }
        fn note_off(&mut self, note: u8, channel: u8) {
            self.0.push(format!("off {note} {channel}"));
        }
        fn control_change(&mut self, control: u8, value: f32, channel: u8) {
            self.0.push(format!("cc {control} {value} {channel}"));
        }
        fn process(&mut self, _input: f32) -> f32 {
            0.0
        }
    }

    #[test]
    fn parses_channel_voice_messages() {
        assert_eq!(
            MidiMessage::from_bytes([0x92, 60, 100]),
            MidiMessage::NoteOn {
                channel: 3,
                note: 60,
                velocity: 100
            }
        );
        assert_eq!(
            MidiMessage::from_bytes([0xE0, 0x00, 0x40]),
            MidiMessage::PitchWheel {
                channel: 1,
                value: 8192
            }
        );
        assert_eq!(
            MidiMessage::from_bytes([0xF8, 0, 0]),
            MidiMessage::Other { data: [0xF8, 0, 0] }
        );
        let cc = MidiMessage::from_bytes([0xBF, 74, 12]);
        assert_eq!(cc.channel(), Some(16));
        assert_eq!(cc.to_bytes(), [0xBF, 74, 12]);
    }

    #[test]
    fn zero_velocity_note_on_is_note_off() {
        let mut log = Log::default();
        let outcome = dispatch(
            &mut log,
            &MidiMessage::NoteOn {
                channel: 1,
                note: 64,
                velocity: 0,
            },
            false,
            false,
        );
        assert_eq!(outcome, DispatchOutcome::NoteOff);
        assert_eq!(log.0, vec!["off 64 1"]);
    }

    #[test]
    fn controls_follow_the_forwarding_flag() {
        let mut log = Log::default();
        let cc = MidiMessage::ControlChange {
            channel: 2,
            control: 31,
            value: 64,
        };
        assert_eq!(dispatch(&mut log, &cc, false, false), DispatchOutcome::Ignored);
        assert!(log.0.is_empty());
        assert_eq!(
            dispatch(&mut log, &cc, true, false),
            DispatchOutcome::ControlChange
        );
        assert_eq!(log.0, vec!["cc 31 64 2"]);
    }

    #[test]
    fn expression_messages_are_ignored() {
        let mut log = Log::default();
        for message in [
            MidiMessage::PitchWheel {
                channel: 1,
                value: 0,
            },
            MidiMessage::Aftertouch {
                channel: 1,
                note: 60,
                pressure: 90,
            },
            MidiMessage::ChannelPressure {
                channel: 1,
                pressure: 90,
            },
        ] {
            assert_eq!(
                dispatch(&mut log, &message, true, true),
                DispatchOutcome::Ignored
            );
        }
        assert!(log.0.is_empty());
    }

    #[test]
    fn buffer_keeps_events_ordered() {
        let on = |note| MidiMessage::NoteOn {
            channel: 1,
            note,
            velocity: 90,
        };
        let buffer: MidiBuffer = [
            MidiEvent::new(32, on(1)),
            MidiEvent::new(0, on(2)),
            MidiEvent::new(32, on(3)),
            MidiEvent::new(16, on(4)),
        ]
        .into_iter()
        .collect();
        let order: Vec<u32> = buffer.iter().map(|e| e.sample_offset).collect();
        assert_eq!(order, vec![0, 16, 32, 32]);
        assert_eq!(buffer.as_slice()[2].message, on(1));
        assert_eq!(buffer.as_slice()[3].message, on(3));
    }
}
