use nih_plug::prelude::NoteEvent;
use synth1_host::{MidiEvent, MidiMessage};

/// Translates a nih-plug note event into the wrapper's MIDI form.
///
/// nih-plug reports channels from 0 and normalises velocities and
/// controller values to `0..=1`; both are mapped back to MIDI ranges.
/// Events the wrapper has no use for yield `None`.
pub fn to_midi_event<S>(event: &NoteEvent<S>) -> Option<MidiEvent> {
    let message = match *event {
        NoteEvent::NoteOn {
            channel,
            note,
            velocity,
            ..
        } => MidiMessage::NoteOn {
            channel: channel + 1,
            note,
            // Velocity 0 would read as a note-off; nih-plug already turns
            // those into `NoteOff` events.
            velocity: to_seven_bit(velocity).max(1),
        },
        NoteEvent::NoteOff {
            channel,
            note,
            velocity,
            ..
        } => MidiMessage::NoteOff {
            channel: channel + 1,
            note,
            velocity: to_seven_bit(velocity),
        },
        NoteEvent::PolyPressure {
            channel,
            note,
            pressure,
            ..
        } => MidiMessage::Aftertouch {
            channel: channel + 1,
            note,
            pressure: to_seven_bit(pressure),
        },
        NoteEvent::MidiChannelPressure {
            channel, pressure, ..
        } => MidiMessage::ChannelPressure {
            channel: channel + 1,
            pressure: to_seven_bit(pressure),
        },
        NoteEvent::MidiPitchBend { channel, value, .. } => MidiMessage::PitchWheel {
            channel: channel + 1,
            value: (value.clamp(0.0, 1.0) * 16_383.0).round() as u16,
        },
        NoteEvent::MidiCC {
            channel, cc, value, ..
        } => MidiMessage::ControlChange {
            channel: channel + 1,
            control: cc,
            value: to_seven_bit(value),
        },
        _ => return None,
    };
    Some(MidiEvent::new(event.timing(), message))
}

fn to_seven_bit(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 127.0).round() as u8
}
