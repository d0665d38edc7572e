use synth1_host::parameters::{DETUNE, LFO_AMOUNT, LFO_RATE, VOLUME};
use synth1_host::{BusesLayout, ChannelSet, MidiMessage, ParameterId, WrapperConfig};
mod common;

use common::{note_off, note_on, peak, prepared, run, BLOCK, SAMPLE_RATE};
use synth1_host::BufferConfig;

#[test]
fn loads_silent_until_a_note_arrives() -> anyhow::Result<()> {
    let mut processor = prepared(WrapperConfig::default(), BusesLayout::synth_stereo())?;
    let rendered = run(&mut processor, 2, 16, &[]);
    assert_eq!(peak(&rendered), 0.0);
    Ok(())
}

#[test]
fn responds_to_note_on_and_off() -> anyhow::Result<()> {
    let mut processor = prepared(WrapperConfig::default(), BusesLayout::synth_stereo())?;
    let held = run(&mut processor, 2, 32, &[note_on(60, 100)]);
    assert!(peak(&held) > 0.05, "note-on should sound");

    // 0.2 s release at 48 kHz is 75 blocks of 128 frames.
    let _releasing = run(&mut processor, 2, 80, &[note_off(60)]);
    let after = run(&mut processor, 2, 4, &[]);
    assert_eq!(peak(&after), 0.0, "note-off should decay to silence");
    Ok(())
}

#[test]
fn zero_velocity_note_on_releases() -> anyhow::Result<()> {
    let mut processor = prepared(WrapperConfig::default(), BusesLayout::synth_stereo())?;
    run(&mut processor, 2, 8, &[note_on(64, 90)]);
    run(&mut processor, 2, 80, &[note_on(64, 0)]);
    assert!(!processor.handle().is_sounding());
    Ok(())
}

#[test]
fn parameter_changes_alter_output() -> anyhow::Result<()> {
    let mut reference = prepared(WrapperConfig::default(), BusesLayout::synth_stereo())?;
    let mut tweaked = prepared(WrapperConfig::default(), BusesLayout::synth_stereo())?;
    tweaked.parameters().set(&ParameterId::from(DETUNE), 0.8)?;
    tweaked.parameters().set(&ParameterId::from(LFO_RATE), 0.5)?;
    tweaked.parameters().set(&ParameterId::from(LFO_AMOUNT), 0.5)?;

    let a = run(&mut reference, 2, 32, &[note_on(52, 100)]);
    let b = run(&mut tweaked, 2, 32, &[note_on(52, 100)]);
    let difference: f32 = a.iter().zip(&b).map(|(x, y)| (x - y).abs()).sum();
    assert!(difference > 1.0);

    let patch = tweaked.handle().patch();
    assert!((patch.detune - 0.8).abs() < 1e-6);
    assert!((patch.lfo_amount - 0.5).abs() < 1e-6);
    Ok(())
}

#[test]
fn volume_knob_reaches_the_synth_between_blocks() -> anyhow::Result<()> {
    let mut processor = prepared(WrapperConfig::default(), BusesLayout::synth_stereo())?;
    let loud = run(&mut processor, 2, 40, &[note_on(60, 127)]);
    processor.parameters().set(&ParameterId::from(VOLUME), 0.0)?;
    let muted = run(&mut processor, 2, 4, &[]);
    assert!(peak(&loud) > 0.05);
    assert_eq!(peak(&muted), 0.0);
    Ok(())
}

#[test]
fn midi_cc_mode_ignores_knobs() -> anyhow::Result<()> {
    let config = WrapperConfig {
        forward_midi_cc: true,
        ..WrapperConfig::default()
    };
    let mut processor = prepared(config, BusesLayout::synth_stereo())?;
    processor.parameters().set(&ParameterId::from(VOLUME), 0.0)?;
    let cc = MidiMessage::ControlChange {
        channel: 1,
        control: 31,
        value: 127,
    };
    let rendered = run(&mut processor, 2, 16, &[cc, note_on(60, 100)]);
    // The knob says silence but is not marshaled in this mode.
    assert!(peak(&rendered) > 0.05);
    assert_eq!(processor.handle().patch().detune, 1.0);
    Ok(())
}

#[test]
fn mono_and_stereo_render_the_same_signal() -> anyhow::Result<()> {
    let mut stereo = prepared(WrapperConfig::default(), BusesLayout::synth_stereo())?;
    let mut mono = prepared(WrapperConfig::default(), BusesLayout::synth_mono())?;
    let a = run(&mut stereo, 2, 8, &[note_on(45, 100)]);
    let b = run(&mut mono, 1, 8, &[note_on(45, 100)]);
    assert_eq!(a.len(), 8 * BLOCK);
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn rejects_surround_output() {
    let layout = BusesLayout::new(ChannelSet::Disabled, ChannelSet::Discrete(6));
    assert!(prepared(WrapperConfig::default(), layout).is_err());
}

#[test]
fn prepare_sets_the_engine_sample_rate() -> anyhow::Result<()> {
    let mut processor = prepared(WrapperConfig::default(), BusesLayout::synth_stereo())?;
    assert_eq!(processor.handle().sample_rate(), SAMPLE_RATE);

    processor.prepare(BufferConfig::new(96_000.0, BLOCK, BusesLayout::synth_mono()))?;
    assert_eq!(processor.handle().sample_rate(), 96_000.0);
    Ok(())
}

#[test]
fn unbounded_control_scale_keeps_output_finite() -> anyhow::Result<()> {
    let config = WrapperConfig {
        control_scale: f32::INFINITY,
        ..WrapperConfig::default()
    };
    let mut processor = prepared(config, BusesLayout::synth_stereo())?;
    let rendered = run(&mut processor, 2, 8, &[note_on(60, 100)]);
    assert!(rendered.iter().all(|s| s.is_finite()));
    assert!(peak(&rendered) > 0.05);
    Ok(())
}
