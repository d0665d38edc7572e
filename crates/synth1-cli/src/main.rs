use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use synth1_host::{config, synth1_layout, WrapperConfig, DESCRIPTOR};
use tracing_subscriber::EnvFilter;

mod render;
mod score;

use render::{render_score, write_wav};
use score::Score;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => execute_render(args),
        Commands::Info => print_info(),
    }
}

#[derive(Parser)]
#[command(author, version, about = "Offline host for the Synth1 plugin")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a score through the plugin wrapper to a WAV file.
    Render(RenderArgs),
    /// Print plugin facts and the parameter layout.
    Info,
}

#[derive(Args)]
struct RenderArgs {
    /// Path to the score description (JSON).
    #[arg(long)]
    score: PathBuf,
    /// Output path for the rendered WAV file.
    #[arg(long)]
    output: PathBuf,
    /// Wrapper config to use instead of the per-user one.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override render duration in seconds.
    #[arg(long)]
    duration: Option<f32>,
    /// Forward MIDI control changes instead of knob values.
    #[arg(long)]
    forward_midi_cc: bool,
}

fn execute_render(args: RenderArgs) -> Result<()> {
    let data = fs::read_to_string(&args.score)
        .with_context(|| format!("failed to read score file {}", args.score.display()))?;
    let mut score = Score::from_json(&data)
        .with_context(|| format!("{} is not a valid score file", args.score.display()))?;
    if let Some(duration) = args.duration {
        score.duration_seconds = duration;
        score.validate()?;
    }

    let mut wrapper = match &args.config {
        Some(path) => WrapperConfig::load_from(path)?,
        None => config::load(),
    };
    wrapper.forward_midi_cc |= args.forward_midi_cc;

    let clip = render_score(&score, wrapper)?;
    write_wav(&clip, &args.output)?;

    println!(
        "Rendered score '{}' ({} frames, peak {:.3})",
        clip.name,
        clip.frames(),
        clip.peak()
    );
    println!("  Output: {}", args.output.display());
    Ok(())
}

fn print_info() -> Result<()> {
    let descriptor = &DESCRIPTOR;
    println!("{} {} by {}", descriptor.name, descriptor.version, descriptor.vendor);
    println!("  id:            {}", descriptor.id);
    println!("  accepts MIDI:  {}", descriptor.accepts_midi);
    println!("  produces MIDI: {}", descriptor.produces_midi);
    println!("  synth:         {}", descriptor.is_synth());
    println!("  tail:          {} s", descriptor.tail_seconds);
    println!("  outputs:       mono, stereo");
    println!("Parameters:");
    for parameter in synth1_layout().parameters() {
        println!(
            "  {:<12} {:<12} {}..={} default {} -> CC {}",
            parameter.id.as_str(),
            parameter.name,
            parameter.min,
            parameter.max,
            parameter.default,
            parameter.control
        );
    }
    match config::default_path() {
        Ok(path) => println!("Wrapper config: {}", path.display()),
        Err(err) => println!("Wrapper config: unavailable ({err})"),
    }
    Ok(())
}
