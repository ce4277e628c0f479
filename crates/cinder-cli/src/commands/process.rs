//! File-based processing command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use cinder_core::linear_to_db;
use cinder_engine::CinderEngine;

use crate::commands::common::{apply_overrides, parse_key_val, run_engine};
use crate::preset::{Preset, parse_routing};
use crate::wav::{WavSpec, read_wav_stereo, write_wav_stereo};

/// Arguments for `cinder process`.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset file (TOML)
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Routing topology: simple, prepost, or driveburn
    #[arg(short, long)]
    routing: Option<String>,

    /// Parameter override (e.g. --set decay=8 --set mix=0.5)
    #[arg(long = "set", value_parser = parse_key_val, number_of_values = 1)]
    set: Vec<(String, f32)>,

    /// Seconds of silence appended so the reverb tail rings out
    #[arg(long, default_value = "2.0")]
    tail: f32,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

/// Run the process command.
pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let (mut left, mut right, spec) = read_wav_stereo(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let sample_rate = spec.sample_rate as f32;

    println!(
        "Read {} ({} frames, {} Hz, {:.2}s)",
        args.input.display(),
        left.len(),
        spec.sample_rate,
        left.len() as f32 / sample_rate
    );

    let mut engine = CinderEngine::new(sample_rate);
    if let Some(preset_path) = &args.preset {
        let preset = Preset::load(preset_path)?;
        println!("Preset: {}", preset.name);
        if let Some(description) = &preset.description {
            println!("  {description}");
        }
        preset.apply(&mut engine)?;
    }
    if let Some(routing) = &args.routing {
        engine.set_routing(parse_routing(routing)?);
    }
    apply_overrides(&engine, &args.set)?;
    engine.prepare(sample_rate);

    tracing::debug!(
        block_size = args.block_size,
        tail = args.tail,
        routing = ?engine.routing(),
        "processing"
    );
    run_engine(
        &mut engine,
        &mut left,
        &mut right,
        args.block_size.max(1),
        args.tail.max(0.0),
    );

    write_wav_stereo(
        &args.output,
        &left,
        &right,
        WavSpec {
            sample_rate: spec.sample_rate,
            bits_per_sample: args.bit_depth,
        },
    )
    .with_context(|| format!("writing {}", args.output.display()))?;

    let peak = left
        .iter()
        .chain(right.iter())
        .fold(0.0f32, |acc, &s| acc.max(s.abs()));
    println!(
        "Wrote {} ({} frames, peak {:.1} dBFS)",
        args.output.display(),
        left.len(),
        linear_to_db(peak)
    );
    Ok(())
}
