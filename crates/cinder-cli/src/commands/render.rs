//! Test-signal rendering command: generate a signal, run it through the
//! engine, and write the result. Handy for auditioning presets without an
//! input file.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};
use cinder_engine::CinderEngine;

use crate::commands::common::{apply_overrides, parse_key_val, run_engine};
use crate::preset::{Preset, parse_routing};
use crate::wav::{WavSpec, write_wav_stereo};

/// Source signal shape.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Signal {
    /// Single unit impulse at t=0 (reveals the raw reverb tail).
    Impulse,
    /// Sine burst at the given frequency.
    Sine,
    /// White-ish noise burst.
    Noise,
}

/// Arguments for `cinder render`.
#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Signal to feed the engine
    #[arg(long, value_enum, default_value_t = Signal::Impulse)]
    signal: Signal,

    /// Source signal length in seconds
    #[arg(long, default_value = "1.0")]
    duration: f32,

    /// Sine frequency in Hz (sine signal only)
    #[arg(long, default_value = "440.0")]
    freq: f32,

    /// Sample rate in Hz
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Preset file (TOML)
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Routing topology: simple, prepost, or driveburn
    #[arg(short, long)]
    routing: Option<String>,

    /// Parameter override (e.g. --set shimmer=0.8)
    #[arg(long = "set", value_parser = parse_key_val, number_of_values = 1)]
    set: Vec<(String, f32)>,

    /// Seconds of silence appended so the reverb tail rings out
    #[arg(long, default_value = "3.0")]
    tail: f32,
}

fn generate(signal: Signal, num_samples: usize, sample_rate: f32, freq: f32) -> Vec<f32> {
    match signal {
        Signal::Impulse => {
            let mut samples = vec![0.0; num_samples.max(1)];
            samples[0] = 1.0;
            samples
        }
        Signal::Sine => (0..num_samples)
            .map(|i| {
                let t = i as f32 / sample_rate;
                (2.0 * std::f32::consts::PI * freq * t).sin() * 0.5
            })
            .collect(),
        Signal::Noise => {
            let mut state = 0x2545_f491u32;
            (0..num_samples)
                .map(|_| {
                    state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
                    ((state >> 16) & 0x7fff) as f32 / 32768.0 - 0.5
                })
                .collect()
        }
    }
}

/// Run the render command.
pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let sample_rate = args.sample_rate as f32;
    let num_samples = (sample_rate * args.duration.max(0.0)) as usize;

    let mut left = generate(args.signal, num_samples, sample_rate, args.freq);
    let mut right = left.clone();

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

    run_engine(&mut engine, &mut left, &mut right, 512, args.tail.max(0.0));

    write_wav_stereo(
        &args.output,
        &left,
        &right,
        WavSpec {
            sample_rate: args.sample_rate,
            bits_per_sample: 32,
        },
    )
    .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "Wrote {} ({} frames, {:.2}s)",
        args.output.display(),
        left.len(),
        left.len() as f32 / sample_rate
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_has_single_spike() {
        let samples = generate(Signal::Impulse, 100, 48000.0, 440.0);
        assert_eq!(samples[0], 1.0);
        assert!(samples[1..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn noise_stays_in_range() {
        let samples = generate(Signal::Noise, 1000, 48000.0, 440.0);
        assert!(samples.iter().all(|s| s.abs() <= 0.5));
        // and is not silence
        assert!(samples.iter().any(|&s| s != 0.0));
    }
}
