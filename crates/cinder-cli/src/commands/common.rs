//! Argument parsing helpers shared by the subcommands.

use anyhow::bail;
use cinder_engine::{CinderEngine, ParamId};

/// Parse a `key=value` parameter override.
pub fn parse_key_val(s: &str) -> Result<(String, f32), String> {
    let Some((key, value)) = s.split_once('=') else {
        return Err(format!("invalid parameter format '{s}' (expected name=value)"));
    };
    let value: f32 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    Ok((key.to_string(), value))
}

/// Apply `--set name=value` overrides to an engine's parameter store.
pub fn apply_overrides(engine: &CinderEngine, overrides: &[(String, f32)]) -> anyhow::Result<()> {
    let store = engine.params();
    for (key, value) in overrides {
        match ParamId::from_string_id(key) {
            Some(id) => store.set(id, *value),
            None => {
                let valid: Vec<&str> = ParamId::ALL.iter().map(|p| p.string_id()).collect();
                bail!("unknown parameter '{key}' (valid: {})", valid.join(", "));
            }
        }
    }
    Ok(())
}

/// Process a stereo pair through the engine in fixed-size blocks,
/// appending `tail_secs` of silence for the reverb to ring out.
pub fn run_engine(
    engine: &mut CinderEngine,
    left: &mut Vec<f32>,
    right: &mut Vec<f32>,
    block_size: usize,
    tail_secs: f32,
) {
    let tail_samples = (engine.sample_rate() * tail_secs) as usize;
    left.resize(left.len() + tail_samples, 0.0);
    right.resize(right.len() + tail_samples, 0.0);

    for (l, r) in left
        .chunks_mut(block_size)
        .zip(right.chunks_mut(block_size))
    {
        engine.process(l, r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_val_parses() {
        assert_eq!(parse_key_val("mix=0.5").unwrap(), ("mix".to_string(), 0.5));
        assert!(parse_key_val("mix").is_err());
        assert!(parse_key_val("mix=loud").is_err());
    }

    #[test]
    fn overrides_reject_unknown_names() {
        let engine = CinderEngine::new(48000.0);
        let bad = [("sparkle".to_string(), 1.0)];
        assert!(apply_overrides(&engine, &bad).is_err());

        let good = [("mix".to_string(), 0.9)];
        apply_overrides(&engine, &good).unwrap();
        assert_eq!(engine.params().get(ParamId::Mix), 0.9);
    }

    #[test]
    fn run_engine_appends_tail() {
        let mut engine = CinderEngine::new(48000.0);
        let mut l = vec![1.0; 100];
        let mut r = vec![1.0; 100];
        run_engine(&mut engine, &mut l, &mut r, 64, 0.1);
        assert_eq!(l.len(), 100 + 4800);
        assert_eq!(r.len(), l.len());
    }
}
