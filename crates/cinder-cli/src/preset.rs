//! Preset file format.
//!
//! Presets are TOML files with a routing choice and a flat parameter table:
//!
//! ```toml
//! name = "cathedral"
//! description = "Long shimmer tail, light fold"
//! routing = "prepost"
//!
//! [params]
//! decay = 8.0
//! shimmer = 0.7
//! mix = 0.4
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, bail};
use cinder_engine::{CinderEngine, ParamId, RoutingMode};
use serde::Deserialize;

/// A named parameter set loadable from TOML.
#[derive(Debug, Deserialize)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Routing topology: "simple", "prepost", or "driveburn".
    #[serde(default)]
    pub routing: Option<String>,
    /// Parameter values by string id.
    #[serde(default)]
    pub params: HashMap<String, f32>,
}

impl Preset {
    /// Load a preset from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading preset {}", path.display()))?;
        let preset: Preset = toml::from_str(&content)
            .with_context(|| format!("parsing preset {}", path.display()))?;
        preset.validate()?;
        Ok(preset)
    }

    /// Push routing and parameter values into an engine.
    pub fn apply(&self, engine: &mut CinderEngine) -> anyhow::Result<()> {
        if let Some(routing) = &self.routing {
            engine.set_routing(parse_routing(routing)?);
        }
        let store = engine.params();
        for (key, &value) in &self.params {
            match ParamId::from_string_id(key) {
                Some(id) => store.set(id, value),
                None => bail!("unknown parameter '{key}' in preset '{}'", self.name),
            }
        }
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if let Some(routing) = &self.routing {
            parse_routing(routing)?;
        }
        for key in self.params.keys() {
            if ParamId::from_string_id(key).is_none() {
                bail!("unknown parameter '{key}' in preset '{}'", self.name);
            }
        }
        Ok(())
    }
}

/// Map a routing name to a [`RoutingMode`].
pub fn parse_routing(name: &str) -> anyhow::Result<RoutingMode> {
    match name.to_ascii_lowercase().as_str() {
        "simple" => Ok(RoutingMode::Simple),
        "prepost" | "pre-post" => Ok(RoutingMode::PrePost),
        "driveburn" | "drive-burn" => Ok(RoutingMode::DriveBurn),
        other => bail!("unknown routing '{other}' (expected simple, prepost, or driveburn)"),
    }
}
