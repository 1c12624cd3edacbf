//! run‑time world settings (`world.ron`, overridable from the command line)
use std::path::Path;

use anyhow::Context;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Resource, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// random in `0..=MAX_RANDOM_SEED` when absent
    pub seed: Option<u64>,
    /// seeds the outcrop RNG; absent means outcrops differ between runs
    pub outcrop_seed: Option<u64>,
    pub tile_size: f32,
    pub stream_radius: i32,
    pub initial_radius: i32,
    pub wall_x: i32,
    pub wall_half_span: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            outcrop_seed: None,
            tile_size: TILE_SIZE,
            stream_radius: STREAM_RADIUS,
            initial_radius: INITIAL_RADIUS,
            wall_x: WALL_X,
            wall_half_span: WALL_HALF_SPAN,
        }
    }
}

impl WorldConfig {
    /// Missing file → defaults. A file that exists but doesn't parse is an error.
    /// Values come back as written; [`crate::terrain::TileWorld::new`] repairs
    /// them once logging is up.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let cfg = ron::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        info!("loaded {}", path.display());
        Ok(cfg)
    }

    /// Out‑of‑range numbers fall back to the defaults instead of failing.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            warn!("tile_size {} is unusable, using {}", self.tile_size, defaults.tile_size);
            self.tile_size = defaults.tile_size;
        }
        if self.stream_radius < 0 {
            warn!("negative stream_radius {}, using {}", self.stream_radius, defaults.stream_radius);
            self.stream_radius = defaults.stream_radius;
        }
        if self.initial_radius < 0 {
            warn!("negative initial_radius {}, using {}", self.initial_radius, defaults.initial_radius);
            self.initial_radius = defaults.initial_radius;
        }
        self.wall_half_span = self.wall_half_span.max(0);
        self
    }
}
