//! chunk generation: noise height profile → typed tile placements
//!
//! Generation is a pure function of (chunk, seed) for the stone/grass
//! skeleton. Grass outcrops under tall surfaces are rolled from the RNG the
//! caller hands in, so they only repeat if that RNG is seeded.
use rand::Rng;

use crate::constants::*;
use crate::noise_field::{wrap_seed, NoiseField};
use crate::terrain::{ChunkPos, TileKind, TilePos};

#[derive(Debug, Clone)]
struct NoiseLayer {
    field: NoiseField,
    frequency: f64,
    weight: f64,
}

impl NoiseLayer {
    fn new(seed: u32, (frequency, octaves, weight, offset): (f64, usize, f64, u32)) -> Self {
        Self {
            field: NoiseField::new(seed.wrapping_add(offset), octaves),
            frequency,
            weight,
        }
    }

    #[inline]
    fn contribution(&self, x: i32) -> f64 {
        self.field.sample(f64::from(x) * self.frequency) * self.weight
    }
}

#[derive(Debug, Clone)]
pub struct ChunkGenerator {
    seed: u32,
    layers: [NoiseLayer; 3],
}

impl ChunkGenerator {
    pub fn new(seed: u64) -> Self {
        let seed = wrap_seed(seed);
        Self {
            seed,
            layers: [
                NoiseLayer::new(seed, BASE_LAYER),
                NoiseLayer::new(seed, DETAIL_LAYER),
                NoiseLayer::new(seed, SECONDARY_LAYER),
            ],
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// surface height (in tiles, above `SURFACE_ROW`) of global column `x`
    pub fn column_height(&self, x: i32) -> i32 {
        let sum: f64 = self.layers.iter().map(|l| l.contribution(x)).sum();
        (sum * HEIGHT_SCALE).floor() as i32
    }

    /// grid row of the grass surface in column `x`
    #[inline]
    pub fn surface_row(&self, x: i32) -> i32 {
        SURFACE_ROW - self.column_height(x)
    }

    /// Full generation: skeleton plus randomly rolled outcrops.
    pub fn generate<R: Rng + ?Sized>(&self, chunk: ChunkPos, rng: &mut R) -> Vec<(TilePos, TileKind)> {
        self.generate_with(chunk, || rng.gen::<f64>() > OUTCROP_THRESHOLD)
    }

    /// Deterministic part only (no outcrops).
    pub fn generate_skeleton(&self, chunk: ChunkPos) -> Vec<(TilePos, TileKind)> {
        self.generate_with(chunk, || false)
    }

    fn generate_with(
        &self,
        chunk: ChunkPos,
        mut roll_outcrop: impl FnMut() -> bool,
    ) -> Vec<(TilePos, TileKind)> {
        let origin = chunk.origin();
        let heights: Vec<i32> = (0..CHUNK_SIZE)
            .map(|lx| self.column_height(origin.x + lx))
            .collect();

        let mut out = Vec::new();
        for ly in 0..CHUNK_SIZE {
            for (lx, &height) in (0..CHUNK_SIZE).zip(heights.iter()) {
                let pos = TilePos::new(origin.x + lx, origin.y + ly);
                let mut kind = classify(height, pos.y);

                if height > OUTCROP_MIN_HEIGHT
                    && pos.y == SURFACE_ROW - height + 1
                    && roll_outcrop()
                {
                    kind = Some(TileKind::Grass);
                }

                if let Some(kind) = kind {
                    out.push((pos, kind));
                }
            }
        }
        out
    }
}

/// stone below the surface, grass on it, air above
#[inline]
pub fn classify(height: i32, y: i32) -> Option<TileKind> {
    let surface = SURFACE_ROW - height;
    match y.cmp(&surface) {
        std::cmp::Ordering::Greater => Some(TileKind::Stone),
        std::cmp::Ordering::Equal => Some(TileKind::Grass),
        std::cmp::Ordering::Less => None,
    }
}
