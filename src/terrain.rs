//! sparse tile world, chunk streaming & the boundary wall
//!
//! Grid space is y‑down: row `+1` is one tile *lower*. Pixel positions use
//! the same orientation; only the sprite layer flips into Bevy's y‑up.
use bevy::prelude::*;
use bevy::utils::{HashMap, HashSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use crate::autotile;
use crate::config::WorldConfig;
use crate::constants::*;
use crate::world_gen::ChunkGenerator;

/// variant every tile carries until the autotiler has seen it
pub const PLACEHOLDER_VARIANT: u8 = 1;

/* ===========================================================
   coordinates
   =========================================================== */
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// cell containing pixel position `p`
    #[inline]
    pub fn from_pixel(p: Vec2, tile_size: f32) -> Self {
        Self {
            x: (p.x / tile_size).floor() as i32,
            y: (p.y / tile_size).floor() as i32,
        }
    }

    /// top‑left corner in pixel space
    #[inline]
    pub fn to_pixel(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    #[inline]
    pub fn chunk(self) -> ChunkPos {
        ChunkPos {
            x: self.x.div_euclid(CHUNK_SIZE),
            y: self.y.div_euclid(CHUNK_SIZE),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn from_pixel(p: Vec2, tile_size: f32) -> Self {
        TilePos::from_pixel(p, tile_size).chunk()
    }

    /// anchor cell (local 0,0)
    #[inline]
    pub fn origin(self) -> TilePos {
        TilePos {
            x: self.x.wrapping_mul(CHUNK_SIZE),
            y: self.y.wrapping_mul(CHUNK_SIZE),
        }
    }

    /// every chunk within Chebyshev distance `radius`, x‑major
    pub fn around(self, radius: i32) -> impl Iterator<Item = ChunkPos> {
        (-radius..=radius).flat_map(move |dx| {
            (-radius..=radius).map(move |dy| ChunkPos::new(self.x + dx, self.y + dy))
        })
    }
}

/* ===========================================================
   tiles
   =========================================================== */
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TileKind {
    Grass,
    Stone,
    Decor,
    LargeDecor,
}

impl TileKind {
    /// blocks movement and projectiles
    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    #[inline]
    pub fn autotiles(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }
}

/// one stored grid cell; `kind` and `pos` never change after insertion
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tile {
    pub kind: TileKind,
    pub variant: u8,
    pub pos: TilePos,
}

/// decoration placed at a free (tile‑unit) position; never solid
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct OffgridTile {
    pub kind: TileKind,
    pub variant: u8,
    pub pos: Vec2,
}

/* ===========================================================
   TileWorld resource
   =========================================================== */
#[derive(Resource)]
pub struct TileWorld {
    tiles: HashMap<TilePos, Tile>,
    offgrid: Vec<OffgridTile>,
    generated: HashSet<ChunkPos>,
    generator: ChunkGenerator,
    outcrop_rng: StdRng,
    seed: u64,
    config: WorldConfig,
    /// Tiles inserted or re‑varianted since the sprite layer last drained
    /// them. `None` until a consumer asks for tracking.
    changed_tiles: Option<VecDeque<TilePos>>,
}

impl TileWorld {
    /// Seeds the world, builds the spawn block and lays the boundary wall.
    pub fn new(config: WorldConfig) -> Self {
        let config = config.sanitized();
        let seed = config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen_range(0..=MAX_RANDOM_SEED));
        if seed > u64::from(u32::MAX) {
            warn!("seed {seed} exceeds the noise range, wrapping");
        }
        info!("Seed: {seed}");

        let outcrop_rng = match config.outcrop_seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let mut world = Self {
            tiles: HashMap::default(),
            offgrid: Vec::new(),
            generated: HashSet::default(),
            generator: ChunkGenerator::new(seed),
            outcrop_rng,
            seed,
            config,
            changed_tiles: None,
        };

        let mut inserted = Vec::new();
        for chunk in ChunkPos::default().around(world.config.initial_radius) {
            inserted.extend(world.materialize(chunk));
        }
        inserted.extend(world.build_wall());
        world.refresh_variants(inserted);

        info!(
            "world ready: {} chunks, {} tiles",
            world.generated.len(),
            world.tiles.len()
        );
        world
    }

    /* ---------- streaming ---------- */

    /// Materialise every missing chunk within the stream radius of `focal`
    /// (pixel space). Returns how many chunks were generated.
    pub fn ensure_around(&mut self, focal: Vec2) -> usize {
        let centre = ChunkPos::from_pixel(focal, self.config.tile_size);
        let missing: Vec<ChunkPos> = centre
            .around(self.config.stream_radius)
            .filter(|c| !self.generated.contains(c))
            .collect();
        if missing.is_empty() {
            return 0;
        }

        let mut inserted = Vec::new();
        for &chunk in &missing {
            inserted.extend(self.materialize(chunk));
        }
        self.refresh_variants(inserted);

        debug!(
            "streamed {} chunks around {:?} (total {})",
            missing.len(),
            centre,
            self.generated.len()
        );
        missing.len()
    }

    /// Generate one chunk and commit it whole. Cells already present (the
    /// wall) are left alone. Returns the newly inserted positions.
    fn materialize(&mut self, chunk: ChunkPos) -> Vec<TilePos> {
        if !self.generated.insert(chunk) {
            return Vec::new();
        }
        let placements = self.generator.generate(chunk, &mut self.outcrop_rng);

        let mut inserted = Vec::with_capacity(placements.len());
        for (pos, kind) in placements {
            if self.tiles.contains_key(&pos) {
                continue;
            }
            self.tiles.insert(
                pos,
                Tile {
                    kind,
                    variant: PLACEHOLDER_VARIANT,
                    pos,
                },
            );
            inserted.push(pos);
        }
        inserted
    }

    /// vertical stone line at `wall_x`, overriding whatever was generated
    fn build_wall(&mut self) -> Vec<TilePos> {
        let span = self.config.wall_half_span;
        (-span..span)
            .map(|y| {
                let pos = TilePos::new(self.config.wall_x, y);
                self.tiles.insert(
                    pos,
                    Tile {
                        kind: TileKind::Stone,
                        variant: PLACEHOLDER_VARIANT,
                        pos,
                    },
                );
                pos
            })
            .collect()
    }

    /// Autotile the new cells and their neighbours, then queue every new or
    /// re‑varianted cell once for the sprite layer.
    fn refresh_variants(&mut self, inserted: Vec<TilePos>) {
        let changed = autotile::refresh(&mut self.tiles, inserted.iter().copied());
        let Some(queue) = self.changed_tiles.as_mut() else { return };
        let mut queued: HashSet<TilePos> = HashSet::default();
        for pos in inserted.into_iter().chain(changed) {
            if queued.insert(pos) {
                queue.push_back(pos);
            }
        }
    }

    /* ---------- change tracking ---------- */

    /// Start queueing new and re‑varianted cells. Everything already in the
    /// index is queued once so a late consumer catches up.
    pub fn track_changes(&mut self) {
        if self.changed_tiles.is_some() {
            return;
        }
        let mut all: Vec<TilePos> = self.tiles.keys().copied().collect();
        all.sort_unstable();
        self.changed_tiles = Some(all.into());
    }

    pub fn drain_changes(&mut self) -> Vec<TilePos> {
        self.changed_tiles
            .as_mut()
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn pending_changes(&self) -> usize {
        self.changed_tiles.as_ref().map_or(0, VecDeque::len)
    }

    /* ---------- decor ---------- */

    pub fn add_decor(&mut self, decor: OffgridTile) {
        self.offgrid.push(decor);
    }

    pub fn decor(&self) -> &[OffgridTile] {
        &self.offgrid
    }

    /* ---------- lookups ---------- */

    #[inline]
    pub fn tile(&self, pos: TilePos) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Everything the renderer draws, as `(kind, variant, top‑left pixel)`:
    /// decor first, grid tiles on top.
    pub fn render_tiles(&self) -> impl Iterator<Item = (TileKind, u8, Vec2)> + '_ {
        let ts = self.config.tile_size;
        self.offgrid
            .iter()
            .map(move |d| (d.kind, d.variant, d.pos * ts))
            .chain(
                self.tiles
                    .values()
                    .map(move |t| (t.kind, t.variant, t.pos.to_pixel(ts))),
            )
    }

    pub fn is_chunk_generated(&self, chunk: ChunkPos) -> bool {
        self.generated.contains(&chunk)
    }

    pub fn chunk_count(&self) -> usize {
        self.generated.len()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generator(&self) -> &ChunkGenerator {
        &self.generator
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.config.tile_size
    }

    /// pixel position resting on the grass surface of column `x`
    pub fn surface_spawn(&self, x: i32, entity_height: f32) -> Vec2 {
        let ts = self.config.tile_size;
        let row = self.generator.surface_row(x);
        Vec2::new(x as f32 * ts, row as f32 * ts - entity_height)
    }
}
