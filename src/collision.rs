//! tile queries used by movement and combat
//!
//! Pixel space is y‑down. A position in a chunk that was never streamed in
//! simply has no tiles: every query here reports absence, never fails.
use bevy::math::Rect;
use bevy::prelude::*;

use crate::terrain::{Tile, TilePos, TileWorld};

/// 3×3 neighbourhood, centre included
pub const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (0, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Ring radius that keeps an entity of `size` pixels inside the searched
/// neighbourhood; 1 for anything up to one tile.
#[inline]
pub fn ring_for_extent(size: Vec2, tile_size: f32) -> i32 {
    let largest = size.x.max(size.y).max(0.0);
    ((largest / tile_size).ceil() as i32).max(1)
}

#[inline]
pub fn tile_rect(pos: TilePos, tile_size: f32) -> Rect {
    let min = pos.to_pixel(tile_size);
    Rect::from_corners(min, min + Vec2::splat(tile_size))
}

impl TileWorld {
    /// stored tiles in the 3×3 cells around the cell containing `p`
    pub fn tiles_near(&self, p: Vec2) -> Vec<&Tile> {
        let centre = TilePos::from_pixel(p, self.tile_size());
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| self.tile(centre.offset(dx, dy)))
            .collect()
    }

    /// like [`tiles_near`](Self::tiles_near) but `ring` cells out in every direction
    pub fn tiles_within(&self, p: Vec2, ring: i32) -> Vec<&Tile> {
        if ring <= 1 {
            return self.tiles_near(p);
        }
        let centre = TilePos::from_pixel(p, self.tile_size());
        (-ring..=ring)
            .flat_map(|dy| (-ring..=ring).map(move |dx| (dx, dy)))
            .filter_map(|(dx, dy)| self.tile(centre.offset(dx, dy)))
            .collect()
    }

    /// the tile under `p`, if it is solid
    #[inline]
    pub fn solid_at(&self, p: Vec2) -> Option<&Tile> {
        self.tile(TilePos::from_pixel(p, self.tile_size()))
            .filter(|t| t.kind.is_solid())
    }

    /// candidate obstacles for a sub‑tile entity at `p`
    pub fn physics_rects_near(&self, p: Vec2) -> Vec<Rect> {
        let ts = self.tile_size();
        self.tiles_near(p)
            .into_iter()
            .filter(|t| t.kind.is_solid())
            .map(|t| tile_rect(t.pos, ts))
            .collect()
    }

    /// candidate obstacles for an entity of any size anchored at `p`
    pub fn physics_rects_for(&self, p: Vec2, size: Vec2) -> Vec<Rect> {
        let ts = self.tile_size();
        self.tiles_within(p, ring_for_extent(size, ts))
            .into_iter()
            .filter(|t| t.kind.is_solid())
            .map(|t| tile_rect(t.pos, ts))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TILE_SIZE;
    use crate::terrain::tests::test_world;
    use crate::terrain::TileKind;

    #[test]
    fn solid_at_agrees_with_the_index() {
        let world = test_world(42);
        for y in -24..32 {
            for x in -24..32 {
                let pos = TilePos::new(x, y);
                let centre = pos.to_pixel(TILE_SIZE) + Vec2::splat(TILE_SIZE * 0.5);
                match world.tile(pos) {
                    Some(t) if t.kind.is_solid() => {
                        assert_eq!(world.solid_at(pos.to_pixel(TILE_SIZE)), Some(t));
                        assert_eq!(world.solid_at(centre), Some(t));
                    }
                    _ => assert!(world.solid_at(centre).is_none()),
                }
            }
        }
    }

    #[test]
    fn ungenerated_space_is_empty() {
        let world = test_world(42);
        let far = Vec2::new(1.0e6, 1.0e6);
        assert!(world.solid_at(far).is_none());
        assert!(world.tiles_near(far).is_empty());
        assert!(world.physics_rects_near(far).is_empty());
    }

    #[test]
    fn neighbourhood_is_three_by_three() {
        let world = test_world(42);
        // deep inside the wall column: at most 3 rows of wall, plus terrain
        let p = TilePos::new(-4, 0).to_pixel(TILE_SIZE) + Vec2::splat(4.0);
        let near = world.tiles_near(p);
        assert!(near.len() <= 9);
        for t in &near {
            assert!((t.pos.x + 4).abs() <= 1 && t.pos.y.abs() <= 1);
        }
        assert_eq!(near.iter().filter(|t| t.pos.x == -4).count(), 3);
    }

    #[test]
    fn rects_are_tile_sized_and_solid_only() {
        let mut world = test_world(42);
        world.add_decor(crate::terrain::OffgridTile {
            kind: TileKind::Decor,
            variant: 0,
            pos: Vec2::new(-4.0, 0.0),
        });
        let p = TilePos::new(-4, 0).to_pixel(TILE_SIZE);
        let rects = world.physics_rects_near(p);
        assert!(rects.len() >= 3);
        for r in &rects {
            assert_eq!(r.size(), Vec2::splat(TILE_SIZE));
        }
        assert!(rects.contains(&tile_rect(TilePos::new(-4, -1), TILE_SIZE)));
    }

    #[test]
    fn ring_scales_with_entity_size() {
        assert_eq!(ring_for_extent(Vec2::new(8.0, 15.0), 16.0), 1);
        assert_eq!(ring_for_extent(Vec2::new(8.0, 40.0), 16.0), 3);
        assert_eq!(ring_for_extent(Vec2::ZERO, 16.0), 1);

        let world = test_world(42);
        let p = TilePos::new(-4, 0).to_pixel(TILE_SIZE);
        let tall = world.physics_rects_for(p, Vec2::new(8.0, 40.0));
        assert!(tall.len() >= world.physics_rects_near(p).len());
        assert!(tall.contains(&tile_rect(TilePos::new(-4, 3), TILE_SIZE)));
    }
}
