//! autotile variants from cardinal‑neighbour patterns
//!
//! A tile looks at its four cardinal neighbours, keeps the ones of its own
//! kind and picks the sprite for that edge/corner shape:
//!
//! ```text
//!  0 ┌   1 ┬   2 ┐
//!  7 ├   8 ┼   3 ┤
//!  6 └   5 ┴   4 ┘
//! ```
use bevy::utils::{HashMap, HashSet};

use crate::terrain::{Tile, TilePos};

/// bits of the neighbour mask (grid space, y‑down)
pub const RIGHT: u8 = 1 << 0;
pub const DOWN: u8 = 1 << 1;
pub const LEFT: u8 = 1 << 2;
pub const UP: u8 = 1 << 3;

pub const CARDINALS: [(i32, i32, u8); 4] = [(1, 0, RIGHT), (0, 1, DOWN), (-1, 0, LEFT), (0, -1, UP)];

/// any pattern the table doesn't name reads as "fully surrounded"
pub const FALLBACK_VARIANT: u8 = 8;

const VARIANTS: [u8; 16] = {
    let mut table = [FALLBACK_VARIANT; 16];
    table[(RIGHT | DOWN) as usize] = 0;
    table[(RIGHT | DOWN | LEFT) as usize] = 1;
    table[(LEFT | DOWN) as usize] = 2;
    table[(LEFT | UP | DOWN) as usize] = 3;
    table[(LEFT | UP) as usize] = 4;
    table[(LEFT | UP | RIGHT) as usize] = 5;
    table[(RIGHT | UP) as usize] = 6;
    table[(RIGHT | UP | DOWN) as usize] = 7;
    table[(RIGHT | DOWN | LEFT | UP) as usize] = 8;
    table
};

#[inline]
pub fn variant_for(mask: u8) -> u8 {
    VARIANTS[(mask & 0b1111) as usize]
}

/// mask from a list of matching offsets; unknown offsets are ignored
pub fn mask_from_offsets(offsets: &[(i32, i32)]) -> u8 {
    offsets.iter().fold(0, |mask, &(dx, dy)| {
        CARDINALS
            .iter()
            .find(|&&(cx, cy, _)| (cx, cy) == (dx, dy))
            .map_or(mask, |&(_, _, bit)| mask | bit)
    })
}

pub fn neighbour_mask(tiles: &HashMap<TilePos, Tile>, tile: &Tile) -> u8 {
    CARDINALS.iter().fold(0, |mask, &(dx, dy, bit)| {
        match tiles.get(&tile.pos.offset(dx, dy)) {
            Some(n) if n.kind == tile.kind => mask | bit,
            _ => mask,
        }
    })
}

/// Recompute variants for `inserted` and every cardinal neighbour of them.
/// Returns the positions whose variant actually changed.
pub fn refresh(
    tiles: &mut HashMap<TilePos, Tile>,
    inserted: impl IntoIterator<Item = TilePos>,
) -> Vec<TilePos> {
    let mut dirty: HashSet<TilePos> = HashSet::default();
    for pos in inserted {
        dirty.insert(pos);
        for &(dx, dy, _) in &CARDINALS {
            dirty.insert(pos.offset(dx, dy));
        }
    }

    let mut updates: Vec<(TilePos, u8)> = dirty
        .into_iter()
        .filter_map(|pos| {
            let tile = tiles.get(&pos)?;
            if !tile.kind.autotiles() {
                return None;
            }
            let variant = variant_for(neighbour_mask(tiles, tile));
            (variant != tile.variant).then_some((pos, variant))
        })
        .collect();
    updates.sort_unstable_by_key(|&(pos, _)| pos);

    for &(pos, variant) in &updates {
        if let Some(tile) = tiles.get_mut(&pos) {
            tile.variant = variant;
        }
    }
    updates.into_iter().map(|(pos, _)| pos).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TileKind;

    fn place(tiles: &mut HashMap<TilePos, Tile>, x: i32, y: i32, kind: TileKind) -> TilePos {
        let pos = TilePos::new(x, y);
        tiles.insert(pos, Tile { kind, variant: 1, pos });
        pos
    }

    #[test]
    fn named_patterns() {
        assert_eq!(variant_for(mask_from_offsets(&[(1, 0), (0, 1)])), 0);
        assert_eq!(variant_for(mask_from_offsets(&[(-1, 0), (1, 0), (0, 1)])), 1);
        assert_eq!(variant_for(mask_from_offsets(&[(-1, 0), (0, 1)])), 2);
        assert_eq!(variant_for(mask_from_offsets(&[(-1, 0), (0, -1), (0, 1)])), 3);
        assert_eq!(variant_for(mask_from_offsets(&[(-1, 0), (0, -1)])), 4);
        assert_eq!(variant_for(mask_from_offsets(&[(-1, 0), (0, -1), (1, 0)])), 5);
        assert_eq!(variant_for(mask_from_offsets(&[(1, 0), (0, -1)])), 6);
        assert_eq!(variant_for(mask_from_offsets(&[(0, -1), (1, 0), (0, 1)])), 7);
        assert_eq!(variant_for(RIGHT | DOWN | LEFT | UP), 8);
    }

    #[test]
    fn unnamed_patterns_fall_back() {
        for mask in [0, RIGHT, UP, LEFT | RIGHT, UP | DOWN] {
            assert_eq!(variant_for(mask), FALLBACK_VARIANT, "mask {mask:#06b}");
        }
        assert_eq!(mask_from_offsets(&[(2, 0), (1, 1)]), 0);
    }

    #[test]
    fn only_same_kind_neighbours_count() {
        let mut tiles = HashMap::default();
        let centre = place(&mut tiles, 0, 0, TileKind::Stone);
        place(&mut tiles, 1, 0, TileKind::Stone);
        place(&mut tiles, 0, 1, TileKind::Stone);
        place(&mut tiles, -1, 0, TileKind::Grass);
        assert_eq!(neighbour_mask(&tiles, &tiles[&centre]), RIGHT | DOWN);
    }

    #[test]
    fn refresh_reaches_existing_neighbours() {
        let mut tiles = HashMap::default();
        // a ledge from an earlier chunk
        let old = place(&mut tiles, 7, 0, TileKind::Grass);
        refresh(&mut tiles, [old]);
        assert_eq!(tiles[&old].variant, FALLBACK_VARIANT);

        // the next chunk adds grass to the right and stone below
        let right = place(&mut tiles, 8, 0, TileKind::Grass);
        let below = place(&mut tiles, 7, 1, TileKind::Grass);
        let changed = refresh(&mut tiles, [right, below]);

        assert_eq!(tiles[&old].variant, 0);
        assert!(changed.contains(&old));
        assert!(changed.contains(&below));
    }

    #[test]
    fn refresh_skips_decor_and_is_stable() {
        let mut tiles = HashMap::default();
        let decor = place(&mut tiles, 0, 0, TileKind::Decor);
        let a = place(&mut tiles, 1, 0, TileKind::Stone);
        refresh(&mut tiles, [decor, a]);
        assert_eq!(tiles[&decor].variant, 1);
        assert!(refresh(&mut tiles, [decor, a]).is_empty());
    }
}
