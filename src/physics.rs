//! per‑axis move‑then‑resolve against terrain rects
use bevy::prelude::*;

use crate::components::*;
use crate::constants::*;
use crate::terrain::TileWorld;

/// Move `pos` by `frame` one axis at a time, pushing out of any solid tile
/// overlapping the body. Touching edges is not a collision.
pub fn move_and_collide(world: &TileWorld, body: &Body, pos: &mut Vec2, frame: Vec2) -> Collisions {
    let mut hit = Collisions::default();

    pos.x += frame.x;
    for tile in world.physics_rects_for(*pos, body.size) {
        let rect = body.rect(*pos);
        if rect.intersect(tile).is_empty() {
            continue;
        }
        if frame.x > 0.0 {
            hit.right = true;
            pos.x = tile.min.x - body.size.x;
        } else if frame.x < 0.0 {
            hit.left = true;
            pos.x = tile.max.x;
        }
    }

    pos.y += frame.y;
    for tile in world.physics_rects_for(*pos, body.size) {
        let rect = body.rect(*pos);
        if rect.intersect(tile).is_empty() {
            continue;
        }
        if frame.y > 0.0 {
            hit.down = true;
            pos.y = tile.min.y - body.size.y;
        } else if frame.y < 0.0 {
            hit.up = true;
            pos.y = tile.max.y;
        }
    }
    hit
}

/// a one‑pixel strip under the feet overlaps solid ground
pub fn has_ground(world: &TileWorld, body: &Body, pos: Vec2) -> bool {
    let feet = Rect::from_corners(
        Vec2::new(pos.x, pos.y + body.size.y),
        Vec2::new(pos.x + body.size.x, pos.y + body.size.y + 1.0),
    );
    let ts = world.tile_size();
    [pos, pos + Vec2::new(body.size.x, body.size.y)]
        .into_iter()
        .flat_map(|corner| world.tiles_near(corner))
        .filter(|t| t.kind.is_solid())
        .any(|t| !feet.intersect(crate::collision::tile_rect(t.pos, ts)).is_empty())
}

/// Drop a body from `pos` in whole‑tile steps until it rests on ground.
pub fn find_ground(world: &TileWorld, body: &Body, pos: Vec2, max_drop: f32) -> Option<Vec2> {
    let ts = world.tile_size();
    let mut cursor = pos;
    while cursor.y - pos.y <= max_drop {
        if world.solid_at(cursor + body.size * 0.5).is_none() {
            // snap feet onto the row below if it's ground
            let cell_bottom = ((cursor.y + body.size.y) / ts).floor() * ts;
            let snapped = Vec2::new(cursor.x, cell_bottom + ts - body.size.y);
            if has_ground(world, body, snapped) {
                return Some(snapped);
            }
        }
        cursor.y += ts;
    }
    None
}

/* ===========================================================
   physics_system – gravity, move, resolve
   =========================================================== */
pub fn physics_system(
    world: Res<TileWorld>,
    mut q: Query<(
        &mut Position,
        &mut Velocity,
        &mut Collisions,
        &Body,
        Option<&Movement>,
        Option<&mut Facing>,
    )>,
) {
    for (mut pos, mut vel, mut hit, body, movement, facing) in &mut q {
        let input = movement.map_or(Vec2::ZERO, |m| m.0);
        let frame = input + vel.0;

        *hit = move_and_collide(&world, body, &mut pos.0, frame);

        if let Some(mut facing) = facing {
            if input.x > 0.0 {
                facing.flip = false;
            } else if input.x < 0.0 {
                facing.flip = true;
            }
        }

        vel.0.y = (vel.0.y + GRAVITY).min(TERMINAL_VELOCITY);
        if hit.down || hit.up {
            vel.0.y = 0.0;
        }
    }
}
