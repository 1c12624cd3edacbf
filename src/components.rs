use bevy::math::Rect;
use bevy::prelude::*;

use crate::terrain::TilePos;

/* ===========================================================
   shared components
   =========================================================== */

/// top‑left corner in pixel space (y‑down)
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Position(pub Vec2);

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity(pub Vec2);

/// axis‑aligned extent of something that collides with tiles
#[derive(Component, Clone, Copy, Debug)]
pub struct Body {
    pub size: Vec2,
}

impl Body {
    #[inline]
    pub fn rect(&self, pos: Vec2) -> Rect {
        Rect::from_corners(pos, pos + self.size)
    }
}

/// intended per‑tick displacement (walk input, patrol)
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Movement(pub Vec2);

/// which sides touched terrain during the last move
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Collisions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Facing {
    pub flip: bool,
}

/* ===========================================================
   player
   =========================================================== */
#[derive(Component, Debug)]
pub struct Player {
    pub health: i32,
    pub air_time: u32,
    pub jumps: u32,
}

/* ===========================================================
   enemies
   =========================================================== */
#[derive(Component, Debug)]
pub struct Enemy {
    pub patrol_direction: f32,
}

/* ===========================================================
   combat
   =========================================================== */
#[derive(Component, Debug)]
pub struct Projectile {
    pub velocity: Vec2,
    pub age: u32,
}

#[derive(Component, Debug)]
pub struct Spark {
    pub angle: f32,
    pub speed: f32,
}

/// one‑shot puff; lives as long as its animation. Position is its centre.
#[derive(Component, Debug, Default)]
pub struct Particle {
    pub velocity: Vec2,
}

/* ===========================================================
   terrain helper components
   =========================================================== */
#[derive(Component)]
pub struct TileSprite {
    pub pos: TilePos,
}
