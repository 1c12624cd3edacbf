use std::ops::RangeInclusive;

use bevy::prelude::*;

/// -------- tiles & chunks --------
pub const TILE_SIZE: f32 = 16.0;
pub const CHUNK_SIZE: i32 = 8;

/// chunks kept materialised around the focal point (Chebyshev radius)
pub const STREAM_RADIUS: i32 = 2;
/// block generated at world creation, centred on the origin
pub const INITIAL_RADIUS: i32 = 3;

/// -------- boundary wall --------
pub const WALL_X: i32 = -4;
pub const WALL_HALF_SPAN: i32 = CHUNK_SIZE * 10;

/// -------- terrain shape --------
pub const SURFACE_ROW: i32 = 8;
pub const HEIGHT_SCALE: f64 = 15.0;

/// (frequency, octaves, weight, seed offset) per noise layer
pub const BASE_LAYER: (f64, usize, f64, u32) = (0.1, 4, 1.0, 0);
pub const DETAIL_LAYER: (f64, usize, f64, u32) = (0.05, 2, 0.5, 1);
pub const SECONDARY_LAYER: (f64, usize, f64, u32) = (0.02, 6, 0.3, 2);

/// outcrops only grow under surfaces taller than this
pub const OUTCROP_MIN_HEIGHT: i32 = 4;
pub const OUTCROP_THRESHOLD: f64 = 0.7;

/// upper bound for randomly chosen world seeds
pub const MAX_RANDOM_SEED: u64 = 1_000_000;

/// -------- entity phys (per tick) --------
pub const GRAVITY: f32 = 0.1;
pub const TERMINAL_VELOCITY: f32 = 5.0;
pub const JUMP_SPEED: f32 = 3.0;
pub const WALK_SPEED: f32 = 2.0;
pub const PLAYER_SIZE: Vec2 = Vec2::new(8.0, 15.0);
pub const PLAYER_HEALTH: i32 = 5;

/// -------- enemies --------
pub const ENEMY_SIZE: Vec2 = Vec2::new(8.0, 15.0);
pub const ENEMY_SPEED: f32 = 1.0;
pub const ENEMY_TURN_CHANCE: f64 = 0.01;
pub const ENEMY_SHOOT_CHANCE: f64 = 0.01;
pub const INITIAL_ENEMIES: usize = 5;
/// a wave every this many points
pub const WAVE_EVERY: f32 = 20.0;
pub const WAVE_SIZE: RangeInclusive<usize> = 2..=6;
/// pixels ahead of the player
pub const WAVE_DISTANCE: RangeInclusive<f32> = 200.0..=400.0;

/// -------- score --------
/// pixels walked right per point
pub const SCORE_DISTANCE: f32 = 20.0;

/// -------- projectiles & sparks --------
pub const PROJECTILE_SPEED: f32 = 1.5;
pub const PROJECTILE_MAX_AGE: u32 = 360;
pub const SPARKS_PER_HIT: usize = 4;
pub const SPARK_DECAY: f32 = 0.1;

/// -------- camera --------
pub const CAMERA_EASE: f32 = 1.0 / 15.0;
