//! Infinite side‑scrolling noise terrain.
//!
//! [`WorldPlugin`] holds everything that runs without a window (terrain
//! streaming, physics, enemies, combat) and is what tests drive through
//! `MinimalPlugins`. [`GamePlugin`] layers input, sprites and the camera
//! on top.

pub mod animation;
pub mod autotile;
pub mod camera;
pub mod collision;
pub mod combat;
pub mod components;
pub mod config;
pub mod constants;
pub mod enemy;
pub mod noise_field;
pub mod physics;
pub mod player;
pub mod score;
pub mod terrain;
pub mod tile_stream;
pub mod world_gen;

use bevy::prelude::*;

use animation::{animate_system, AnimationTable};
use camera::{camera_follow_system, focus_follow_system, setup_camera, Focus};
use combat::{particle_system, projectile_system, spark_system, PlayerHit, StruckTerrain};
use config::WorldConfig;
use enemy::{enemy_patrol_system, enemy_shoot_system, enemy_wave_system, spawn_enemies};
use physics::physics_system;
use player::{player_input_system, player_state_system, spawn_player};
use score::{game_over_system, score_system, still_playing, GameOver, PlayerDied, Score};
use terrain::TileWorld;
use tile_stream::{
    attach_actor_sprites_system, redraw_changed_tiles_system, stream_chunks_system,
    sync_actor_transforms_system, track_tile_changes_system, TileSheets, TileSprites,
};

/// Per‑frame phases, run in this order. `Input`, `Move` & `Combat` stop
/// at game over.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    Stream,
    Input,
    Move,
    Combat,
    Present,
}

/// Terrain, actors & rules. Needs no window.
#[derive(Default)]
pub struct WorldPlugin {
    pub config: WorldConfig,
}

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        let world = TileWorld::new(self.config.clone());
        let focus = Focus(world.surface_spawn(0, 0.0));

        app.insert_resource(world)
            .insert_resource(focus)
            .init_resource::<AnimationTable>()
            .init_resource::<Score>()
            .init_resource::<GameOver>()
            .add_event::<StruckTerrain>()
            .add_event::<PlayerHit>()
            .add_event::<PlayerDied>()
            .configure_sets(
                Update,
                (
                    TickSet::Stream,
                    TickSet::Input,
                    TickSet::Move,
                    TickSet::Combat,
                    TickSet::Present,
                )
                    .chain(),
            )
            .configure_sets(Update, TickSet::Input.run_if(still_playing))
            .configure_sets(Update, TickSet::Move.run_if(still_playing))
            .configure_sets(Update, TickSet::Combat.run_if(still_playing))
            .add_systems(Startup, (spawn_player, spawn_enemies))
            .add_systems(
                Update,
                (focus_follow_system, stream_chunks_system)
                    .chain()
                    .in_set(TickSet::Stream),
            )
            .add_systems(
                Update,
                (enemy_patrol_system, physics_system, player_state_system)
                    .chain()
                    .in_set(TickSet::Move),
            )
            .add_systems(
                Update,
                (
                    enemy_shoot_system,
                    projectile_system,
                    game_over_system,
                    score_system,
                    enemy_wave_system,
                    spark_system,
                )
                    .chain()
                    .in_set(TickSet::Combat),
            )
            .add_systems(
                Update,
                (animate_system, particle_system)
                    .chain()
                    .in_set(TickSet::Present),
            );
    }
}

/// [`WorldPlugin`] plus keyboard input, sprites & camera.
#[derive(Default)]
pub struct GamePlugin {
    pub config: WorldConfig,
}

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(WorldPlugin {
            config: self.config.clone(),
        })
        .init_resource::<TileSheets>()
        .init_resource::<TileSprites>()
        .add_systems(Startup, (setup_camera, track_tile_changes_system))
        .add_systems(Update, player_input_system.in_set(TickSet::Input))
        .add_systems(
            Update,
            (
                redraw_changed_tiles_system,
                attach_actor_sprites_system,
                sync_actor_transforms_system,
            )
                .chain()
                .in_set(TickSet::Present),
        )
        .add_systems(PostUpdate, camera_follow_system);
    }
}
