//! projectiles, sparks & hits
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::PI;

use crate::animation::{Action, Animation, AnimationTable, EntityKind};
use crate::components::*;
use crate::constants::*;
use crate::terrain::TileWorld;

/// a projectile ran into solid terrain
#[derive(Event, Debug, Clone, Copy)]
pub struct StruckTerrain {
    pub projectile: Entity,
    pub pos: Vec2,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerHit {
    pub health: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileFate {
    Flying,
    StruckTerrain,
    Expired,
}

/// Advance one tick. Terrain is checked before age, so a projectile that
/// hits on its last tick still counts as a hit.
pub fn step_projectile(world: &TileWorld, pos: &mut Vec2, projectile: &mut Projectile) -> ProjectileFate {
    *pos += projectile.velocity;
    projectile.age += 1;
    if world.solid_at(*pos).is_some() {
        ProjectileFate::StruckTerrain
    } else if projectile.age > PROJECTILE_MAX_AGE {
        ProjectileFate::Expired
    } else {
        ProjectileFate::Flying
    }
}

/// sparks fly back the way the projectile came
pub fn spark_burst(rng: &mut impl Rng, velocity: Vec2) -> [Spark; SPARKS_PER_HIT] {
    let back = if velocity.x > 0.0 { PI } else { 0.0 };
    std::array::from_fn(|_| Spark {
        angle: rng.gen::<f32>() - 0.5 + back,
        speed: 2.0 + rng.gen::<f32>(),
    })
}

/// Returns `false` once the spark has burnt out.
pub fn step_spark(pos: &mut Vec2, spark: &mut Spark) -> bool {
    *pos += Vec2::from_angle(spark.angle) * spark.speed;
    spark.speed = (spark.speed - SPARK_DECAY).max(0.0);
    spark.speed > 0.0
}

/* ===========================================================
   projectile_system
   =========================================================== */
pub fn projectile_system(
    mut commands: Commands,
    world: Res<TileWorld>,
    table: Res<AnimationTable>,
    mut projectiles: Query<(Entity, &mut Position, &mut Projectile), Without<Player>>,
    mut player_q: Query<(&Position, &Body, &mut Player)>,
    mut struck: EventWriter<StruckTerrain>,
    mut hits: EventWriter<PlayerHit>,
) {
    let mut rng = rand::thread_rng();
    let mut player = player_q.get_single_mut().ok();

    for (entity, mut pos, mut projectile) in &mut projectiles {
        match step_projectile(&world, &mut pos.0, &mut projectile) {
            ProjectileFate::StruckTerrain => {
                commands.entity(entity).despawn();
                struck.send(StruckTerrain {
                    projectile: entity,
                    pos: pos.0,
                });
                for spark in spark_burst(&mut rng, projectile.velocity) {
                    commands.spawn((spark, Position(pos.0)));
                }
            }
            ProjectileFate::Expired => {
                commands.entity(entity).despawn();
            }
            ProjectileFate::Flying => {
                let Some((player_pos, body, player)) = player.as_mut() else { continue };
                let rect = body.rect(player_pos.0);
                if player.health <= 0 || !rect.contains(pos.0) {
                    continue;
                }
                commands.entity(entity).despawn();
                player.health -= 1;
                hits.send(PlayerHit {
                    health: player.health,
                });
                commands.spawn((
                    Particle::default(),
                    Position(rect.center()),
                    Animation::new(&table, EntityKind::Particle, Action::Idle),
                ));
            }
        }
    }
}

/// Returns `false` once the particle's animation has played out.
pub fn step_particle(pos: &mut Vec2, particle: &Particle, anim: &Animation) -> bool {
    if anim.done {
        return false;
    }
    *pos += particle.velocity;
    true
}

/// runs after `animate_system`, so a finished clip is gone the same tick
pub fn particle_system(mut commands: Commands, mut q: Query<(Entity, &mut Position, &Particle, &Animation)>) {
    for (entity, mut pos, particle, anim) in &mut q {
        if !step_particle(&mut pos.0, particle, anim) {
            commands.entity(entity).despawn();
        }
    }
}

pub fn spark_system(mut commands: Commands, mut q: Query<(Entity, &mut Position, &mut Spark)>) {
    for (entity, mut pos, mut spark) in &mut q {
        if !step_spark(&mut pos.0, &mut spark) {
            commands.entity(entity).despawn();
        }
    }
}
