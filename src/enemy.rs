//! enemy spawn, patrol & shooting
use bevy::prelude::*;
use rand::Rng;

use crate::animation::{Action, Animation, AnimationTable, EntityKind};
use crate::components::*;
use crate::constants::*;
use crate::physics::{find_ground, has_ground};
use crate::score::Score;
use crate::terrain::TileWorld;

/// how far a spawn point may fall looking for ground
const SPAWN_DROP: f32 = 240.0;

/// Drop one enemy onto the surface of `column`, falling back to the
/// surface row itself when no ground turns up below.
pub fn spawn_enemy(commands: &mut Commands, world: &TileWorld, table: &AnimationTable, column: i32) {
    let ts = world.tile_size();
    let body = Body { size: ENEMY_SIZE };
    let above = world.surface_spawn(column, ENEMY_SIZE.y) - Vec2::new(0.0, 2.0 * ts);
    let pos = find_ground(world, &body, above, SPAWN_DROP).unwrap_or(above);

    commands.spawn((
        Enemy {
            patrol_direction: 1.0,
        },
        Position(pos),
        Velocity::default(),
        body,
        Movement::default(),
        Collisions::default(),
        Facing::default(),
        Animation::new(table, EntityKind::Enemy, Action::Run),
    ));
}

/* ---------- start‑up: drop enemies on the surface ---------- */
pub fn spawn_enemies(mut commands: Commands, world: Res<TileWorld>, table: Res<AnimationTable>) {
    let mut rng = rand::thread_rng();
    let ts = world.tile_size();
    for _ in 0..INITIAL_ENEMIES {
        let column = (rng.gen_range(50.0..500.0_f32) / ts).floor() as i32;
        spawn_enemy(&mut commands, &world, &table, column);
    }
}

/* ---------- waves: more enemies ahead as the score climbs ---------- */
pub fn enemy_wave_system(
    mut commands: Commands,
    mut world: ResMut<TileWorld>,
    table: Res<AnimationTable>,
    mut score: ResMut<Score>,
    player_q: Query<&Position, With<Player>>,
) {
    let Ok(player) = player_q.get_single() else { return };
    if !score.take_wave() {
        return;
    }
    let mut rng = rand::thread_rng();
    let ts = world.tile_size();
    let count = rng.gen_range(WAVE_SIZE);
    for _ in 0..count {
        let x = player.0.x + rng.gen_range(WAVE_DISTANCE);
        let column = (x / ts).floor() as i32;
        // ground has to exist before anything can stand on it
        let spot = world.surface_spawn(column, ENEMY_SIZE.y);
        world.ensure_around(spot);
        spawn_enemy(&mut commands, &world, &table, column);
    }
    info!("wave of {count} enemies at score {:.0}", score.value());
}

/// Next patrol step: maybe turn around, never walk off a ledge.
pub fn patrol_step(world: &TileWorld, body: &Body, pos: Vec2, direction: &mut f32, turn: bool) -> Vec2 {
    if turn {
        *direction = -*direction;
    }
    let step = Vec2::new(*direction * ENEMY_SPEED, 0.0);
    if has_ground(world, body, pos) && !has_ground(world, body, pos + step) {
        *direction = -*direction;
        return Vec2::ZERO;
    }
    step
}

/* ---------- patrol ---------- */
pub fn enemy_patrol_system(
    world: Res<TileWorld>,
    table: Res<AnimationTable>,
    mut q: Query<(&mut Enemy, &mut Movement, &Position, &Body, &mut Animation)>,
) {
    let mut rng = rand::thread_rng();
    for (mut enemy, mut movement, pos, body, mut anim) in &mut q {
        anim.set_action(&table, Action::Run);
        let turn = rng.gen_bool(ENEMY_TURN_CHANCE);
        movement.0 = patrol_step(&world, body, pos.0, &mut enemy.patrol_direction, turn);
    }
}

/* ---------- shooting ---------- */
pub fn enemy_shoot_system(
    mut commands: Commands,
    enemies: Query<(&Position, &Body, &Enemy), Without<Player>>,
    player_q: Query<(&Position, &Body), With<Player>>,
) {
    let Ok((player_pos, player_body)) = player_q.get_single() else { return };
    let target = player_body.rect(player_pos.0).center();
    let mut rng = rand::thread_rng();

    for (pos, body, enemy) in &enemies {
        let muzzle = body.rect(pos.0).center();
        let facing_player = (target.x - muzzle.x) * enemy.patrol_direction > 0.0;
        if facing_player && (target.y - muzzle.y).abs() < body.size.y && rng.gen_bool(ENEMY_SHOOT_CHANCE) {
            commands.spawn((
                Projectile {
                    velocity: Vec2::new(enemy.patrol_direction * PROJECTILE_SPEED, 0.0),
                    age: 0,
                },
                Position(muzzle + Vec2::new(enemy.patrol_direction * body.size.x, 0.0)),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::world::CommandQueue;
    use crate::terrain::tests::test_world;
    use crate::terrain::TilePos;

    #[test]
    fn spawned_enemy_stands_on_the_surface() {
        let world = test_world(42);
        let table = AnimationTable::default();
        let mut ecs = World::new();
        let mut queue = CommandQueue::default();
        let mut commands = Commands::new(&mut queue, &ecs);
        spawn_enemy(&mut commands, &world, &table, 5);
        queue.apply(&mut ecs);

        let mut q = ecs.query::<(&Position, &Body, &Animation)>();
        let (pos, body, anim) = q.single(&ecs);
        assert!(has_ground(&world, body, pos.0));
        assert!(world.solid_at(body.rect(pos.0).center()).is_none());
        assert_eq!(anim.action, Action::Run);
    }

    #[test]
    fn patrol_turns_at_ledges_and_on_request() {
        let world = test_world(42);
        let body = Body { size: ENEMY_SIZE };
        let ts = world.tile_size();

        // mid‑air, nothing to fall off
        let mut dir = 1.0;
        let step = patrol_step(&world, &body, Vec2::new(1.0e6, 0.0), &mut dir, false);
        assert_eq!(step, Vec2::new(ENEMY_SPEED, 0.0));

        let step = patrol_step(&world, &body, Vec2::new(1.0e6, 0.0), &mut dir, true);
        assert_eq!(dir, -1.0);
        assert_eq!(step, Vec2::new(-ENEMY_SPEED, 0.0));

        // one pixel left on top of the wall's upper end, walking right
        let top = TilePos::new(WALL_X, -WALL_HALF_SPAN).to_pixel(ts);
        let perched = Vec2::new(top.x + ts - 1.0, top.y - body.size.y);
        let mut dir = 1.0;
        let step = patrol_step(&world, &body, perched, &mut dir, false);
        assert_eq!(step, Vec2::ZERO);
        assert_eq!(dir, -1.0);
    }
}
