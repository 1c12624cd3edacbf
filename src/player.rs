//! player spawn, input & on‑ground state
use bevy::input::ButtonInput;
use bevy::prelude::*;

use crate::animation::{Action, Animation, AnimationTable, EntityKind};
use crate::components::*;
use crate::constants::*;
use crate::terrain::TileWorld;

/// ticks in the air before the jump clip kicks in
const AIRBORNE_TICKS: u32 = 4;

/* ===========================================================
   startup
   =========================================================== */
pub fn spawn_player(mut commands: Commands, world: Res<TileWorld>, table: Res<AnimationTable>) {
    let spawn = world.surface_spawn(3, PLAYER_SIZE.y);
    info!("player spawns at {spawn:?}");
    commands.spawn((
        Player {
            health: PLAYER_HEALTH,
            air_time: 0,
            jumps: 1,
        },
        Position(spawn),
        Velocity::default(),
        Body { size: PLAYER_SIZE },
        Movement::default(),
        Collisions::default(),
        Facing::default(),
        Animation::new(&table, EntityKind::Player, Action::Idle),
    ));
}

/* ===========================================================
   input (A / D / Space)
   =========================================================== */
pub fn player_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut q: Query<(&mut Movement, &mut Velocity, &mut Player)>,
) {
    let Ok((mut movement, mut vel, mut player)) = q.get_single_mut() else { return };

    movement.0.x = match (keys.pressed(KeyCode::KeyA), keys.pressed(KeyCode::KeyD)) {
        (_, true) => WALK_SPEED,
        (true, false) => -WALK_SPEED,
        _ => 0.0,
    };
    if keys.just_pressed(KeyCode::Space) {
        jump(&mut player, &mut vel);
    }
}

/// Returns whether a jump actually happened.
pub fn jump(player: &mut Player, vel: &mut Velocity) -> bool {
    if player.jumps == 0 {
        return false;
    }
    vel.0.y = -JUMP_SPEED;
    player.jumps -= 1;
    player.air_time = AIRBORNE_TICKS + 1;
    true
}

/* ===========================================================
   post‑physics: landing resets jumps, picks the clip
   =========================================================== */
pub fn player_state_system(
    table: Res<AnimationTable>,
    mut q: Query<(&mut Player, &Collisions, &Movement, &mut Animation)>,
) {
    for (mut player, hit, movement, mut anim) in &mut q {
        player.air_time += 1;
        if hit.down {
            player.air_time = 0;
            player.jumps = 1;
        }

        let action = if player.air_time > AIRBORNE_TICKS {
            Action::Jump
        } else if movement.0.x != 0.0 {
            Action::Run
        } else {
            Action::Idle
        };
        anim.set_action(&table, action);
    }
}
