use bevy::prelude::*;

use crate::components::{Body, Player, Position};
use crate::constants::CAMERA_EASE;

/// Centre of the view in pixel space (y‑down). Chunk streaming is keyed to
/// this point, not directly to the player.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct Focus(pub Vec2);

/// pixel space (y‑down) → Bevy translation (y‑up)
#[inline]
pub fn to_screen(p: Vec2, z: f32) -> Vec3 {
    Vec3::new(p.x, -p.y, z)
}

/// ease the focus a fraction of the way toward the player's centre
pub fn focus_follow_system(mut focus: ResMut<Focus>, player_q: Query<(&Position, &Body), With<Player>>) {
    let Ok((pos, body)) = player_q.get_single() else { return };
    let target = body.rect(pos.0).center();
    let current = focus.0;
    focus.0 = current + (target - current) * CAMERA_EASE;
}

pub fn setup_camera(mut commands: Commands, focus: Res<Focus>) {
    commands.spawn((Camera2d, Transform::from_translation(to_screen(focus.0, 0.0))));
}

/// NOTE: runs in **PostUpdate** so the view matches this frame's focus.
pub fn camera_follow_system(focus: Res<Focus>, mut cam_q: Query<&mut Transform, With<Camera>>) {
    let Ok(mut cam_tf) = cam_q.get_single_mut() else { return };
    // whole pixels only, so sprites never shimmer
    cam_tf.translation.x = focus.0.x.round();
    cam_tf.translation.y = (-focus.0.y).round();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_eases_toward_the_player() {
        let mut app = App::new();
        app.insert_resource(Focus(Vec2::ZERO))
            .add_systems(Update, focus_follow_system);
        app.world_mut().spawn((
            Player {
                health: 1,
                air_time: 0,
                jumps: 1,
            },
            Position(Vec2::new(146.0, 0.0)),
            Body {
                size: Vec2::new(8.0, 0.0),
            },
        ));
        app.update();
        let focus = app.world().resource::<Focus>().0;
        assert!((focus.x - 10.0).abs() < 1e-4);
        app.update();
        assert!(app.world().resource::<Focus>().0.x > focus.x);
    }
}
