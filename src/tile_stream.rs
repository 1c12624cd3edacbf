//! run‑time sprite streaming for tiles & actors
//!
//! The world only records *which* tiles changed; this module turns those
//! records into sprites, looking colours up in an explicit [`TileSheets`]
//! table instead of any global asset registry.
use bevy::prelude::*;
use bevy::utils::HashMap;

use crate::camera::to_screen;
use crate::components::*;
use crate::terrain::{TileKind, TilePos, TileWorld};

/* ===========================================================
   sprite tables
   =========================================================== */

/// per‑kind variant list; `variant` indexes into it
#[derive(Resource, Debug, Clone)]
pub struct TileSheets {
    sheets: HashMap<TileKind, Vec<Color>>,
}

/// variant `i` of a base colour: edges lighter, centre darker
fn shade_variants(base: Vec3) -> Vec<Color> {
    (0..9)
        .map(|i| {
            let factor = if i == 8 { 0.85 } else { 1.0 + 0.04 * (i % 3) as f32 };
            let c = base * factor;
            Color::srgb(c.x.clamp(0.0, 1.0), c.y.clamp(0.0, 1.0), c.z.clamp(0.0, 1.0))
        })
        .collect()
}

impl Default for TileSheets {
    fn default() -> Self {
        let mut sheets = HashMap::default();
        sheets.insert(TileKind::Grass, shade_variants(Vec3::new(0.13, 0.70, 0.08)));
        sheets.insert(TileKind::Stone, shade_variants(Vec3::new(0.50, 0.50, 0.50)));
        sheets.insert(TileKind::Decor, shade_variants(Vec3::new(0.80, 0.60, 0.30)));
        sheets.insert(TileKind::LargeDecor, shade_variants(Vec3::new(0.30, 0.45, 0.20)));
        Self { sheets }
    }
}

impl TileSheets {
    /// out‑of‑range variants clamp to the last entry; unknown kinds draw magenta
    pub fn color(&self, kind: TileKind, variant: u8) -> Color {
        self.sheets
            .get(&kind)
            .and_then(|list| list.get(variant as usize).or(list.last()))
            .copied()
            .unwrap_or(Color::srgb(1.0, 0.0, 1.0))
    }
}

/// sprite entity per grid cell, plus how much decor has been drawn
#[derive(Resource, Default)]
pub struct TileSprites {
    by_pos: HashMap<TilePos, Entity>,
    decor_drawn: usize,
}

#[inline]
fn tile_translation(pos: TilePos, tile_size: f32, z: f32) -> Vec3 {
    to_screen(pos.to_pixel(tile_size) + Vec2::splat(tile_size * 0.5), z)
}

/* ===========================================================
   stream_chunks_system – keep the world filled around the focus
   =========================================================== */
pub fn stream_chunks_system(focus: Res<crate::camera::Focus>, mut world: ResMut<TileWorld>) {
    world.ensure_around(focus.0);
}

/// the sprite layer is the one consumer of tile changes
pub fn track_tile_changes_system(mut world: ResMut<TileWorld>) {
    world.track_changes();
}

/* ===========================================================
   redraw_changed_tiles_system – spawn / recolour
   =========================================================== */
pub fn redraw_changed_tiles_system(
    mut commands: Commands,
    mut world: ResMut<TileWorld>,
    sheets: Res<TileSheets>,
    mut sprites: ResMut<TileSprites>,
    mut existing: Query<&mut Sprite, With<TileSprite>>,
) {
    let ts = world.tile_size();

    /* decor first so grid tiles draw over it --------------------------- */
    let new_decor: Vec<_> = world.decor()[sprites.decor_drawn..].to_vec();
    for decor in &new_decor {
        commands.spawn((
            Sprite {
                color: sheets.color(decor.kind, decor.variant),
                custom_size: Some(Vec2::splat(ts)),
                ..default()
            },
            Transform::from_translation(to_screen(decor.pos * ts + Vec2::splat(ts * 0.5), -1.0)),
        ));
    }
    sprites.decor_drawn += new_decor.len();

    /* grid tiles -------------------------------------------------------- */
    for pos in world.drain_changes() {
        let Some(tile) = world.tile(pos) else { continue };
        let color = sheets.color(tile.kind, tile.variant);

        // a cell queued twice before its sprite exists was spawned with its latest colour
        if let Some(&entity) = sprites.by_pos.get(&pos) {
            if let Ok(mut sprite) = existing.get_mut(entity) {
                sprite.color = color;
            }
            continue;
        }
        let entity = commands
            .spawn((
                Sprite {
                    color,
                    custom_size: Some(Vec2::splat(ts)),
                    ..default()
                },
                Transform::from_translation(tile_translation(pos, ts, 0.0)),
                TileSprite { pos },
            ))
            .id();
        sprites.by_pos.insert(pos, entity);
    }
}

/* ===========================================================
   actors – attach sprites once, follow Position every frame
   =========================================================== */
pub fn attach_actor_sprites_system(
    mut commands: Commands,
    players: Query<(Entity, &Body), Added<Player>>,
    enemies: Query<(Entity, &Body), Added<Enemy>>,
    projectiles: Query<Entity, Added<Projectile>>,
    sparks: Query<Entity, Added<Spark>>,
    particles: Query<Entity, Added<Particle>>,
) {
    let sized = |size: Vec2, color: Color| Sprite {
        color,
        custom_size: Some(size),
        ..default()
    };
    for (e, body) in &players {
        commands
            .entity(e)
            .insert((sized(body.size, Color::srgb(0.95, 0.85, 0.3)), Transform::default()));
    }
    for (e, body) in &enemies {
        commands
            .entity(e)
            .insert((sized(body.size, Color::srgb(0.8, 0.2, 0.2)), Transform::default()));
    }
    for e in &projectiles {
        commands
            .entity(e)
            .insert((sized(Vec2::new(5.0, 2.0), Color::WHITE), Transform::default()));
    }
    for e in &sparks {
        commands
            .entity(e)
            .insert((sized(Vec2::splat(2.0), Color::srgb(1.0, 0.9, 0.6)), Transform::default()));
    }
    for e in &particles {
        commands
            .entity(e)
            .insert((sized(Vec2::splat(6.0), Color::srgba(1.0, 1.0, 1.0, 0.8)), Transform::default()));
    }
}

pub fn sync_actor_transforms_system(
    mut q: Query<(&Position, Option<&Body>, Option<&Facing>, &mut Transform)>,
) {
    for (pos, body, facing, mut tf) in &mut q {
        let centre = body.map_or(pos.0, |b| b.rect(pos.0).center());
        tf.translation = to_screen(centre, 10.0);
        if let Some(facing) = facing {
            tf.scale.x = if facing.flip { -1.0 } else { 1.0 };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Focus;
    use crate::constants::TILE_SIZE;
    use crate::terrain::tests::test_world;

    #[test]
    fn sheet_lookup_clamps_variants() {
        let sheets = TileSheets::default();
        assert_eq!(sheets.color(TileKind::Stone, 200), sheets.color(TileKind::Stone, 8));
        assert_ne!(sheets.color(TileKind::Stone, 0), sheets.color(TileKind::Grass, 0));
    }

    #[test]
    fn sprites_stream_in_once_per_tile() {
        let mut app = App::new();
        app.insert_resource(test_world(11))
            .insert_resource(Focus(Vec2::ZERO))
            .init_resource::<TileSheets>()
            .init_resource::<TileSprites>()
            .add_systems(Startup, track_tile_changes_system)
            .add_systems(Update, (stream_chunks_system, redraw_changed_tiles_system).chain());

        app.update();
        let tiles = app.world().resource::<TileWorld>().tile_count();
        let mut q = app.world_mut().query::<&TileSprite>();
        assert_eq!(q.iter(app.world()).count(), tiles);

        app.update();
        let mut q = app.world_mut().query::<&TileSprite>();
        assert_eq!(q.iter(app.world()).count(), tiles);

        // walk the focus far away: new chunks, new sprites, nothing duplicated
        app.world_mut().resource_mut::<Focus>().0 = Vec2::new(5000.0, 0.0);
        app.update();
        let tiles = app.world().resource::<TileWorld>().tile_count();
        let mut q = app.world_mut().query::<&TileSprite>();
        assert_eq!(q.iter(app.world()).count(), tiles);
        assert_eq!(app.world().resource::<TileWorld>().pending_changes(), 0);
    }

    #[test]
    fn tile_sprites_sit_on_their_cell_centre() {
        assert_eq!(
            tile_translation(TilePos::new(1, 2), TILE_SIZE, 0.0),
            Vec3::new(24.0, -40.0, 0.0)
        );
    }
}
