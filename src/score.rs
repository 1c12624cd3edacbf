//! distance score, wave thresholds & the end of a run
use bevy::prelude::*;

use crate::combat::PlayerHit;
use crate::components::{Player, Position};
use crate::constants::*;

/// Points for distance walked right. Walking back never costs points.
#[derive(Resource, Debug, Clone)]
pub struct Score {
    pub distance: f32,
    last_x: Option<f32>,
    next_wave: f32,
}

impl Default for Score {
    fn default() -> Self {
        Self {
            distance: 0.0,
            last_x: None,
            next_wave: WAVE_EVERY,
        }
    }
}

impl Score {
    #[inline]
    pub fn value(&self) -> f32 {
        self.distance
    }

    /// the first call only records where the player stands
    pub fn advance(&mut self, x: f32) {
        if let Some(last) = self.last_x {
            let dx = x - last;
            if dx > 0.0 {
                self.distance += dx / SCORE_DISTANCE;
            }
        }
        self.last_x = Some(x);
    }

    /// `true` at most once per call when the score has reached the next
    /// threshold, which then moves up by [`WAVE_EVERY`].
    pub fn take_wave(&mut self) -> bool {
        if self.value() < self.next_wave {
            return false;
        }
        self.next_wave += WAVE_EVERY;
        true
    }
}

/// the player's health ran out
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerDied {
    pub score: f32,
}

/// Set once the player dies. Input, movement & combat stop while it holds.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameOver(pub bool);

/// run condition for everything that stops at game over
pub fn still_playing(over: Res<GameOver>) -> bool {
    !over.0
}

pub fn score_system(mut score: ResMut<Score>, player_q: Query<&Position, With<Player>>) {
    let Ok(pos) = player_q.get_single() else { return };
    score.advance(pos.0.x);
}

pub fn game_over_system(
    mut hits: EventReader<PlayerHit>,
    mut over: ResMut<GameOver>,
    score: Res<Score>,
    mut died: EventWriter<PlayerDied>,
) {
    for hit in hits.read() {
        if hit.health > 0 || over.0 {
            continue;
        }
        over.0 = true;
        died.send(PlayerDied {
            score: score.value(),
        });
        info!("game over, score {:.0}", score.value());
    }
}
