//! animation state: (entity kind, action) → clip, with an idle fallback
use bevy::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EntityKind {
    Player,
    Enemy,
    Particle,
}

impl EntityKind {
    const COUNT: usize = 3;
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    Idle,
    Run,
    Jump,
}

impl Action {
    const COUNT: usize = 3;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AnimationDescriptor {
    pub frames: u32,
    /// ticks each frame stays on screen
    pub frame_duration: u32,
    pub looping: bool,
}

impl AnimationDescriptor {
    pub const fn new(frames: u32, frame_duration: u32, looping: bool) -> Self {
        Self {
            frames,
            frame_duration,
            looping,
        }
    }

    #[inline]
    fn total_ticks(&self) -> u32 {
        (self.frames * self.frame_duration).max(1)
    }
}

/// Dense lookup built once at startup. Every kind must have an `Idle` clip.
#[derive(Resource, Debug, Clone)]
pub struct AnimationTable {
    clips: [[Option<AnimationDescriptor>; Action::COUNT]; EntityKind::COUNT],
}

impl Default for AnimationTable {
    fn default() -> Self {
        use Action::*;
        use EntityKind::*;
        let mut table = Self {
            clips: [[None; Action::COUNT]; EntityKind::COUNT],
        };
        table.set(Player, Idle, AnimationDescriptor::new(4, 6, true));
        table.set(Player, Run, AnimationDescriptor::new(8, 4, true));
        table.set(Player, Jump, AnimationDescriptor::new(1, 5, true));
        table.set(Enemy, Idle, AnimationDescriptor::new(4, 6, true));
        table.set(Enemy, Run, AnimationDescriptor::new(8, 4, true));
        table.set(Particle, Idle, AnimationDescriptor::new(4, 6, false));
        table
    }
}

impl AnimationTable {
    pub fn set(&mut self, kind: EntityKind, action: Action, clip: AnimationDescriptor) {
        self.clips[kind as usize][action as usize] = Some(clip);
    }

    /// The clip for `action`, or the kind's idle clip when it has none.
    /// Returns the action actually resolved.
    pub fn resolve(&self, kind: EntityKind, action: Action) -> (Action, AnimationDescriptor) {
        let row = &self.clips[kind as usize];
        match row[action as usize] {
            Some(clip) => (action, clip),
            None => (
                Action::Idle,
                row[Action::Idle as usize].unwrap_or(AnimationDescriptor::new(1, 5, true)),
            ),
        }
    }
}

/// running clip on an entity
#[derive(Component, Debug, Clone)]
pub struct Animation {
    pub kind: EntityKind,
    pub action: Action,
    pub clip: AnimationDescriptor,
    pub tick: u32,
    pub done: bool,
}

impl Animation {
    pub fn new(table: &AnimationTable, kind: EntityKind, action: Action) -> Self {
        let (action, clip) = table.resolve(kind, action);
        Self {
            kind,
            action,
            clip,
            tick: 0,
            done: false,
        }
    }

    /// switch clips only when the resolved action differs
    pub fn set_action(&mut self, table: &AnimationTable, action: Action) {
        if self.action == table.resolve(self.kind, action).0 {
            return;
        }
        *self = Self::new(table, self.kind, action);
    }

    pub fn advance(&mut self) {
        let total = self.clip.total_ticks();
        if self.clip.looping {
            self.tick = (self.tick + 1) % total;
        } else {
            self.tick = (self.tick + 1).min(total - 1);
            self.done = self.tick >= total - 1;
        }
    }

    #[inline]
    pub fn frame(&self) -> u32 {
        self.tick / self.clip.frame_duration.max(1)
    }
}

pub fn animate_system(mut q: Query<&mut Animation>) {
    for mut anim in &mut q {
        anim.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_clip_falls_back_to_idle() {
        let table = AnimationTable::default();
        let (action, clip) = table.resolve(EntityKind::Enemy, Action::Jump);
        assert_eq!(action, Action::Idle);
        assert_eq!(clip, table.resolve(EntityKind::Enemy, Action::Idle).1);

        // asking again for the missing clip keeps the idle one running
        let mut anim = Animation::new(&table, EntityKind::Enemy, Action::Jump);
        anim.advance();
        anim.set_action(&table, Action::Jump);
        assert_eq!(anim.tick, 1);
    }

    #[test]
    fn set_action_restarts_only_on_change() {
        let table = AnimationTable::default();
        let mut anim = Animation::new(&table, EntityKind::Player, Action::Run);
        for _ in 0..5 {
            anim.advance();
        }
        anim.set_action(&table, Action::Run);
        assert_eq!(anim.tick, 5);
        anim.set_action(&table, Action::Jump);
        assert_eq!((anim.action, anim.tick), (Action::Jump, 0));
    }

    #[test]
    fn looping_wraps_and_one_shot_finishes() {
        let table = AnimationTable::default();
        let mut run = Animation::new(&table, EntityKind::Player, Action::Run);
        for _ in 0..32 {
            run.advance();
        }
        assert_eq!(run.frame(), 0);

        let mut once = Animation {
            clip: AnimationDescriptor::new(3, 2, false),
            ..Animation::new(&table, EntityKind::Player, Action::Idle)
        };
        for _ in 0..10 {
            once.advance();
        }
        assert!(once.done);
        assert_eq!(once.frame(), 2);
    }

    #[test]
    fn particle_clip_plays_once() {
        let table = AnimationTable::default();
        let mut puff = Animation::new(&table, EntityKind::Particle, Action::Run);
        assert_eq!(puff.action, Action::Idle);
        let mut ticks = 0;
        while !puff.done {
            puff.advance();
            ticks += 1;
        }
        assert_eq!(ticks, 23);
        assert_eq!(puff.frame(), 3);
    }
}
