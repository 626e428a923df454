#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wandering behaviour for the level's monsters.

use bombing_adventure_core::{Command, Direction, Event, MonsterSnapshot};
use bombing_adventure_world::CollisionView;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pure system that keeps monsters walking and turns them at obstacles.
#[derive(Debug)]
pub struct Monsters {
    rng: ChaCha8Rng,
    active: bool,
    open: Vec<Direction>,
}

impl Monsters {
    /// Creates a monster controller whose turns are driven by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            active: true,
            open: Vec::with_capacity(Direction::ALL.len()),
        }
    }

    /// Emits a `Command::StepMonster` for every monster ready to move.
    ///
    /// A monster keeps its heading while the next tile is open and otherwise
    /// picks uniformly among the open neighbours. Boxed-in monsters wait.
    pub fn handle(
        &mut self,
        events: &[Event],
        monsters: &[MonsterSnapshot],
        collision: CollisionView<'_>,
        out: &mut Vec<Command>,
    ) {
        let mut ticked = false;
        for event in events {
            match event {
                Event::LevelConfigured { .. } => self.active = true,
                Event::GameOver => self.active = false,
                Event::TimeAdvanced { .. } => ticked = true,
                _ => {}
            }
        }

        if !self.active || !ticked {
            return;
        }

        for monster in monsters.iter().filter(|monster| monster.ready_for_step) {
            if !collision.is_blocked(monster.tile.stepped(monster.heading, 1)) {
                out.push(Command::StepMonster {
                    monster: monster.id,
                    direction: monster.heading,
                });
                continue;
            }

            self.open.clear();
            self.open.extend(
                Direction::ALL
                    .into_iter()
                    .filter(|direction| !collision.is_blocked(monster.tile.stepped(*direction, 1))),
            );
            if self.open.is_empty() {
                continue;
            }

            let direction = self.open[self.rng.gen_range(0..self.open.len())];
            out.push(Command::StepMonster {
                monster: monster.id,
                direction,
            });
        }
    }
}

impl Default for Monsters {
    fn default() -> Self {
        Self::new(0)
    }
}
