#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns resolved blasts and monster contact into kills.

use bombing_adventure_core::{
    Command, DeathCause, Event, MonsterId, MonsterSnapshot, PlayerSnapshot,
};

/// Damage system that queues kill commands for entities caught by blasts or monsters.
#[derive(Debug, Default)]
pub struct Damage {
    killed_monsters: Vec<MonsterId>,
    scratch: Vec<Command>,
}

impl Damage {
    /// Creates a new damage system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits kill commands for every blast footprint in `events`, then for contact.
    ///
    /// The player is killed at most once per call. Monsters killed by a blast
    /// do not also count as touching the player.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        monsters: &[MonsterSnapshot],
        out: &mut Vec<Command>,
    ) {
        self.scratch.clear();
        self.killed_monsters.clear();
        let mut player_alive = player.alive;

        for event in events {
            let Event::BlastResolved {
                bomb, footprint, ..
            } = event
            else {
                continue;
            };

            if player_alive && footprint.contains(player.tile) {
                player_alive = false;
                self.scratch.push(Command::KillPlayer {
                    cause: DeathCause::Blast { bomb: *bomb },
                });
            }

            for monster in monsters {
                if footprint.contains(monster.tile) && !self.killed_monsters.contains(&monster.id) {
                    self.killed_monsters.push(monster.id);
                    self.scratch.push(Command::KillMonster {
                        monster: monster.id,
                    });
                }
            }
        }

        if player_alive {
            let toucher = monsters.iter().find(|monster| {
                monster.tile == player.tile && !self.killed_monsters.contains(&monster.id)
            });
            if let Some(monster) = toucher {
                self.scratch.push(Command::KillPlayer {
                    cause: DeathCause::MonsterContact {
                        monster: monster.id,
                    },
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
