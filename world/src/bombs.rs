//! Bomb entities, their fuse state machine and the active-bomb sequence.

use std::{collections::VecDeque, time::Duration};

use bombing_adventure_core::{BombId, BombSnapshot, Event, TileCoord};

/// Fuse progress of a bomb. A bomb transitions from armed to exploded once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FuseState {
    Armed { remaining: Duration },
    Exploded,
}

#[derive(Clone, Debug)]
pub(crate) struct Bomb {
    pub(crate) id: BombId,
    pub(crate) tile: TileCoord,
    pub(crate) power: u32,
    fuse: FuseState,
}

impl Bomb {
    fn arm(id: BombId, tile: TileCoord, power: u32, fuse: Duration) -> Self {
        Self {
            id,
            tile,
            power,
            fuse: FuseState::Armed { remaining: fuse },
        }
    }

    /// Burns the fuse and reports whether the bomb exploded during this call.
    fn burn(&mut self, dt: Duration) -> bool {
        match self.fuse {
            FuseState::Armed { remaining } if remaining <= dt => {
                self.fuse = FuseState::Exploded;
                true
            }
            FuseState::Armed { remaining } => {
                self.fuse = FuseState::Armed {
                    remaining: remaining - dt,
                };
                false
            }
            FuseState::Exploded => false,
        }
    }

    pub(crate) fn is_exploded(&self) -> bool {
        self.fuse == FuseState::Exploded
    }

    fn snapshot(&self) -> BombSnapshot {
        let remaining = match self.fuse {
            FuseState::Armed { remaining } => remaining,
            FuseState::Exploded => Duration::ZERO,
        };
        BombSnapshot {
            id: self.id,
            tile: self.tile,
            power: self.power,
            exploded: self.is_exploded(),
            remaining,
        }
    }
}

/// Armed bombs in placement order; the front bomb always explodes first.
#[derive(Clone, Debug)]
pub(crate) struct ActiveBombs {
    queue: VecDeque<Bomb>,
    next_id: u32,
}

impl ActiveBombs {
    pub(crate) fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            next_id: 0,
        }
    }

    pub(crate) fn occupies(&self, tile: TileCoord) -> bool {
        self.queue.iter().any(|bomb| bomb.tile == tile)
    }

    pub(crate) fn arm(&mut self, tile: TileCoord, power: u32, fuse: Duration) -> BombId {
        let id = BombId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.queue.push_back(Bomb::arm(id, tile, power, fuse));
        id
    }

    pub(crate) fn burn_fuses(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for bomb in &mut self.queue {
            if bomb.burn(dt) {
                out_events.push(Event::BombFuseExpired { bomb: bomb.id });
            }
        }
    }

    /// Removes the head bomb when it has exploded.
    ///
    /// Later bombs stay queued even if they exploded too, until every bomb
    /// ahead of them has been drained.
    pub(crate) fn pop_exploded_front(&mut self) -> Option<Bomb> {
        if self.queue.front().is_some_and(Bomb::is_exploded) {
            self.queue.pop_front()
        } else {
            None
        }
    }

    pub(crate) fn snapshots(&self) -> Vec<BombSnapshot> {
        self.queue.iter().map(Bomb::snapshot).collect()
    }
}
