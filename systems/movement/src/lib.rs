#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that validates the player's intended steps.

use std::time::Duration;

use bombing_adventure_core::{
    Command, Event, MovementIntent, PixelPosition, PlayerSnapshot, SpriteSize,
};
use bombing_adventure_world::CollisionView;

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug)]
pub struct Movement {
    active: bool,
}

impl Movement {
    /// Consumes world events and immutable views to emit movement commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        collision: CollisionView<'_>,
        out: &mut Vec<Command>,
    ) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::LevelConfigured { .. } => self.active = true,
                Event::GameOver => self.active = false,
                Event::TimeAdvanced { dt } => elapsed += *dt,
                _ => {}
            }
        }

        if !self.active || !player.alive || player.intent.is_idle() || elapsed.is_zero() {
            return;
        }

        let candidate = candidate_position(player, elapsed);
        if accepts_move(
            player.position,
            candidate,
            player.intent,
            player.size,
            collision,
        ) {
            out.push(Command::MovePlayer { to: candidate });
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self { active: true }
    }
}

/// Position the player would reach by following its intent for `dt`.
#[must_use]
pub fn candidate_position(player: &PlayerSnapshot, dt: Duration) -> PixelPosition {
    let distance = player.speed * dt.as_secs_f32();
    player.position.translated(
        player.intent.horizontal.sign() * distance,
        player.intent.vertical.sign() * distance,
    )
}

/// Validates a candidate position with a lower and a top probe.
///
/// The lower probe sits half a sprite below the candidate, the top probe on
/// it; both lean a third of the sprite width towards the horizontal intent.
/// Bombs block the top probe only outside the player's current tile.
#[must_use]
pub fn accepts_move(
    current: PixelPosition,
    candidate: PixelPosition,
    intent: MovementIntent,
    size: SpriteSize,
    collision: CollisionView<'_>,
) -> bool {
    let lean = intent.horizontal.sign() * size.width / 3.0;
    let top = candidate.translated(lean, 0.0);
    let lower = candidate.translated(lean, -size.height / 2.0);

    let solid = |probe: PixelPosition| {
        if collision.is_out_of_bounds(probe) {
            return true;
        }
        let tile = collision.tile_from_position(probe);
        collision.is_wall(tile) || collision.is_brick(tile)
    };
    if solid(lower) || solid(top) {
        return false;
    }

    let current_tile = collision.tile_from_position(current);
    let top_tile = collision.tile_from_position(top);
    !(top_tile != current_tile && collision.is_occupied_by_bomb(top_tile))
}
