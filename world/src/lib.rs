#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Bombing Adventure.

mod blast;
mod bombs;
mod collision;
mod layers;

use std::time::Duration;

use bombing_adventure_core::{
    BlastFootprint, Command, Direction, Event, GamePhase, GameTuning, ItemKind, LevelLayout,
    MonsterId, MovementIntent, PixelPosition, PlacementError, SpriteSize, TileCoord, TileGrid,
    WELCOME_BANNER,
};

use self::{blast::resolve_blast, bombs::ActiveBombs};

pub use self::{
    collision::CollisionView,
    layers::{MapLayers, TileLayer},
};

const DEFAULT_GRID_COLUMNS: u32 = 15;
const DEFAULT_GRID_ROWS: u32 = 13;
const DEFAULT_TILE_LENGTH: f32 = 40.0;

/// Represents the authoritative Bombing Adventure world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    phase: GamePhase,
    tile_grid: TileGrid,
    layers: MapLayers,
    bombs: ActiveBombs,
    player: Player,
    monsters: Vec<Monster>,
    items: Vec<Item>,
    tuning: GameTuning,
    tick_index: u64,
}

impl World {
    /// Creates a new world holding an empty default level.
    #[must_use]
    pub fn new() -> Self {
        let grid = TileGrid::new(
            DEFAULT_GRID_COLUMNS,
            DEFAULT_GRID_ROWS,
            DEFAULT_TILE_LENGTH,
            DEFAULT_TILE_LENGTH,
        );
        Self::from_level(
            &LevelLayout::open(grid, TileCoord::new(1, 1)),
            GameTuning::default(),
        )
    }

    /// Creates a world populated from the provided level.
    #[must_use]
    pub fn from_level(layout: &LevelLayout, tuning: GameTuning) -> Self {
        let tile_grid = *layout.grid();
        Self {
            banner: WELCOME_BANNER,
            phase: GamePhase::Playing,
            layers: MapLayers::from_layout(layout),
            bombs: ActiveBombs::new(),
            player: Player::spawn(&tile_grid, layout.spawn(), &tuning),
            monsters: layout
                .monsters()
                .iter()
                .enumerate()
                .filter_map(|(index, tile)| {
                    let id = MonsterId::new(u32::try_from(index).ok()?);
                    Some(Monster::spawn(id, *tile))
                })
                .collect(),
            items: layout
                .items()
                .iter()
                .map(|(kind, tile)| Item {
                    kind: *kind,
                    tile: *tile,
                })
                .collect(),
            tile_grid,
            tuning,
            tick_index: 0,
        }
    }

    fn collision_view(&self) -> CollisionView<'_> {
        CollisionView::new(&self.tile_grid, &self.layers, &self.bombs)
    }

    fn player_tile(&self) -> TileCoord {
        self.tile_grid.tile_from_position(self.player.position)
    }

    fn place_bomb(&mut self, out_events: &mut Vec<Event>) {
        let tile = self.player_tile();
        let rejection = if self.phase != GamePhase::Playing || !self.player.alive {
            Some(PlacementError::GameOver)
        } else if self.bombs.occupies(tile) {
            Some(PlacementError::TileOccupied)
        } else if self.player.bombs_in_flight >= self.player.capacity {
            Some(PlacementError::CapacityExhausted)
        } else {
            None
        };

        if let Some(reason) = rejection {
            log::debug!("bomb placement at {tile:?} rejected: {reason:?}");
            out_events.push(Event::BombPlacementRejected { tile, reason });
            return;
        }

        let power = self.player.power;
        let bomb = self.bombs.arm(tile, power, self.tuning.fuse());
        self.player.bombs_in_flight = self.player.bombs_in_flight.saturating_add(1);
        log::info!("bomb {} armed at {tile:?} with power {power}", bomb.get());
        out_events.push(Event::BombPlaced { bomb, tile, power });
    }

    fn detonate_expired_bombs(&mut self, out_events: &mut Vec<Event>) {
        while let Some(bomb) = self.bombs.pop_exploded_front() {
            let outcome = resolve_blast(&self.tile_grid, &mut self.layers, bomb.tile, bomb.power);
            self.player.bombs_in_flight = self.player.bombs_in_flight.saturating_sub(1);
            log::info!(
                "bomb {} exploded at {:?}: {:?}, {} bricks destroyed",
                bomb.id.get(),
                bomb.tile,
                outcome.runs,
                outcome.destroyed.len()
            );
            out_events.push(Event::BlastResolved {
                bomb: bomb.id,
                footprint: BlastFootprint::new(bomb.tile, outcome.runs),
                destroyed: outcome.destroyed,
            });
        }
    }

    fn collect_items(&mut self, out_events: &mut Vec<Event>) {
        let tile = self.player_tile();
        if self.layers.bricks().contains(tile) {
            return;
        }

        let Some(index) = self.items.iter().position(|item| item.tile == tile) else {
            return;
        };
        let item = self.items.remove(index);
        match item.kind {
            ItemKind::ExtraBomb => self.player.capacity = self.player.capacity.saturating_add(1),
            ItemKind::BlastPower => self.player.power = self.player.power.saturating_add(1),
            ItemKind::SpeedUp => self.player.speed *= self.tuning.speed_boost,
        }
        log::info!("picked up {:?} at {tile:?}", item.kind);
        out_events.push(Event::ItemPicked {
            kind: item.kind,
            tile,
        });
    }

    fn step_monster(
        &mut self,
        monster: MonsterId,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) {
        let step = self.tuning.monster_step();
        let Some(index) = self.monsters.iter().position(|entry| entry.id == monster) else {
            return;
        };
        let from = self.monsters[index].tile;
        let to = from.stepped(direction, 1);
        if self.monsters[index].accumulator < step || self.collision_view().is_blocked(to) {
            return;
        }

        let entry = &mut self.monsters[index];
        entry.tile = to;
        entry.heading = direction;
        entry.accumulator = entry.accumulator.saturating_sub(step);
        out_events.push(Event::MonsterAdvanced { monster, from, to });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.phase == GamePhase::GameOver
        && !matches!(
            command,
            Command::ConfigureLevel { .. } | Command::SetMovementIntent { .. } | Command::PlaceBomb
        )
    {
        return;
    }

    match command {
        Command::ConfigureLevel { layout, tuning } => {
            *world = World::from_level(&layout, tuning);
            log::info!(
                "level configured: {}x{} tiles, {} monsters, {} items",
                layout.grid().columns(),
                layout.grid().rows(),
                world.monsters.len(),
                world.items.len()
            );
            out_events.push(Event::LevelConfigured {
                columns: layout.grid().columns(),
                rows: layout.grid().rows(),
            });
        }
        Command::Tick { dt } => {
            if !world.player.alive {
                world.phase = GamePhase::GameOver;
                log::info!("game over after {} ticks", world.tick_index);
                out_events.push(Event::GameOver);
                return;
            }

            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.bombs.burn_fuses(dt, out_events);
            // A stalled monster banks at most one step.
            let step = world.tuning.monster_step();
            for monster in &mut world.monsters {
                monster.accumulator = monster.accumulator.saturating_add(dt).min(step);
            }
        }
        Command::SetMovementIntent { intent } => {
            world.player.intent = intent;
        }
        Command::MovePlayer { to } => {
            if !world.player.alive {
                return;
            }
            let from = world.player.position;
            if from == to {
                return;
            }
            world.player.position = to;
            out_events.push(Event::PlayerMoved { from, to });
            world.collect_items(out_events);
        }
        Command::PlaceBomb => world.place_bomb(out_events),
        Command::DetonateExpiredBombs => world.detonate_expired_bombs(out_events),
        Command::KillPlayer { cause } => {
            if world.player.alive {
                world.player.alive = false;
                log::info!("player killed: {cause:?}");
                out_events.push(Event::PlayerKilled { cause });
            }
        }
        Command::KillMonster { monster } => {
            if let Some(index) = world.monsters.iter().position(|entry| entry.id == monster) {
                let _ = world.monsters.remove(index);
                log::info!("monster {} killed", monster.get());
                out_events.push(Event::MonsterKilled { monster });
            }
        }
        Command::StepMonster { monster, direction } => {
            world.step_monster(monster, direction, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use bombing_adventure_core::{
        BombSnapshot, GamePhase, GameTuning, ItemSnapshot, MonsterSnapshot, PlayerSnapshot,
        TileGrid,
    };

    use super::{CollisionView, MapLayers, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Lifecycle phase of the active level.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Provides read-only access to the level's tile grid definition.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.tile_grid
    }

    /// Provides read-only access to the map layers.
    #[must_use]
    pub fn layers(world: &World) -> &MapLayers {
        &world.layers
    }

    /// Tunables the level was configured with.
    #[must_use]
    pub fn tuning(world: &World) -> &GameTuning {
        &world.tuning
    }

    /// Number of ticks simulated since the level was configured.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Borrowed collision queries over walls, bricks and active bombs.
    #[must_use]
    pub fn collision_view(world: &World) -> CollisionView<'_> {
        world.collision_view()
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            position: player.position,
            tile: world.player_tile(),
            intent: player.intent,
            alive: player.alive,
            speed: player.speed,
            size: player.size,
            capacity: player.capacity,
            bombs_in_flight: player.bombs_in_flight,
            power: player.power,
        }
    }

    /// Captures the active bombs in explosion order.
    #[must_use]
    pub fn bombs(world: &World) -> Vec<BombSnapshot> {
        world.bombs.snapshots()
    }

    /// Captures the living monsters in identifier order.
    #[must_use]
    pub fn monsters(world: &World) -> Vec<MonsterSnapshot> {
        let step = world.tuning.monster_step();
        let mut snapshots: Vec<MonsterSnapshot> = world
            .monsters
            .iter()
            .map(|monster| MonsterSnapshot {
                id: monster.id,
                tile: monster.tile,
                heading: monster.heading,
                ready_for_step: monster.accumulator >= step,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Captures the items still lying on the map.
    #[must_use]
    pub fn items(world: &World) -> Vec<ItemSnapshot> {
        world
            .items
            .iter()
            .map(|item| ItemSnapshot {
                kind: item.kind,
                tile: item.tile,
                hidden: world.layers.bricks().contains(item.tile),
            })
            .collect()
    }
}

#[derive(Clone, Debug)]
struct Player {
    position: PixelPosition,
    intent: MovementIntent,
    alive: bool,
    speed: f32,
    size: SpriteSize,
    capacity: u32,
    bombs_in_flight: u32,
    power: u32,
}

impl Player {
    /// Places the player so both movement probes start inside the spawn tile.
    fn spawn(grid: &TileGrid, tile: TileCoord, tuning: &GameTuning) -> Self {
        let size = tuning.player_size();
        Self {
            position: grid.tile_center(tile).translated(0.0, size.height / 4.0),
            intent: MovementIntent::default(),
            alive: true,
            speed: tuning.player_speed,
            size,
            capacity: tuning.initial_capacity,
            bombs_in_flight: 0,
            power: tuning.initial_power,
        }
    }
}

#[derive(Clone, Debug)]
struct Monster {
    id: MonsterId,
    tile: TileCoord,
    heading: Direction,
    accumulator: Duration,
}

impl Monster {
    fn spawn(id: MonsterId, tile: TileCoord) -> Self {
        Self {
            id,
            tile,
            heading: Direction::West,
            accumulator: Duration::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Item {
    kind: ItemKind,
    tile: TileCoord,
}
