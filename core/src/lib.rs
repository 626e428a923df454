#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bombing Adventure engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Bombing Adventure.";

/// Banner shown by adapters once the player has died.
pub const GAME_OVER_BANNER: &str = "Game over. Press Enter to play again.";

/// Lifecycle phase of the active level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// The player is alive and the simulation advances every tick.
    Playing,
    /// The player died; the level is frozen until it is configured again.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the world's map, entities and tunables with the provided level.
    ConfigureLevel {
        /// Static description of the level to load.
        layout: LevelLayout,
        /// Gameplay tunables applied to the player, bombs and monsters.
        tuning: GameTuning,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Replaces the player's movement intent with the provided value.
    SetMovementIntent {
        /// Intent captured by the input adapter.
        intent: MovementIntent,
    },
    /// Commits a player position that the movement system already validated.
    MovePlayer {
        /// New pixel position of the player.
        to: PixelPosition,
    },
    /// Requests that the player drop a bomb on the tile they occupy.
    PlaceBomb,
    /// Resolves every exploded bomb at the head of the active-bomb sequence.
    DetonateExpiredBombs,
    /// Marks the player as dead.
    KillPlayer {
        /// What killed the player.
        cause: DeathCause,
    },
    /// Removes a monster from the level.
    KillMonster {
        /// Identifier of the monster that died.
        monster: MonsterId,
    },
    /// Requests that a monster advance a single tile in the specified direction.
    StepMonster {
        /// Identifier of the monster attempting to move.
        monster: MonsterId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new level replaced the previous world contents.
    LevelConfigured {
        /// Number of tile columns in the new level.
        columns: u32,
        /// Number of tile rows in the new level.
        rows: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Position before the move.
        from: PixelPosition,
        /// Position after the move.
        to: PixelPosition,
    },
    /// Confirms that a bomb was armed.
    BombPlaced {
        /// Identifier assigned to the bomb.
        bomb: BombId,
        /// Tile the bomb occupies.
        tile: TileCoord,
        /// Blast radius of the bomb measured in tiles.
        power: u32,
    },
    /// Reports that a bomb placement request was rejected.
    BombPlacementRejected {
        /// Tile the player occupied when requesting the bomb.
        tile: TileCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a bomb's fuse ran out during a tick.
    BombFuseExpired {
        /// Identifier of the bomb that transitioned to exploded.
        bomb: BombId,
    },
    /// Describes a resolved explosion.
    BlastResolved {
        /// Identifier of the bomb that exploded.
        bomb: BombId,
        /// Cross-shaped area covered by the blast.
        footprint: BlastFootprint,
        /// Bricks removed from the map by the blast.
        destroyed: Vec<TileCoord>,
    },
    /// Confirms that the player collected an item.
    ItemPicked {
        /// Kind of item that was collected.
        kind: ItemKind,
        /// Tile the item occupied.
        tile: TileCoord,
    },
    /// Announces that the player died.
    PlayerKilled {
        /// What killed the player.
        cause: DeathCause,
    },
    /// Confirms that a monster moved between two tiles.
    MonsterAdvanced {
        /// Identifier of the monster that advanced.
        monster: MonsterId,
        /// Tile the monster occupied before moving.
        from: TileCoord,
        /// Tile the monster occupies after moving.
        to: TileCoord,
    },
    /// Announces that a monster died.
    MonsterKilled {
        /// Identifier of the monster that died.
        monster: MonsterId,
    },
    /// Announces that the level entered its terminal game-over phase.
    GameOver,
}

/// Cardinal directions on the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
    ];

    /// Column and row delta of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Horizontal component of the player's movement intent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveX {
    /// Move toward decreasing x.
    Left,
    /// Move toward increasing x.
    Right,
    /// No horizontal movement.
    #[default]
    Stop,
}

impl MoveX {
    /// Unit multiplier applied to the player's speed along x.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
            Self::Stop => 0.0,
        }
    }
}

/// Vertical component of the player's movement intent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveY {
    /// Move toward increasing y (screen up).
    Up,
    /// Move toward decreasing y (screen down).
    Down,
    /// No vertical movement.
    #[default]
    Stop,
}

impl MoveY {
    /// Unit multiplier applied to the player's speed along y.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
            Self::Stop => 0.0,
        }
    }
}

/// Movement intent maintained by the input adapter and read every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovementIntent {
    /// Horizontal intent.
    pub horizontal: MoveX,
    /// Vertical intent.
    pub vertical: MoveY,
}

impl MovementIntent {
    /// Creates a new movement intent.
    #[must_use]
    pub const fn new(horizontal: MoveX, vertical: MoveY) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Reports whether the intent requests any movement at all.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.horizontal, MoveX::Stop) && matches!(self.vertical, MoveY::Stop)
    }
}

/// Unique identifier assigned to a bomb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BombId(u32);

impl BombId {
    /// Creates a new bomb identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single tile expressed as column and row indices.
///
/// The origin is the top-left tile and rows grow downward. Coordinates are
/// signed so probes that land outside the map remain representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: i32,
    row: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Tile reached by walking `steps` tiles in `direction`.
    #[must_use]
    pub const fn stepped(self, direction: Direction, steps: i32) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            column: self.column + dx * steps,
            row: self.row + dy * steps,
        }
    }

    /// Tile directly above this one on screen.
    #[must_use]
    pub const fn above(self) -> Self {
        self.stepped(Direction::North, 1)
    }
}

/// Position in pixel space, origin bottom-left with y growing upward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPosition {
    /// Horizontal pixel offset.
    pub x: f32,
    /// Vertical pixel offset.
    pub y: f32,
}

impl PixelPosition {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by the provided deltas.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Width and height of a sprite footprint in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteSize {
    /// Horizontal extent in pixels.
    pub width: f32,
    /// Vertical extent in pixels.
    pub height: f32,
}

impl SpriteSize {
    /// Creates a new sprite size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Describes the discrete tile layout of the map and maps pixels onto tiles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_width: f32,
    tile_height: f32,
}

impl TileGrid {
    /// Creates a new tile grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_width: f32, tile_height: f32) -> Self {
        Self {
            columns,
            rows,
            tile_width,
            tile_height,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Width of a single tile in pixels.
    #[must_use]
    pub const fn tile_width(&self) -> f32 {
        self.tile_width
    }

    /// Height of a single tile in pixels.
    #[must_use]
    pub const fn tile_height(&self) -> f32 {
        self.tile_height
    }

    /// Total width of the map in pixels.
    #[must_use]
    pub const fn pixel_width(&self) -> f32 {
        self.columns as f32 * self.tile_width
    }

    /// Total height of the map in pixels.
    #[must_use]
    pub const fn pixel_height(&self) -> f32 {
        self.rows as f32 * self.tile_height
    }

    /// Maps a pixel position onto the tile that contains it.
    ///
    /// The vertical axis is inverted: pixel y grows upward while rows grow
    /// downward, so `row = (pixel_height - y) / tile_height`.
    #[must_use]
    pub fn tile_from_position(&self, position: PixelPosition) -> TileCoord {
        let column = (position.x / self.tile_width).floor() as i32;
        let row = ((self.pixel_height() - position.y) / self.tile_height).floor() as i32;
        TileCoord::new(column, row)
    }

    /// Pixel position of the center of the provided tile.
    #[must_use]
    pub fn tile_center(&self, tile: TileCoord) -> PixelPosition {
        PixelPosition::new(
            (tile.column() as f32 + 0.5) * self.tile_width,
            self.pixel_height() - (tile.row() as f32 + 0.5) * self.tile_height,
        )
    }

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        self.index(tile).is_some()
    }

    /// Reports whether a pixel position lies on or beyond any map edge.
    #[must_use]
    pub fn is_out_of_bounds(&self, position: PixelPosition) -> bool {
        position.x <= 0.0
            || position.x >= self.pixel_width()
            || position.y <= 0.0
            || position.y >= self.pixel_height()
    }

    /// Row-major index of the tile, or `None` when it lies outside the grid.
    #[must_use]
    pub fn index(&self, tile: TileCoord) -> Option<usize> {
        let column = u32::try_from(tile.column()).ok()?;
        let row = u32::try_from(tile.row()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
    }

    /// Total number of tiles in the grid.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        usize::try_from(u64::from(self.columns) * u64::from(self.rows)).unwrap_or(0)
    }
}

/// Number of tiles a blast covered in each direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlastRuns {
    /// Tiles covered toward decreasing columns.
    pub left: u32,
    /// Tiles covered toward increasing columns.
    pub right: u32,
    /// Tiles covered toward decreasing rows.
    pub up: u32,
    /// Tiles covered toward increasing rows.
    pub down: u32,
}

impl BlastRuns {
    /// Run length in the provided direction.
    #[must_use]
    pub const fn run(&self, direction: Direction) -> u32 {
        match direction {
            Direction::West => self.left,
            Direction::East => self.right,
            Direction::North => self.up,
            Direction::South => self.down,
        }
    }

    /// Overwrites the run length in the provided direction.
    pub fn set_run(&mut self, direction: Direction, run: u32) {
        match direction {
            Direction::West => self.left = run,
            Direction::East => self.right = run,
            Direction::North => self.up = run,
            Direction::South => self.down = run,
        }
    }
}

/// Cross-shaped area covered by a resolved explosion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlastFootprint {
    center: TileCoord,
    runs: BlastRuns,
}

impl BlastFootprint {
    /// Creates a footprint centered on a bomb tile.
    #[must_use]
    pub const fn new(center: TileCoord, runs: BlastRuns) -> Self {
        Self { center, runs }
    }

    /// Tile the bomb occupied.
    #[must_use]
    pub const fn center(&self) -> TileCoord {
        self.center
    }

    /// Run lengths in each direction.
    #[must_use]
    pub const fn runs(&self) -> BlastRuns {
        self.runs
    }

    /// Reports whether the tile is covered by the blast.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        let dx = tile.column() - self.center.column();
        let dy = tile.row() - self.center.row();
        match (dx, dy) {
            (0, 0) => true,
            (0, dy) if dy < 0 => dy.unsigned_abs() <= self.runs.up,
            (0, dy) => dy.unsigned_abs() <= self.runs.down,
            (dx, 0) if dx < 0 => dx.unsigned_abs() <= self.runs.left,
            (dx, 0) => dx.unsigned_abs() <= self.runs.right,
            _ => false,
        }
    }
}

/// Reasons a bomb placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The level is over, so no further bombs may be placed.
    GameOver,
    /// The player's tile already holds an active bomb.
    TileOccupied,
    /// The player already has as many bombs in flight as their capacity allows.
    CapacityExhausted,
}

/// What killed the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// The player stood inside a blast footprint.
    Blast {
        /// Bomb whose explosion hit the player.
        bomb: BombId,
    },
    /// The player shared a tile with a monster.
    MonsterContact {
        /// Monster that touched the player.
        monster: MonsterId,
    },
}

/// Power-ups that can be collected by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Raises the number of bombs the player may have in flight.
    ExtraBomb,
    /// Raises the blast radius of newly placed bombs.
    BlastPower,
    /// Raises the player's movement speed.
    SpeedUp,
}

/// Static contents of a single tile in a level layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutTile {
    /// Nothing occupies the tile.
    #[default]
    Empty,
    /// Indestructible wall.
    Wall,
    /// Brick that no blast can destroy.
    PermanentBrick,
    /// Brick that blasts remove, covered by a decorative top overlay.
    DestructibleBrick,
}

/// Complete static description of a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    grid: TileGrid,
    tiles: Vec<LayoutTile>,
    spawn: TileCoord,
    monsters: Vec<TileCoord>,
    items: Vec<(ItemKind, TileCoord)>,
}

impl LevelLayout {
    /// Creates an empty level of the provided geometry with the player spawning at `spawn`.
    #[must_use]
    pub fn open(grid: TileGrid, spawn: TileCoord) -> Self {
        Self {
            tiles: vec![LayoutTile::Empty; grid.tile_count()],
            grid,
            spawn,
            monsters: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Sets the contents of a tile; coordinates outside the grid are ignored.
    #[must_use]
    pub fn with_tile(mut self, tile: TileCoord, contents: LayoutTile) -> Self {
        self.set_tile(tile, contents);
        self
    }

    /// Sets the contents of a tile; coordinates outside the grid are ignored.
    pub fn set_tile(&mut self, tile: TileCoord, contents: LayoutTile) {
        if let Some(slot) = self.grid.index(tile).and_then(|index| self.tiles.get_mut(index)) {
            *slot = contents;
        }
    }

    /// Adds a monster spawning on the provided tile.
    #[must_use]
    pub fn with_monster(mut self, tile: TileCoord) -> Self {
        self.monsters.push(tile);
        self
    }

    /// Adds an item lying on the provided tile.
    #[must_use]
    pub fn with_item(mut self, kind: ItemKind, tile: TileCoord) -> Self {
        self.items.push((kind, tile));
        self
    }

    /// Geometry of the level.
    #[must_use]
    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Contents of the provided tile; tiles outside the grid read as empty.
    #[must_use]
    pub fn tile(&self, tile: TileCoord) -> LayoutTile {
        self.grid
            .index(tile)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or_default()
    }

    /// Tile on which the player spawns.
    #[must_use]
    pub const fn spawn(&self) -> TileCoord {
        self.spawn
    }

    /// Tiles on which monsters spawn, in identifier order.
    #[must_use]
    pub fn monsters(&self) -> &[TileCoord] {
        &self.monsters
    }

    /// Items lying on the map.
    #[must_use]
    pub fn items(&self) -> &[(ItemKind, TileCoord)] {
        &self.items
    }
}

/// Gameplay tunables, overridable per level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    /// Seconds between arming a bomb and its explosion.
    pub fuse_seconds: f32,
    /// Blast radius, in tiles, of the player's bombs at level start.
    pub initial_power: u32,
    /// Bombs the player may have in flight at level start.
    pub initial_capacity: u32,
    /// Player movement speed in pixels per second.
    pub player_speed: f32,
    /// Width of the player's sprite footprint in pixels.
    pub player_width: f32,
    /// Height of the player's sprite footprint in pixels.
    pub player_height: f32,
    /// Seconds a monster waits between single-tile steps.
    pub monster_step_seconds: f32,
    /// Multiplier applied to the player's speed by a speed item.
    pub speed_boost: f32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            fuse_seconds: 2.0,
            initial_power: 2,
            initial_capacity: 1,
            player_speed: 120.0,
            player_width: 30.0,
            player_height: 36.0,
            monster_step_seconds: 0.6,
            speed_boost: 1.2,
        }
    }
}

impl GameTuning {
    /// Fuse duration of newly placed bombs.
    ///
    /// Values that do not fit a [`Duration`] fall back to the default fuse.
    #[must_use]
    pub fn fuse(&self) -> Duration {
        seconds_or_default(self.fuse_seconds, Self::default().fuse_seconds)
    }

    /// Time a monster must accumulate before stepping again.
    #[must_use]
    pub fn monster_step(&self) -> Duration {
        seconds_or_default(
            self.monster_step_seconds,
            Self::default().monster_step_seconds,
        )
    }

    /// Footprint of the player's sprite.
    #[must_use]
    pub const fn player_size(&self) -> SpriteSize {
        SpriteSize::new(self.player_width, self.player_height)
    }
}

fn seconds_or_default(seconds: f32, default: f32) -> Duration {
    Duration::try_from_secs_f32(seconds.max(0.0))
        .unwrap_or_else(|_| Duration::from_secs_f32(default))
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Current pixel position.
    pub position: PixelPosition,
    /// Tile containing the current position.
    pub tile: TileCoord,
    /// Intent most recently provided by the input adapter.
    pub intent: MovementIntent,
    /// Whether the player is still alive.
    pub alive: bool,
    /// Movement speed in pixels per second.
    pub speed: f32,
    /// Footprint of the player's sprite.
    pub size: SpriteSize,
    /// Maximum number of bombs in flight.
    pub capacity: u32,
    /// Bombs currently armed and not yet resolved.
    pub bombs_in_flight: u32,
    /// Blast radius of the next bomb.
    pub power: u32,
}

/// Immutable representation of a single bomb used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BombSnapshot {
    /// Identifier of the bomb.
    pub id: BombId,
    /// Tile occupied by the bomb.
    pub tile: TileCoord,
    /// Blast radius in tiles.
    pub power: u32,
    /// Whether the fuse already ran out.
    pub exploded: bool,
    /// Fuse time left before the explosion.
    pub remaining: Duration,
}

/// Immutable representation of a single monster used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonsterSnapshot {
    /// Identifier of the monster.
    pub id: MonsterId,
    /// Tile occupied by the monster.
    pub tile: TileCoord,
    /// Direction the monster is currently walking in.
    pub heading: Direction,
    /// Whether the monster accumulated enough time to step.
    pub ready_for_step: bool,
}

/// Immutable representation of an item still lying on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemSnapshot {
    /// Kind of the item.
    pub kind: ItemKind,
    /// Tile the item lies on.
    pub tile: TileCoord,
    /// Whether a brick still covers the item.
    pub hidden: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn grid() -> TileGrid {
        TileGrid::new(24, 16, 40.0, 40.0)
    }

    #[test]
    fn tile_from_position_inverts_vertical_axis() {
        let grid = grid();
        assert_eq!(
            grid.tile_from_position(PixelPosition::new(10.0, 630.0)),
            TileCoord::new(0, 0)
        );
        assert_eq!(
            grid.tile_from_position(PixelPosition::new(950.0, 10.0)),
            TileCoord::new(23, 15)
        );
    }

    #[test]
    fn tile_from_position_keeps_outside_probes_negative() {
        let grid = grid();
        assert_eq!(
            grid.tile_from_position(PixelPosition::new(-5.0, 645.0)),
            TileCoord::new(-1, -1)
        );
    }

    #[test]
    fn out_of_bounds_is_strict_at_edges() {
        let grid = grid();
        assert!(grid.is_out_of_bounds(PixelPosition::new(0.0, 100.0)));
        assert!(grid.is_out_of_bounds(PixelPosition::new(960.0, 100.0)));
        assert!(grid.is_out_of_bounds(PixelPosition::new(100.0, 0.0)));
        assert!(grid.is_out_of_bounds(PixelPosition::new(100.0, 640.0)));
        assert!(!grid.is_out_of_bounds(PixelPosition::new(0.5, 639.5)));
    }

    #[test]
    fn index_rejects_tiles_outside_grid() {
        let grid = TileGrid::new(3, 2, 10.0, 10.0);
        assert_eq!(grid.index(TileCoord::new(2, 1)), Some(5));
        assert_eq!(grid.index(TileCoord::new(3, 0)), None);
        assert_eq!(grid.index(TileCoord::new(-1, 0)), None);
        assert_eq!(grid.index(TileCoord::new(0, 2)), None);
    }

    #[test]
    fn footprint_contains_cross_only() {
        let footprint = BlastFootprint::new(
            TileCoord::new(5, 5),
            BlastRuns {
                left: 2,
                right: 0,
                up: 1,
                down: 3,
            },
        );
        assert!(footprint.contains(TileCoord::new(5, 5)));
        assert!(footprint.contains(TileCoord::new(3, 5)));
        assert!(!footprint.contains(TileCoord::new(2, 5)));
        assert!(!footprint.contains(TileCoord::new(6, 5)));
        assert!(footprint.contains(TileCoord::new(5, 4)));
        assert!(!footprint.contains(TileCoord::new(5, 3)));
        assert!(footprint.contains(TileCoord::new(5, 8)));
        assert!(!footprint.contains(TileCoord::new(6, 6)));
    }

    #[test]
    fn unrepresentable_tuning_durations_fall_back_to_defaults() {
        let defaults = GameTuning::default();
        let tuning = GameTuning {
            fuse_seconds: 1e30,
            monster_step_seconds: f32::INFINITY,
            ..GameTuning::default()
        };

        assert_eq!(tuning.fuse(), defaults.fuse());
        assert_eq!(tuning.monster_step(), defaults.monster_step());
        assert_eq!(
            GameTuning {
                fuse_seconds: -1.0,
                ..GameTuning::default()
            }
            .fuse(),
            Duration::ZERO
        );
    }

    #[test]
    fn layout_builder_ignores_tiles_outside_grid() {
        let layout = LevelLayout::open(TileGrid::new(3, 3, 10.0, 10.0), TileCoord::new(1, 1))
            .with_tile(TileCoord::new(0, 0), LayoutTile::Wall)
            .with_tile(TileCoord::new(7, 7), LayoutTile::Wall);
        assert_eq!(layout.tile(TileCoord::new(0, 0)), LayoutTile::Wall);
        assert_eq!(layout.tile(TileCoord::new(7, 7)), LayoutTile::Empty);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn level_layout_round_trips_through_bincode() {
        let layout = LevelLayout::open(TileGrid::new(4, 3, 40.0, 40.0), TileCoord::new(1, 1))
            .with_tile(TileCoord::new(2, 1), LayoutTile::DestructibleBrick)
            .with_monster(TileCoord::new(3, 2))
            .with_item(ItemKind::BlastPower, TileCoord::new(2, 1));
        assert_round_trip(&layout);
    }

    proptest! {
        #[test]
        fn tile_center_maps_back_to_its_tile(column in 0i32..24, row in 0i32..16) {
            let grid = grid();
            let tile = TileCoord::new(column, row);
            prop_assert_eq!(grid.tile_from_position(grid.tile_center(tile)), tile);
        }

        #[test]
        fn positions_in_one_cell_share_a_tile(
            column in 0i32..24,
            row in 0i32..16,
            fx in 0.01f32..0.99,
            fy in 0.01f32..0.99,
        ) {
            let grid = grid();
            let tile = TileCoord::new(column, row);
            let center = grid.tile_center(tile);
            let position = PixelPosition::new(
                center.x + (fx - 0.5) * grid.tile_width(),
                center.y + (fy - 0.5) * grid.tile_height(),
            );
            prop_assert_eq!(grid.tile_from_position(position), tile);
        }
    }
}
