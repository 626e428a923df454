#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Bombing Adventure adapters.

use anyhow::Result as AnyResult;
use bombing_adventure_core::{
    BlastFootprint, Direction, GamePhase, ItemKind, MovementIntent, PixelPosition, TileCoord,
};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Movement intent derived from the directional keys held this frame.
    pub intent: MovementIntent,
    /// Whether the bomb key was pressed on this frame.
    pub place_bomb: bool,
    /// Whether the restart key was pressed on this frame.
    pub restart: bool,
}

/// Grid geometry the backend needs to lay out tiles on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Width of a single tile in world units.
    pub tile_width: f32,
    /// Height of a single tile in world units.
    pub tile_height: f32,
    /// Color used for the floor behind every tile.
    pub floor_color: Color,
}

impl TileGridPresentation {
    /// Creates a new tile grid presentation descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::EmptyGrid`] when either dimension is zero and
    /// [`RenderingError::InvalidTileSize`] when a tile has no positive extent.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_width: f32,
        tile_height: f32,
        floor_color: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyGrid { columns, rows });
        }
        if !(tile_width > 0.0 && tile_height > 0.0) {
            return Err(RenderingError::InvalidTileSize {
                tile_width,
                tile_height,
            });
        }

        Ok(Self {
            columns,
            rows,
            tile_width,
            tile_height,
            floor_color,
        })
    }

    /// Total width of the grid in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_width
    }

    /// Total height of the grid in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_height
    }

    /// Top-left corner of the tile in screen space, where y grows downwards.
    #[must_use]
    pub fn tile_origin(&self, tile: TileCoord) -> Vec2 {
        Vec2::new(
            tile.column() as f32 * self.tile_width,
            tile.row() as f32 * self.tile_height,
        )
    }

    /// Converts a simulation position (y up) into screen space (y down).
    #[must_use]
    pub fn world_to_screen(&self, position: PixelPosition) -> Vec2 {
        Vec2::new(position.x, self.height() - position.y)
    }
}

/// Kind of static tile drawn from the map layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Indestructible wall.
    Wall,
    /// Brick that no blast removes.
    PermanentBrick,
    /// Brick that a blast removes.
    DestructibleBrick,
    /// Decorative overlay above a destructible brick.
    Top,
}

/// Single static tile to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TilePresentation {
    /// Coordinate of the tile.
    pub tile: TileCoord,
    /// What occupies the tile.
    pub kind: TileKind,
}

impl TilePresentation {
    /// Creates a new tile descriptor.
    #[must_use]
    pub const fn new(tile: TileCoord, kind: TileKind) -> Self {
        Self { tile, kind }
    }
}

/// Player sprite descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Sprite center in simulation space; the feet sit half the height below it.
    pub position: PixelPosition,
    /// Sprite extent in world units.
    pub size: Vec2,
    /// Whether the player is still alive.
    pub alive: bool,
}

/// Bomb sprite descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BombPresentation {
    /// Tile the bomb occupies.
    pub tile: TileCoord,
    /// Fraction of the fuse already burnt, in the range 0.0..=1.0.
    pub fuse_progress: f32,
}

/// Monster sprite descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonsterPresentation {
    /// Tile the monster occupies.
    pub tile: TileCoord,
    /// Direction the monster faces.
    pub heading: Direction,
}

/// Uncovered item descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemPresentation {
    /// Tile the item lies on.
    pub tile: TileCoord,
    /// Kind of item.
    pub kind: ItemKind,
}

/// Artwork frame used for one tile of a blast wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlastSegmentKind {
    /// The bomb's own tile.
    Center,
    /// Any tile of a run except the last one.
    Middle,
    /// The last tile of a run.
    End,
}

/// One tile of a blast wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlastWaveSegment {
    /// Tile covered by the segment.
    pub tile: TileCoord,
    /// Direction of the run the segment belongs to; `None` for the center.
    pub direction: Option<Direction>,
    /// Frame to draw.
    pub kind: BlastSegmentKind,
}

/// Expands a blast footprint into drawable segments, center first.
#[must_use]
pub fn blast_wave_segments(footprint: &BlastFootprint) -> Vec<BlastWaveSegment> {
    let center = footprint.center();
    let mut segments = vec![BlastWaveSegment {
        tile: center,
        direction: None,
        kind: BlastSegmentKind::Center,
    }];

    for direction in Direction::ALL {
        let run = footprint.runs().run(direction);
        for step in 1..=run {
            let kind = if step == run {
                BlastSegmentKind::End
            } else {
                BlastSegmentKind::Middle
            };
            segments.push(BlastWaveSegment {
                tile: center.stepped(direction, i32::try_from(step).unwrap_or(i32::MAX)),
                direction: Some(direction),
                kind,
            });
        }
    }

    segments
}

/// Blast wave that is still visible on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct BlastPresentation {
    /// Tiles covered by the wave.
    pub segments: Vec<BlastWaveSegment>,
    /// Opacity of the wave, fading from 1.0 to 0.0.
    pub intensity: f32,
}

/// Counters shown in the heads-up display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HudPresentation {
    /// Bombs the player may have in flight.
    pub capacity: u32,
    /// Bombs currently armed.
    pub bombs_in_flight: u32,
    /// Blast radius of the next bomb.
    pub power: u32,
    /// Monsters still alive.
    pub monsters_left: u32,
}

/// Full description of a frame, regenerated from world queries every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid geometry.
    pub tile_grid: TileGridPresentation,
    /// Walls, bricks and overlays.
    pub tiles: Vec<TilePresentation>,
    /// Items no longer covered by bricks.
    pub items: Vec<ItemPresentation>,
    /// Armed bombs.
    pub bombs: Vec<BombPresentation>,
    /// Living monsters.
    pub monsters: Vec<MonsterPresentation>,
    /// The player sprite.
    pub player: PlayerPresentation,
    /// Blast waves still fading out.
    pub blasts: Vec<BlastPresentation>,
    /// HUD counters.
    pub hud: HudPresentation,
    /// Lifecycle phase, used to show the game-over overlay.
    pub phase: GamePhase,
}

impl Scene {
    /// Creates a scene holding only the grid and the player.
    #[must_use]
    pub fn new(tile_grid: TileGridPresentation, player: PlayerPresentation) -> Self {
        Self {
            tile_grid,
            tiles: Vec::new(),
            items: Vec::new(),
            bombs: Vec::new(),
            monsters: Vec::new(),
            player,
            blasts: Vec::new(),
            hud: HudPresentation::default(),
            phase: GamePhase::Playing,
        }
    }
}

/// Top-level presentation handed to a backend when it starts.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title of the window.
    pub window_title: String,
    /// Color used to clear each frame.
    pub clear_color: Color,
    /// Initial scene.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backends drive the frame loop and draw the scene.
pub trait RenderingBackend {
    /// Runs the backend until the player quits.
    ///
    /// `update_scene` is called once per frame with the frame's delta time and
    /// input, and refreshes the scene in place.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors raised while building rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The grid has no tiles along one axis.
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// A tile has no positive extent.
    InvalidTileSize {
        /// Requested tile width.
        tile_width: f32,
        /// Requested tile height.
        tile_height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { columns, rows } => {
                write!(f, "grid must contain tiles (received {columns}x{rows})")
            }
            Self::InvalidTileSize {
                tile_width,
                tile_height,
            } => write!(
                f,
                "tile size must be positive (received {tile_width}x{tile_height})"
            ),
        }
    }
}

impl Error for RenderingError {}
