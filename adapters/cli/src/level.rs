//! Level files: a `[map]` table with an ASCII layout plus optional `[tuning]`.
//!
//! Layout legend, one character per tile, top row first:
//!
//! | char | tile |
//! |------|------|
//! | `#`  | wall |
//! | `X`  | permanent brick |
//! | `B`  | destructible brick |
//! | `S`  | player spawn (exactly one) |
//! | `M`  | monster spawn |
//! | `e`, `p`, `s` | extra bomb, blast power or speed item under a destructible brick |
//! | `.`  | empty floor |

use std::{fs, path::Path};

use anyhow::{Context, Result};
use bombing_adventure_core::{
    GameTuning, ItemKind, LayoutTile, LevelLayout, TileCoord, TileGrid,
};
use serde::Deserialize;
use thiserror::Error;

/// Level compiled into the binary so it runs without any files on disk.
const DEFAULT_LEVEL: &str = include_str!("../../../levels/classic.toml");

/// Longest fuse or monster step interval a level may request.
const MAX_TUNING_SECONDS: f32 = 3600.0;

/// Parsed level ready to configure the world with.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Level {
    pub(crate) layout: LevelLayout,
    pub(crate) tuning: GameTuning,
}

/// Errors raised while turning level text into a [`Level`].
#[derive(Debug, Error)]
pub(crate) enum LevelError {
    /// The TOML document could not be deserialised.
    #[error("could not parse level file: {0}")]
    Toml(#[from] toml::de::Error),
    /// Tiles must have a positive extent.
    #[error("tile size must be positive (received {width}x{height})")]
    InvalidTileSize { width: f32, height: f32 },
    /// The layout contained no rows.
    #[error("level layout is empty")]
    EmptyLayout,
    /// A row differs in width from the first row.
    #[error("row {row} has {found} tiles but the first row has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A character outside the legend appeared in the layout.
    #[error("unknown tile '{symbol}' at column {column}, row {row}")]
    UnknownTile {
        symbol: char,
        column: usize,
        row: usize,
    },
    /// The layout did not contain exactly one spawn point.
    #[error("level must contain exactly one spawn point 'S' (found {found})")]
    SpawnCount { found: usize },
    /// The layout is too large to address with tile coordinates.
    #[error("level layout of {columns}x{rows} tiles is too large")]
    TooLarge { columns: usize, rows: usize },
    /// A `[tuning]` value is not finite or lies outside its accepted range.
    #[error("tuning value {field} = {value} is out of range")]
    InvalidTuning { field: &'static str, value: f32 },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelFile {
    map: MapSection,
    #[serde(default)]
    tuning: GameTuning,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MapSection {
    tile_width: f32,
    tile_height: f32,
    layout: String,
}

/// Reads and parses the level stored at `path`.
pub(crate) fn load_level(path: &Path) -> Result<Level> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file {}", path.display()))?;
    let level = parse_level(&source)
        .with_context(|| format!("invalid level file {}", path.display()))?;
    log::info!("loaded level from {}", path.display());
    Ok(level)
}

/// Parses the level compiled into the binary.
pub(crate) fn default_level() -> Result<Level> {
    parse_level(DEFAULT_LEVEL).context("built-in level is invalid")
}

/// Parses level text in the TOML format described in the module docs.
pub(crate) fn parse_level(source: &str) -> Result<Level, LevelError> {
    let file: LevelFile = toml::from_str(source)?;
    validate_tuning(&file.tuning)?;
    let MapSection {
        tile_width,
        tile_height,
        layout,
    } = file.map;
    if !(tile_width > 0.0 && tile_height > 0.0) {
        return Err(LevelError::InvalidTileSize {
            width: tile_width,
            height: tile_height,
        });
    }

    let rows: Vec<&str> = layout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();
    let Some(first) = rows.first() else {
        return Err(LevelError::EmptyLayout);
    };
    let expected = first.chars().count();
    for (row, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != expected {
            return Err(LevelError::RaggedRow {
                row,
                expected,
                found,
            });
        }
    }

    let too_large = || LevelError::TooLarge {
        columns: expected,
        rows: rows.len(),
    };
    let columns = u32::try_from(expected).map_err(|_| too_large())?;
    let row_count = u32::try_from(rows.len()).map_err(|_| too_large())?;
    let grid = TileGrid::new(columns, row_count, tile_width, tile_height);

    let mut spawns = Vec::new();
    let mut tiles = Vec::new();
    let mut monsters = Vec::new();
    let mut items = Vec::new();
    for (row, line) in rows.iter().enumerate() {
        for (column, symbol) in line.chars().enumerate() {
            let tile = TileCoord::new(
                i32::try_from(column).map_err(|_| too_large())?,
                i32::try_from(row).map_err(|_| too_large())?,
            );
            match symbol {
                '.' => {}
                '#' => tiles.push((tile, LayoutTile::Wall)),
                'X' => tiles.push((tile, LayoutTile::PermanentBrick)),
                'B' => tiles.push((tile, LayoutTile::DestructibleBrick)),
                'S' => spawns.push(tile),
                'M' => monsters.push(tile),
                'e' | 'p' | 's' => {
                    let kind = match symbol {
                        'e' => ItemKind::ExtraBomb,
                        'p' => ItemKind::BlastPower,
                        _ => ItemKind::SpeedUp,
                    };
                    tiles.push((tile, LayoutTile::DestructibleBrick));
                    items.push((kind, tile));
                }
                _ => {
                    return Err(LevelError::UnknownTile {
                        symbol,
                        column,
                        row,
                    })
                }
            }
        }
    }

    let &[spawn] = spawns.as_slice() else {
        return Err(LevelError::SpawnCount {
            found: spawns.len(),
        });
    };

    let mut layout = LevelLayout::open(grid, spawn);
    for (tile, contents) in tiles {
        layout.set_tile(tile, contents);
    }
    for tile in monsters {
        layout = layout.with_monster(tile);
    }
    for (kind, tile) in items {
        layout = layout.with_item(kind, tile);
    }

    Ok(Level {
        layout,
        tuning: file.tuning,
    })
}

fn validate_tuning(tuning: &GameTuning) -> Result<(), LevelError> {
    let seconds = |value: f32| (0.0..=MAX_TUNING_SECONDS).contains(&value);
    let positive = |value: f32| value.is_finite() && value > 0.0;
    let non_negative = |value: f32| value.is_finite() && value >= 0.0;
    let checks = [
        ("fuse_seconds", tuning.fuse_seconds, seconds(tuning.fuse_seconds)),
        (
            "monster_step_seconds",
            tuning.monster_step_seconds,
            seconds(tuning.monster_step_seconds),
        ),
        ("player_speed", tuning.player_speed, non_negative(tuning.player_speed)),
        ("player_width", tuning.player_width, positive(tuning.player_width)),
        ("player_height", tuning.player_height, positive(tuning.player_height)),
        ("speed_boost", tuning.speed_boost, non_negative(tuning.speed_boost)),
    ];
    match checks.into_iter().find(|(_, _, valid)| !valid) {
        Some((field, value, _)) => Err(LevelError::InvalidTuning { field, value }),
        None => Ok(()),
    }
}
