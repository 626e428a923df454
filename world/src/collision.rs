//! Read-only collision queries over the map layers and active bombs.

use bombing_adventure_core::{PixelPosition, TileCoord, TileGrid};

use crate::{bombs::ActiveBombs, layers::MapLayers};

/// Borrowed view answering wall, brick, bomb and bounds questions.
///
/// Tiles outside the grid never report a wall, brick or bomb; callers reject
/// such positions through [`CollisionView::is_out_of_bounds`] instead.
#[derive(Clone, Copy, Debug)]
pub struct CollisionView<'a> {
    grid: &'a TileGrid,
    layers: &'a MapLayers,
    bombs: &'a ActiveBombs,
}

impl<'a> CollisionView<'a> {
    pub(crate) fn new(grid: &'a TileGrid, layers: &'a MapLayers, bombs: &'a ActiveBombs) -> Self {
        Self {
            grid,
            layers,
            bombs,
        }
    }

    /// Geometry used to map pixels onto tiles.
    #[must_use]
    pub fn grid(&self) -> &'a TileGrid {
        self.grid
    }

    /// Tile containing the pixel position.
    #[must_use]
    pub fn tile_from_position(&self, position: PixelPosition) -> TileCoord {
        self.grid.tile_from_position(position)
    }

    /// Reports whether the wall layer holds a tile at the coordinate.
    #[must_use]
    pub fn is_wall(&self, tile: TileCoord) -> bool {
        self.layers.walls().contains(tile)
    }

    /// Reports whether the brick layer holds a tile at the coordinate.
    #[must_use]
    pub fn is_brick(&self, tile: TileCoord) -> bool {
        self.layers.bricks().contains(tile)
    }

    /// Reports whether an active bomb occupies the coordinate.
    #[must_use]
    pub fn is_occupied_by_bomb(&self, tile: TileCoord) -> bool {
        self.bombs.occupies(tile)
    }

    /// Reports whether the position lies on or beyond any map edge.
    #[must_use]
    pub fn is_out_of_bounds(&self, position: PixelPosition) -> bool {
        self.grid.is_out_of_bounds(position)
    }

    /// Reports whether a tile-walking entity may not enter the coordinate.
    #[must_use]
    pub fn is_blocked(&self, tile: TileCoord) -> bool {
        !self.grid.contains(tile)
            || self.is_wall(tile)
            || self.is_brick(tile)
            || self.is_occupied_by_bomb(tile)
    }
}
