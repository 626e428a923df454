//! Parallel tile layers that make up the authoritative map.

use bombing_adventure_core::{LayoutTile, LevelLayout, TileCoord, TileGrid};

/// Tile index written into every layer for tiles sourced from a level layout.
const BASE_TILE_INDEX: u32 = 0;

/// Dense grid of optional tile indices over the map's coordinate space.
///
/// Indices are stored relative to the layer's base index, so any stored value
/// means "a tile is present" regardless of which artwork it selects.
#[derive(Clone, Debug, PartialEq)]
pub struct TileLayer {
    grid: TileGrid,
    tiles: Vec<Option<u32>>,
}

impl TileLayer {
    pub(crate) fn empty(grid: TileGrid) -> Self {
        Self {
            tiles: vec![None; grid.tile_count()],
            grid,
        }
    }

    /// Tile index stored at the coordinate; tiles outside the grid read as empty.
    #[must_use]
    pub fn tile_at(&self, tile: TileCoord) -> Option<u32> {
        self.grid
            .index(tile)
            .and_then(|index| self.tiles.get(index).copied().flatten())
    }

    /// Reports whether the layer holds a tile at the coordinate.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        self.tile_at(tile).is_some()
    }

    /// Iterator over every occupied coordinate in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let columns = self.grid.columns().max(1);
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                let column = i32::try_from(index % columns).ok()?;
                let row = i32::try_from(index / columns).ok()?;
                Some(TileCoord::new(column, row))
            })
    }

    pub(crate) fn set(&mut self, tile: TileCoord, value: u32) {
        if let Some(slot) = self.grid.index(tile).and_then(|index| self.tiles.get_mut(index)) {
            *slot = Some(value);
        }
    }

    /// Clears the tile and reports whether one was present.
    pub(crate) fn remove(&mut self, tile: TileCoord) -> bool {
        self.grid
            .index(tile)
            .and_then(|index| self.tiles.get_mut(index))
            .and_then(Option::take)
            .is_some()
    }
}

/// The wall, brick, destructible-flag and decorative overlay layers of a level.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayers {
    walls: TileLayer,
    bricks: TileLayer,
    destructible: TileLayer,
    tops: TileLayer,
}

impl MapLayers {
    pub(crate) fn from_layout(layout: &LevelLayout) -> Self {
        let grid = *layout.grid();
        let mut layers = Self {
            walls: TileLayer::empty(grid),
            bricks: TileLayer::empty(grid),
            destructible: TileLayer::empty(grid),
            tops: TileLayer::empty(grid),
        };

        for row in 0..grid.rows() {
            for column in 0..grid.columns() {
                let (Ok(column), Ok(row)) = (i32::try_from(column), i32::try_from(row)) else {
                    continue;
                };
                let tile = TileCoord::new(column, row);
                match layout.tile(tile) {
                    LayoutTile::Empty => {}
                    LayoutTile::Wall => layers.walls.set(tile, BASE_TILE_INDEX),
                    LayoutTile::PermanentBrick => layers.bricks.set(tile, BASE_TILE_INDEX),
                    LayoutTile::DestructibleBrick => {
                        layers.bricks.set(tile, BASE_TILE_INDEX);
                        layers.destructible.set(tile, BASE_TILE_INDEX);
                        if tile.row() > 0 {
                            layers.tops.set(tile.above(), BASE_TILE_INDEX);
                        }
                    }
                }
            }
        }

        layers
    }

    /// Always-solid tiles that no blast removes.
    #[must_use]
    pub fn walls(&self) -> &TileLayer {
        &self.walls
    }

    /// Solid, rendered brick tiles.
    #[must_use]
    pub fn bricks(&self) -> &TileLayer {
        &self.bricks
    }

    /// Invisible layer marking which bricks a blast may remove.
    #[must_use]
    pub fn destructible(&self) -> &TileLayer {
        &self.destructible
    }

    /// Decorative overlay drawn on the tile above each destructible brick.
    #[must_use]
    pub fn tops(&self) -> &TileLayer {
        &self.tops
    }

    /// Reports whether the tile holds a brick that a blast may remove.
    #[must_use]
    pub fn is_destructible_brick(&self, tile: TileCoord) -> bool {
        self.bricks.contains(tile) && self.destructible.contains(tile)
    }

    /// Removes a destructible brick together with its overlay.
    ///
    /// Returns `false` and leaves every layer untouched when the tile does not
    /// hold a brick present in both the brick and destructible layers.
    pub(crate) fn destroy_brick(&mut self, tile: TileCoord) -> bool {
        if !self.is_destructible_brick(tile) {
            return false;
        }

        let _ = self.bricks.remove(tile);
        let _ = self.destructible.remove(tile);
        if tile.row() > 0 {
            let _ = self.tops.remove(tile.above());
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> LevelLayout {
        LevelLayout::open(TileGrid::new(4, 3, 10.0, 10.0), TileCoord::new(0, 0))
            .with_tile(TileCoord::new(1, 1), LayoutTile::DestructibleBrick)
            .with_tile(TileCoord::new(2, 1), LayoutTile::PermanentBrick)
            .with_tile(TileCoord::new(3, 0), LayoutTile::DestructibleBrick)
            .with_tile(TileCoord::new(0, 2), LayoutTile::Wall)
    }

    #[test]
    fn layout_populates_parallel_layers() {
        let layers = MapLayers::from_layout(&layout());

        assert!(layers.walls().contains(TileCoord::new(0, 2)));
        assert!(layers.is_destructible_brick(TileCoord::new(1, 1)));
        assert!(layers.bricks().contains(TileCoord::new(2, 1)));
        assert!(!layers.is_destructible_brick(TileCoord::new(2, 1)));
        assert!(layers.tops().contains(TileCoord::new(1, 0)));
        assert!(!layers.tops().contains(TileCoord::new(3, -1)));
    }

    #[test]
    fn destroying_permanent_brick_is_refused() {
        let pristine = MapLayers::from_layout(&layout());
        let mut layers = pristine.clone();

        assert!(!layers.destroy_brick(TileCoord::new(2, 1)));
        assert!(layers.bricks().contains(TileCoord::new(2, 1)));
        assert_eq!(layers, pristine);
    }

    #[test]
    fn destroying_brick_clears_overlay_above() {
        let mut layers = MapLayers::from_layout(&layout());

        assert!(layers.destroy_brick(TileCoord::new(1, 1)));
        assert!(!layers.bricks().contains(TileCoord::new(1, 1)));
        assert!(!layers.destructible().contains(TileCoord::new(1, 1)));
        assert!(!layers.tops().contains(TileCoord::new(1, 0)));
    }

    #[test]
    fn occupied_reports_coordinates_in_row_major_order() {
        let layers = MapLayers::from_layout(&layout());
        let bricks: Vec<_> = layers.bricks().occupied().collect();

        assert_eq!(
            bricks,
            vec![
                TileCoord::new(3, 0),
                TileCoord::new(1, 1),
                TileCoord::new(2, 1)
            ]
        );
    }
}
