//! Explosion propagation over the map layers.

use bombing_adventure_core::{BlastRuns, Direction, TileCoord, TileGrid};

use crate::layers::MapLayers;

/// Result of resolving a single explosion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct BlastOutcome {
    pub(crate) runs: BlastRuns,
    pub(crate) destroyed: Vec<TileCoord>,
}

/// Walks outward from `center` in each direction and removes the first
/// destructible brick met within `power` tiles.
///
/// A direction stops at the map edge, at a wall, or at any brick. Walls and
/// permanent bricks are not part of the run; a destructible brick is, and it
/// absorbs the rest of the blast in that direction.
pub(crate) fn resolve_blast(
    grid: &TileGrid,
    layers: &mut MapLayers,
    center: TileCoord,
    power: u32,
) -> BlastOutcome {
    let mut outcome = BlastOutcome::default();
    let reach = i32::try_from(power).unwrap_or(i32::MAX);

    for direction in Direction::ALL {
        let mut run = 0;
        for step in 1..=reach {
            let tile = center.stepped(direction, step);
            if !grid.contains(tile) || layers.walls().contains(tile) {
                break;
            }

            if layers.bricks().contains(tile) {
                if layers.destroy_brick(tile) {
                    outcome.destroyed.push(tile);
                    run = step;
                }
                break;
            }

            run = step;
        }
        outcome.runs.set_run(direction, run.unsigned_abs());
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use bombing_adventure_core::{LayoutTile, LevelLayout};

    fn grid() -> TileGrid {
        TileGrid::new(9, 9, 40.0, 40.0)
    }

    fn layers(layout: LevelLayout) -> MapLayers {
        MapLayers::from_layout(&layout)
    }

    fn open_layout() -> LevelLayout {
        LevelLayout::open(grid(), TileCoord::new(0, 0))
    }

    #[test]
    fn open_surroundings_reach_full_power() {
        let mut layers = layers(open_layout());

        let outcome = resolve_blast(&grid(), &mut layers, TileCoord::new(4, 4), 3);

        assert_eq!(
            outcome.runs,
            BlastRuns {
                left: 3,
                right: 3,
                up: 3,
                down: 3
            }
        );
        assert!(outcome.destroyed.is_empty());
    }

    #[test]
    fn adjacent_wall_stops_run_and_survives() {
        let wall = TileCoord::new(3, 4);
        let mut layers = layers(open_layout().with_tile(wall, LayoutTile::Wall));

        let outcome = resolve_blast(&grid(), &mut layers, TileCoord::new(4, 4), 3);

        assert_eq!(outcome.runs.left, 0);
        assert!(layers.walls().contains(wall));
    }

    #[test]
    fn destructible_brick_absorbs_blast_and_is_removed() {
        let brick = TileCoord::new(6, 4);
        let mut layers = layers(
            open_layout()
                .with_tile(brick, LayoutTile::DestructibleBrick)
                .with_tile(TileCoord::new(7, 4), LayoutTile::DestructibleBrick),
        );
        assert!(layers.tops().contains(brick.above()));

        let outcome = resolve_blast(&grid(), &mut layers, TileCoord::new(4, 4), 4);

        assert_eq!(outcome.runs.right, 2);
        assert_eq!(outcome.destroyed, vec![brick]);
        assert!(!layers.bricks().contains(brick));
        assert!(!layers.destructible().contains(brick));
        assert!(!layers.tops().contains(brick.above()));
        assert!(layers.bricks().contains(TileCoord::new(7, 4)));
    }

    #[test]
    fn permanent_brick_behaves_like_wall() {
        let brick = TileCoord::new(4, 2);
        let mut layers = layers(open_layout().with_tile(brick, LayoutTile::PermanentBrick));

        let outcome = resolve_blast(&grid(), &mut layers, TileCoord::new(4, 4), 3);

        assert_eq!(outcome.runs.up, 1);
        assert!(layers.bricks().contains(brick));
        assert!(outcome.destroyed.is_empty());
    }

    #[test]
    fn map_edge_truncates_run_without_wrapping() {
        let mut layers = layers(open_layout());

        let outcome = resolve_blast(&grid(), &mut layers, TileCoord::new(1, 8), 3);

        assert_eq!(outcome.runs.left, 1);
        assert_eq!(outcome.runs.down, 0);
        assert_eq!(outcome.runs.right, 3);
        assert_eq!(outcome.runs.up, 3);
    }

    #[test]
    fn brick_in_top_row_has_no_overlay_to_remove() {
        let brick = TileCoord::new(4, 0);
        let mut layers = layers(open_layout().with_tile(brick, LayoutTile::DestructibleBrick));

        let outcome = resolve_blast(&grid(), &mut layers, TileCoord::new(4, 2), 2);

        assert_eq!(outcome.runs.up, 2);
        assert_eq!(outcome.destroyed, vec![brick]);
    }
}
