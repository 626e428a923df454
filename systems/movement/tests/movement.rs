use std::time::Duration;

use bombing_adventure_core::{
    Command, Event, GameTuning, LayoutTile, LevelLayout, MoveX, MoveY, MovementIntent,
    PixelPosition, TileCoord, TileGrid,
};
use bombing_adventure_system_movement::{accepts_move, Movement};
use bombing_adventure_world::{self as world, query, World};

fn grid() -> TileGrid {
    TileGrid::new(7, 5, 40.0, 40.0)
}

fn world_with(layout: LevelLayout) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureLevel {
            layout,
            tuning: GameTuning::default(),
        },
        &mut events,
    );
    world
}

fn step(
    world: &mut World,
    movement: &mut Movement,
    intent: MovementIntent,
    dt: Duration,
) -> Vec<Command> {
    let mut events = Vec::new();
    world::apply(world, Command::SetMovementIntent { intent }, &mut events);
    world::apply(world, Command::Tick { dt }, &mut events);

    let player = query::player(world);
    let mut commands = Vec::new();
    movement.handle(&events, &player, query::collision_view(world), &mut commands);
    commands
}

fn right() -> MovementIntent {
    MovementIntent::new(MoveX::Right, MoveY::Stop)
}

#[test]
fn open_floor_commits_full_candidate() {
    let mut world = world_with(LevelLayout::open(grid(), TileCoord::new(1, 1)));
    let mut movement = Movement::default();
    let start = query::player(&world).position;

    let commands = step(
        &mut world,
        &mut movement,
        MovementIntent::new(MoveX::Right, MoveY::Up),
        Duration::from_millis(100),
    );

    assert_eq!(
        commands,
        vec![Command::MovePlayer {
            to: PixelPosition::new(start.x + 12.0, start.y + 12.0),
        }]
    );
}

#[test]
fn wall_ahead_rejects_move() {
    let layout = LevelLayout::open(grid(), TileCoord::new(1, 1))
        .with_tile(TileCoord::new(2, 1), LayoutTile::Wall);
    let mut world = world_with(layout);
    let mut movement = Movement::default();

    let commands = step(&mut world, &mut movement, right(), Duration::from_millis(100));

    assert!(commands.is_empty());
}

#[test]
fn brick_above_rejects_upward_move() {
    let layout = LevelLayout::open(grid(), TileCoord::new(1, 1))
        .with_tile(TileCoord::new(1, 0), LayoutTile::DestructibleBrick);
    let mut world = world_with(layout);
    let mut movement = Movement::default();

    let commands = step(
        &mut world,
        &mut movement,
        MovementIntent::new(MoveX::Stop, MoveY::Up),
        Duration::from_millis(100),
    );

    assert!(commands.is_empty());
}

#[test]
fn map_edge_rejects_move() {
    let mut world = world_with(LevelLayout::open(grid(), TileCoord::new(0, 1)));
    let mut movement = Movement::default();

    let commands = step(
        &mut world,
        &mut movement,
        MovementIntent::new(MoveX::Left, MoveY::Stop),
        Duration::from_millis(100),
    );

    assert!(commands.is_empty());
}

#[test]
fn player_may_walk_within_own_bomb_tile() {
    let mut world = world_with(LevelLayout::open(grid(), TileCoord::new(1, 1)));
    let mut movement = Movement::default();
    let mut events = Vec::new();
    world::apply(&mut world, Command::PlaceBomb, &mut events);
    assert!(matches!(events[0], Event::BombPlaced { .. }));

    let commands = step(&mut world, &mut movement, right(), Duration::from_millis(10));

    assert_eq!(commands.len(), 1);
}

#[test]
fn bomb_in_neighbouring_tile_blocks_top_probe() {
    let mut world = world_with(LevelLayout::open(grid(), TileCoord::new(1, 1)));
    let mut events = Vec::new();
    let spawn = query::player(&world).position;
    let neighbour = spawn.translated(40.0, 0.0);
    world::apply(&mut world, Command::MovePlayer { to: neighbour }, &mut events);
    world::apply(&mut world, Command::PlaceBomb, &mut events);
    world::apply(&mut world, Command::MovePlayer { to: spawn }, &mut events);
    let collision = query::collision_view(&world);
    assert!(collision.is_occupied_by_bomb(TileCoord::new(2, 1)));

    let size = query::player(&world).size;
    let from_other_tile = accepts_move(
        spawn,
        spawn.translated(12.0, 0.0),
        right(),
        size,
        collision,
    );
    let from_bomb_tile = accepts_move(
        neighbour,
        neighbour.translated(1.0, 0.0),
        right(),
        size,
        collision,
    );

    assert!(!from_other_tile);
    assert!(from_bomb_tile);
}

#[test]
fn idle_intent_and_game_over_emit_nothing() {
    let mut world = world_with(LevelLayout::open(grid(), TileCoord::new(1, 1)));
    let mut movement = Movement::default();

    let idle = step(
        &mut world,
        &mut movement,
        MovementIntent::default(),
        Duration::from_millis(100),
    );
    assert!(idle.is_empty());

    let player = query::player(&world);
    let mut commands = Vec::new();
    movement.handle(
        &[Event::GameOver, Event::TimeAdvanced { dt: Duration::from_millis(100) }],
        &player,
        query::collision_view(&world),
        &mut commands,
    );
    assert!(commands.is_empty());
}
