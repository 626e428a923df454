use std::time::Duration;

use bombing_adventure_core::{
    BombId, Command, DeathCause, Event, GameTuning, LevelLayout, MonsterId, TileCoord, TileGrid,
};
use bombing_adventure_system_damage::Damage;
use bombing_adventure_world::{self as world, query, World};

fn configure(layout: LevelLayout) -> World {
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

fn level() -> LevelLayout {
    LevelLayout::open(TileGrid::new(7, 5, 40.0, 40.0), TileCoord::new(1, 1))
        .with_monster(TileCoord::new(3, 1))
}

fn detonate(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::PlaceBomb, &mut events);
    world::apply(
        world,
        Command::Tick {
            dt: Duration::from_secs(3),
        },
        &mut events,
    );
    events.clear();
    world::apply(world, Command::DetonateExpiredBombs, &mut events);
    events
}

fn run_damage(world: &World, events: &[Event]) -> Vec<Command> {
    let mut damage = Damage::new();
    let mut commands = Vec::new();
    damage.handle(
        events,
        &query::player(world),
        &query::monsters(world),
        &mut commands,
    );
    commands
}

#[test]
fn blast_footprint_kills_player_and_monster() {
    let mut world = configure(level());
    let events = detonate(&mut world);

    let commands = run_damage(&world, &events);

    assert_eq!(
        commands,
        vec![
            Command::KillPlayer {
                cause: DeathCause::Blast {
                    bomb: BombId::new(0)
                },
            },
            Command::KillMonster {
                monster: MonsterId::new(0)
            },
        ]
    );

    let mut applied = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut applied);
    }
    assert!(!query::player(&world).alive);
    assert!(query::monsters(&world).is_empty());
    assert!(applied.contains(&Event::MonsterKilled {
        monster: MonsterId::new(0)
    }));
}

#[test]
fn player_outside_footprint_survives() {
    let mut world = configure(level());
    let mut events = Vec::new();
    world::apply(&mut world, Command::PlaceBomb, &mut events);
    let safe = query::tile_grid(&world)
        .tile_center(TileCoord::new(4, 3))
        .translated(0.0, 9.0);
    world::apply(&mut world, Command::MovePlayer { to: safe }, &mut events);
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(3),
        },
        &mut events,
    );
    events.clear();
    world::apply(&mut world, Command::DetonateExpiredBombs, &mut events);

    let commands = run_damage(&world, &events);

    assert_eq!(
        commands,
        vec![Command::KillMonster {
            monster: MonsterId::new(0)
        }]
    );
}

#[test]
fn monster_sharing_player_tile_kills_player() {
    let layout = LevelLayout::open(TileGrid::new(7, 5, 40.0, 40.0), TileCoord::new(1, 1))
        .with_monster(TileCoord::new(5, 3))
        .with_monster(TileCoord::new(1, 1));
    let world = configure(layout);

    let commands = run_damage(&world, &[]);

    assert_eq!(
        commands,
        vec![Command::KillPlayer {
            cause: DeathCause::MonsterContact {
                monster: MonsterId::new(1)
            },
        }]
    );
}

#[test]
fn dead_player_is_not_killed_twice() {
    let layout = LevelLayout::open(TileGrid::new(7, 5, 40.0, 40.0), TileCoord::new(1, 1))
        .with_monster(TileCoord::new(1, 1));
    let mut world = configure(layout);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::KillPlayer {
            cause: DeathCause::MonsterContact {
                monster: MonsterId::new(0),
            },
        },
        &mut events,
    );

    assert!(run_damage(&world, &events).is_empty());
}
