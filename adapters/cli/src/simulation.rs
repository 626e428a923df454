//! Scene controller that drives the world and its systems once per frame.

use std::time::Duration;

use anyhow::Result;
use bombing_adventure_core::{Command, Event, GamePhase};
use bombing_adventure_rendering::{
    blast_wave_segments, BlastPresentation, BlastWaveSegment, BombPresentation, Color,
    FrameInput, HudPresentation, ItemPresentation, MonsterPresentation, PlayerPresentation, Scene,
    TileGridPresentation, TileKind, TilePresentation,
};
use bombing_adventure_system_damage::Damage;
use bombing_adventure_system_monsters::Monsters;
use bombing_adventure_system_movement::Movement;
use bombing_adventure_world::{self as world, query, World};
use glam::Vec2;

use crate::level::Level;

/// How long a blast wave stays visible after its bomb exploded.
const BLAST_VISIBLE_FOR: Duration = Duration::from_millis(500);

const FLOOR_COLOR: Color = Color::from_rgb_u8(46, 110, 62);

#[derive(Clone, Debug)]
struct FadingBlast {
    segments: Vec<BlastWaveSegment>,
    remaining: Duration,
}

/// Owns the world, its systems and the level used for restarts.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    level: Level,
    seed: u64,
    movement: Movement,
    damage: Damage,
    monsters: Monsters,
    blasts: Vec<FadingBlast>,
}

impl Simulation {
    /// Creates a simulation with the level loaded and monsters seeded.
    pub(crate) fn new(level: Level, seed: u64) -> Self {
        let mut simulation = Self {
            world: World::new(),
            level,
            seed,
            movement: Movement::default(),
            damage: Damage::new(),
            monsters: Monsters::new(seed),
            blasts: Vec::new(),
        };
        simulation.configure();
        simulation
    }

    fn configure(&mut self) {
        self.movement = Movement::default();
        self.damage = Damage::new();
        self.monsters = Monsters::new(self.seed);
        self.blasts.clear();

        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::ConfigureLevel {
                layout: self.level.layout.clone(),
                tuning: self.level.tuning.clone(),
            },
            &mut events,
        );
        log::info!("{}", query::welcome_banner(&self.world));
    }

    /// Applies the frame's input: restart, movement intent and bomb requests.
    pub(crate) fn handle_input(&mut self, input: FrameInput) {
        if input.restart && query::phase(&self.world) == GamePhase::GameOver {
            log::info!("restarting level");
            self.configure();
            return;
        }

        let mut events = Vec::new();
        if query::player(&self.world).intent != input.intent {
            world::apply(
                &mut self.world,
                Command::SetMovementIntent {
                    intent: input.intent,
                },
                &mut events,
            );
        }
        if input.place_bomb {
            world::apply(&mut self.world, Command::PlaceBomb, &mut events);
        }
    }

    /// Runs one tick in order: death check, fuses, movement, bomb drain, damage, monsters.
    ///
    /// Returns every event the world emitted during the tick.
    pub(crate) fn advance(&mut self, dt: Duration) -> Vec<Event> {
        self.fade_blasts(dt);

        let mut tick_events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut tick_events);
        if query::phase(&self.world) == GamePhase::GameOver {
            return tick_events;
        }

        let mut commands = Vec::new();
        self.movement.handle(
            &tick_events,
            &query::player(&self.world),
            query::collision_view(&self.world),
            &mut commands,
        );
        let mut movement_events = Vec::new();
        self.execute(&mut commands, &mut movement_events);

        let mut drain_events = Vec::new();
        world::apply(
            &mut self.world,
            Command::DetonateExpiredBombs,
            &mut drain_events,
        );
        for event in &drain_events {
            if let Event::BlastResolved { footprint, .. } = event {
                self.blasts.push(FadingBlast {
                    segments: blast_wave_segments(footprint),
                    remaining: BLAST_VISIBLE_FOR,
                });
            }
        }

        self.damage.handle(
            &drain_events,
            &query::player(&self.world),
            &query::monsters(&self.world),
            &mut commands,
        );
        let mut damage_events = Vec::new();
        self.execute(&mut commands, &mut damage_events);

        self.monsters.handle(
            &tick_events,
            &query::monsters(&self.world),
            query::collision_view(&self.world),
            &mut commands,
        );
        let mut step_events = Vec::new();
        self.execute(&mut commands, &mut step_events);

        self.damage.handle(
            &step_events,
            &query::player(&self.world),
            &query::monsters(&self.world),
            &mut commands,
        );
        self.execute(&mut commands, &mut step_events);

        let mut events = tick_events;
        for mut phase in [movement_events, drain_events, damage_events, step_events] {
            events.append(&mut phase);
        }
        events
    }

    fn execute(&mut self, commands: &mut Vec<Command>, out_events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }
    }

    fn fade_blasts(&mut self, dt: Duration) {
        for blast in &mut self.blasts {
            blast.remaining = blast.remaining.saturating_sub(dt);
        }
        self.blasts.retain(|blast| !blast.remaining.is_zero());
    }

    /// Runs `ticks` fixed 60 Hz ticks with no input and logs the outcome.
    pub(crate) fn run_headless(&mut self, ticks: u32) {
        let dt = Duration::from_secs_f64(1.0 / 60.0);
        for _ in 0..ticks {
            for event in self.advance(dt) {
                log::debug!("{event:?}");
            }
        }

        let player = query::player(&self.world);
        log::info!(
            "headless run finished after {ticks} ticks ({} simulated): phase {:?}, player at {:?}, {} monsters, {} bombs",
            query::tick_index(&self.world),
            query::phase(&self.world),
            player.tile,
            query::monsters(&self.world).len(),
            query::bombs(&self.world).len()
        );
    }

    /// Builds a scene describing the current world.
    pub(crate) fn scene(&self) -> Result<Scene> {
        let grid = query::tile_grid(&self.world);
        let tile_grid = TileGridPresentation::new(
            grid.columns(),
            grid.rows(),
            grid.tile_width(),
            grid.tile_height(),
            FLOOR_COLOR,
        )?;
        let mut scene = Scene::new(tile_grid, self.player_presentation());
        self.populate_scene(&mut scene);
        Ok(scene)
    }

    fn player_presentation(&self) -> PlayerPresentation {
        let player = query::player(&self.world);
        PlayerPresentation {
            position: player.position,
            size: Vec2::new(player.size.width, player.size.height),
            alive: player.alive,
        }
    }

    /// Refreshes `scene` in place from world queries.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        let layers = query::layers(&self.world);
        scene.tiles.clear();
        scene.tiles.extend(
            layers
                .walls()
                .occupied()
                .map(|tile| TilePresentation::new(tile, TileKind::Wall)),
        );
        scene.tiles.extend(layers.bricks().occupied().map(|tile| {
            let kind = if layers.is_destructible_brick(tile) {
                TileKind::DestructibleBrick
            } else {
                TileKind::PermanentBrick
            };
            TilePresentation::new(tile, kind)
        }));
        scene.tiles.extend(
            layers
                .tops()
                .occupied()
                .map(|tile| TilePresentation::new(tile, TileKind::Top)),
        );

        scene.items.clear();
        scene.items.extend(
            query::items(&self.world)
                .into_iter()
                .filter(|item| !item.hidden)
                .map(|item| ItemPresentation {
                    tile: item.tile,
                    kind: item.kind,
                }),
        );

        let fuse = query::tuning(&self.world).fuse();
        scene.bombs.clear();
        scene.bombs.extend(query::bombs(&self.world).into_iter().map(|bomb| {
            let progress = if fuse.is_zero() {
                1.0
            } else {
                1.0 - bomb.remaining.as_secs_f32() / fuse.as_secs_f32()
            };
            BombPresentation {
                tile: bomb.tile,
                fuse_progress: progress.clamp(0.0, 1.0),
            }
        }));

        let monsters = query::monsters(&self.world);
        scene.monsters.clear();
        scene
            .monsters
            .extend(monsters.iter().map(|monster| MonsterPresentation {
                tile: monster.tile,
                heading: monster.heading,
            }));

        scene.blasts.clear();
        scene
            .blasts
            .extend(self.blasts.iter().map(|blast| BlastPresentation {
                segments: blast.segments.clone(),
                intensity: blast.remaining.as_secs_f32() / BLAST_VISIBLE_FOR.as_secs_f32(),
            }));

        let player = query::player(&self.world);
        scene.player = self.player_presentation();
        scene.hud = HudPresentation {
            capacity: player.capacity,
            bombs_in_flight: player.bombs_in_flight,
            power: player.power,
            monsters_left: u32::try_from(monsters.len()).unwrap_or(u32::MAX),
        };
        scene.phase = query::phase(&self.world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::parse_level;
    use bombing_adventure_core::{DeathCause, MoveX, MoveY, MovementIntent, TileCoord};
    use bombing_adventure_rendering::BlastSegmentKind;

    const FRAME: Duration = Duration::from_millis(100);

    fn simulation(layout: &str) -> Simulation {
        let source = format!(
            "[map]\ntile_width = 40.0\ntile_height = 40.0\nlayout = \"\"\"\n{layout}\n\"\"\"\n"
        );
        Simulation::new(parse_level(&source).expect("valid level"), 3)
    }

    fn run_for(simulation: &mut Simulation, frames: usize) -> Vec<Event> {
        (0..frames).flat_map(|_| simulation.advance(FRAME)).collect()
    }

    #[test]
    fn intent_moves_player_each_tick() {
        let mut simulation = simulation("#####\n#S..#\n#####");
        let start = query::player(&simulation.world).position;
        simulation.handle_input(FrameInput {
            intent: MovementIntent::new(MoveX::Right, MoveY::Stop),
            ..FrameInput::default()
        });

        let events = simulation.advance(FRAME);

        assert!(events.contains(&Event::PlayerMoved {
            from: start,
            to: start.translated(12.0, 0.0),
        }));
    }

    #[test]
    fn standing_on_own_bomb_ends_the_game_once() {
        let mut simulation = simulation("#####\n#S.B#\n#####");
        simulation.handle_input(FrameInput {
            place_bomb: true,
            ..FrameInput::default()
        });

        let events = run_for(&mut simulation, 25);

        assert!(events.iter().any(|event| matches!(
            event,
            Event::PlayerKilled {
                cause: DeathCause::Blast { .. }
            }
        )));
        assert_eq!(
            events
                .iter()
                .filter(|event| **event == Event::GameOver)
                .count(),
            1
        );
        assert_eq!(query::phase(&simulation.world), GamePhase::GameOver);
        assert!(!query::layers(&simulation.world)
            .bricks()
            .contains(TileCoord::new(3, 1)));
    }

    #[test]
    fn restart_reconfigures_level_after_game_over() {
        let mut simulation = simulation("#####\n#SB.#\n#####");
        simulation.handle_input(FrameInput {
            place_bomb: true,
            ..FrameInput::default()
        });
        let _ = run_for(&mut simulation, 25);
        assert_eq!(query::phase(&simulation.world), GamePhase::GameOver);

        simulation.handle_input(FrameInput {
            restart: true,
            ..FrameInput::default()
        });

        assert_eq!(query::phase(&simulation.world), GamePhase::Playing);
        assert!(query::player(&simulation.world).alive);
        assert!(query::layers(&simulation.world)
            .bricks()
            .contains(TileCoord::new(2, 1)));
        assert!(simulation.blasts.is_empty());
    }

    #[test]
    fn restart_is_ignored_while_playing() {
        let mut simulation = simulation("#####\n#S..#\n#####");
        simulation.handle_input(FrameInput {
            place_bomb: true,
            ..FrameInput::default()
        });
        simulation.handle_input(FrameInput {
            restart: true,
            ..FrameInput::default()
        });

        assert_eq!(query::bombs(&simulation.world).len(), 1);
    }

    #[test]
    fn wandering_monster_kills_player_on_contact() {
        let mut simulation = simulation("#####\n#S.M#\n#####");

        let events = run_for(&mut simulation, 30);

        assert!(events.iter().any(|event| matches!(
            event,
            Event::PlayerKilled {
                cause: DeathCause::MonsterContact { .. }
            }
        )));
        assert!(events.contains(&Event::GameOver));
    }

    #[test]
    fn scene_projects_world_and_fades_blasts() {
        let mut simulation = simulation("#######\n#S..e.#\n#.X.B.#\n#######");
        let mut scene = simulation.scene().expect("scene builds");

        assert_eq!(scene.tile_grid.columns, 7);
        assert!(scene.items.is_empty());
        assert!(scene
            .tiles
            .contains(&TilePresentation::new(TileCoord::new(2, 2), TileKind::PermanentBrick)));
        assert!(scene
            .tiles
            .contains(&TilePresentation::new(TileCoord::new(4, 0), TileKind::Top)));

        simulation.handle_input(FrameInput {
            place_bomb: true,
            ..FrameInput::default()
        });
        simulation.populate_scene(&mut scene);
        assert_eq!(scene.bombs.len(), 1);
        assert_eq!(scene.hud.bombs_in_flight, 1);

        let _ = run_for(&mut simulation, 20);
        simulation.populate_scene(&mut scene);
        assert!(scene.bombs.is_empty());
        assert_eq!(scene.blasts.len(), 1);
        assert_eq!(scene.blasts[0].segments[0].kind, BlastSegmentKind::Center);

        let _ = run_for(&mut simulation, 5);
        simulation.populate_scene(&mut scene);
        assert!(scene.blasts.is_empty());
    }
}
