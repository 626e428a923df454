#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Bombing Adventure.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use anyhow::Result;
use bombing_adventure_core::{
    Direction, GamePhase, ItemKind, MoveX, MoveY, MovementIntent, TileCoord, GAME_OVER_BANNER,
};
use bombing_adventure_rendering::{
    BlastPresentation, BlastSegmentKind, BombPresentation, Color, FrameInput, HudPresentation,
    ItemPresentation, MonsterPresentation, PlayerPresentation, Presentation, RenderingBackend,
    Scene, TileGridPresentation, TileKind, TilePresentation,
};
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use std::time::{Duration, Instant};

/// Height of the HUD strip above the map, in screen pixels.
const HUD_HEIGHT: f32 = 36.0;

/// Directional keys held during a frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldDirections {
    /// Left arrow or `A`.
    pub left: bool,
    /// Right arrow or `D`.
    pub right: bool,
    /// Up arrow or `W`.
    pub up: bool,
    /// Down arrow or `S`.
    pub down: bool,
}

impl HeldDirections {
    fn poll() -> Self {
        Self {
            left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            up: is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
            down: is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
        }
    }

    /// Movement intent for the held keys; opposing keys cancel out.
    #[must_use]
    pub fn intent(self) -> MovementIntent {
        let horizontal = match (self.left, self.right) {
            (true, false) => MoveX::Left,
            (false, true) => MoveX::Right,
            _ => MoveX::Stop,
        };
        let vertical = match (self.up, self.down) {
            (true, false) => MoveY::Up,
            (false, true) => MoveY::Down,
            _ => MoveY::Stop,
        };
        MovementIntent::new(horizontal, vertical)
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `Space` drops a bomb.
    place_bomb: bool,
    /// `Enter` restarts the level after game over.
    restart: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            place_bomb: is_key_pressed(KeyCode::Space),
            restart: is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns averages once one second has elapsed.
    fn record_frame(
        &mut self,
        frame: Duration,
        update: Duration,
        render: Duration,
    ) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += update;
        self.render_accum += render;

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let metrics = FpsMetrics {
            per_second: self.frames as f32 / seconds,
            avg_update: self.update_accum / frames,
            avg_render: self.render_accum / frames,
        };
        *self = Self::default();
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let initial = SceneMetrics::from_grid(&scene.tile_grid, 0.0, 0.0);
        let mut config = macroquad::window::Conf {
            window_title,
            window_width: initial.natural_width(),
            window_height: initial.natural_height(),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        log::info!(
            "opening {}x{} window",
            config.window_width,
            config.window_height
        );

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    log::info!("quit requested");
                    break;
                }

                let frame_dt =
                    Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                let frame_input = FrameInput {
                    intent: HeldDirections::poll().intent(),
                    place_bomb: keyboard.place_bomb,
                    restart: keyboard.restart,
                };

                let update_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::from_grid(
                    &scene.tile_grid,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_floor(&scene.tile_grid, &metrics);
                draw_tiles(&scene.tiles, &metrics);
                draw_items(&scene.items, &metrics);
                draw_bombs(&scene.bombs, &metrics);
                draw_blasts(&scene.blasts, &metrics);
                draw_monsters(&scene.monsters, &metrics);
                draw_player(&scene.player, &scene.tile_grid, &metrics);
                draw_hud(&scene.hud, &metrics);
                if scene.phase == GamePhase::GameOver {
                    draw_game_over(&metrics);
                }
                let render_duration = render_start.elapsed();

                if let Some(FpsMetrics {
                    per_second,
                    avg_update,
                    avg_render,
                }) = fps_counter.record_frame(frame_dt, update_duration, render_duration)
                {
                    if show_fps {
                        log::info!(
                            "FPS: {:.2} | update: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            avg_update.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps the world-unit grid onto the window, keeping the aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    grid_width: f32,
    grid_height: f32,
    tile_width: f32,
    tile_height: f32,
}

impl SceneMetrics {
    /// Builds metrics for the screen size; a zero-sized screen yields unit scale.
    fn from_grid(grid: &TileGridPresentation, screen_width: f32, screen_height: f32) -> Self {
        let available_height = (screen_height - HUD_HEIGHT).max(0.0);
        let scale = if screen_width <= f32::EPSILON || available_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / grid.width()).min(available_height / grid.height())
        };
        let grid_width = grid.width() * scale;
        let grid_height = grid.height() * scale;

        Self {
            scale,
            offset_x: ((screen_width - grid_width) * 0.5).max(0.0),
            offset_y: HUD_HEIGHT + ((available_height - grid_height) * 0.5).max(0.0),
            grid_width,
            grid_height,
            tile_width: grid.tile_width * scale,
            tile_height: grid.tile_height * scale,
        }
    }

    fn natural_width(&self) -> i32 {
        self.grid_width.round() as i32
    }

    fn natural_height(&self) -> i32 {
        (self.grid_height + HUD_HEIGHT).round() as i32
    }

    /// Converts a world-unit point laid out with y down into screen space.
    fn to_screen(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + point.x * self.scale,
            self.offset_y + point.y * self.scale,
        )
    }

    /// Screen-space top-left corner of a tile.
    fn tile_origin(&self, tile: TileCoord) -> Vec2 {
        Vec2::new(
            self.offset_x + tile.column() as f32 * self.tile_width,
            self.offset_y + tile.row() as f32 * self.tile_height,
        )
    }

    fn tile_center(&self, tile: TileCoord) -> Vec2 {
        self.tile_origin(tile) + Vec2::new(self.tile_width * 0.5, self.tile_height * 0.5)
    }
}

fn draw_floor(grid: &TileGridPresentation, metrics: &SceneMetrics) {
    macroquad::shapes::draw_rectangle(
        metrics.offset_x,
        metrics.offset_y,
        metrics.grid_width,
        metrics.grid_height,
        to_macroquad_color(grid.floor_color),
    );
}

fn tile_color(kind: TileKind) -> Color {
    match kind {
        TileKind::Wall => Color::from_rgb_u8(70, 74, 86),
        TileKind::PermanentBrick => Color::from_rgb_u8(120, 64, 40),
        TileKind::DestructibleBrick => Color::from_rgb_u8(178, 98, 58),
        TileKind::Top => Color::from_rgb_u8(214, 140, 92),
    }
}

fn draw_tiles(tiles: &[TilePresentation], metrics: &SceneMetrics) {
    for tile in tiles {
        let origin = metrics.tile_origin(tile.tile);
        let color = to_macroquad_color(tile_color(tile.kind));
        match tile.kind {
            TileKind::Top => {
                let strip = metrics.tile_height * 0.25;
                macroquad::shapes::draw_rectangle(
                    origin.x,
                    origin.y + metrics.tile_height - strip,
                    metrics.tile_width,
                    strip,
                    color,
                );
            }
            TileKind::Wall | TileKind::PermanentBrick | TileKind::DestructibleBrick => {
                macroquad::shapes::draw_rectangle(
                    origin.x,
                    origin.y,
                    metrics.tile_width,
                    metrics.tile_height,
                    color,
                );
                macroquad::shapes::draw_rectangle_lines(
                    origin.x,
                    origin.y,
                    metrics.tile_width,
                    metrics.tile_height,
                    1.0,
                    to_macroquad_color(tile_color(tile.kind).lighten(0.25)),
                );
            }
        }
    }
}

fn item_color(kind: ItemKind) -> Color {
    match kind {
        ItemKind::ExtraBomb => Color::from_rgb_u8(90, 140, 230),
        ItemKind::BlastPower => Color::from_rgb_u8(235, 110, 40),
        ItemKind::SpeedUp => Color::from_rgb_u8(90, 210, 120),
    }
}

fn draw_items(items: &[ItemPresentation], metrics: &SceneMetrics) {
    let radius = metrics.tile_width.min(metrics.tile_height) * 0.3;
    for item in items {
        let center = metrics.tile_center(item.tile);
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            radius,
            to_macroquad_color(item_color(item.kind)),
        );
        macroquad::shapes::draw_circle_lines(
            center.x,
            center.y,
            radius,
            2.0,
            macroquad::color::WHITE,
        );
    }
}

fn draw_bombs(bombs: &[BombPresentation], metrics: &SceneMetrics) {
    let base_radius = metrics.tile_width.min(metrics.tile_height) * 0.35;
    for bomb in bombs {
        let center = metrics.tile_center(bomb.tile);
        let pulse = 1.0 + 0.1 * (bomb.fuse_progress * 20.0).sin();
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            base_radius * pulse,
            macroquad::color::BLACK,
        );
        let spark = Color::new(1.0, 0.9 - 0.7 * bomb.fuse_progress, 0.1, 1.0);
        macroquad::shapes::draw_circle(
            center.x + base_radius * 0.6,
            center.y - base_radius * 0.6,
            base_radius * 0.2,
            to_macroquad_color(spark),
        );
    }
}

fn draw_blasts(blasts: &[BlastPresentation], metrics: &SceneMetrics) {
    for blast in blasts {
        let color = to_macroquad_color(Color::new(1.0, 0.62, 0.1, blast.intensity));
        let core = to_macroquad_color(Color::new(1.0, 0.95, 0.6, blast.intensity));
        for segment in &blast.segments {
            let origin = metrics.tile_origin(segment.tile);
            let center = metrics.tile_center(segment.tile);
            let (width, height) = match segment.direction {
                Some(Direction::East | Direction::West) => {
                    (metrics.tile_width, metrics.tile_height * 0.6)
                }
                Some(Direction::North | Direction::South) => {
                    (metrics.tile_width * 0.6, metrics.tile_height)
                }
                None => (metrics.tile_width, metrics.tile_height),
            };
            match segment.kind {
                BlastSegmentKind::Center => {
                    macroquad::shapes::draw_rectangle(
                        origin.x,
                        origin.y,
                        width,
                        height,
                        color,
                    );
                    macroquad::shapes::draw_circle(
                        center.x,
                        center.y,
                        width.min(height) * 0.3,
                        core,
                    );
                }
                BlastSegmentKind::Middle => {
                    macroquad::shapes::draw_rectangle(
                        center.x - width * 0.5,
                        center.y - height * 0.5,
                        width,
                        height,
                        color,
                    );
                }
                BlastSegmentKind::End => {
                    macroquad::shapes::draw_circle(
                        center.x,
                        center.y,
                        width.min(height) * 0.5,
                        color,
                    );
                }
            }
        }
    }
}

fn draw_monsters(monsters: &[MonsterPresentation], metrics: &SceneMetrics) {
    let radius = metrics.tile_width.min(metrics.tile_height) * 0.38;
    let body = to_macroquad_color(Color::from_rgb_u8(150, 70, 190));
    for monster in monsters {
        let center = metrics.tile_center(monster.tile);
        macroquad::shapes::draw_circle(center.x, center.y, radius, body);

        let (dx, dy) = monster.heading.offset();
        let eye = center + Vec2::new(dx as f32, dy as f32) * radius * 0.45;
        macroquad::shapes::draw_circle(eye.x, eye.y, radius * 0.25, macroquad::color::WHITE);
    }
}

fn draw_player(
    player: &PlayerPresentation,
    grid: &TileGridPresentation,
    metrics: &SceneMetrics,
) {
    let center = metrics.to_screen(grid.world_to_screen(player.position));
    let size = player.size * metrics.scale;
    let color = if player.alive {
        Color::from_rgb_u8(240, 240, 250)
    } else {
        Color::from_rgb_u8(120, 30, 30)
    };
    macroquad::shapes::draw_rectangle(
        center.x - size.x * 0.5,
        center.y - size.y * 0.5,
        size.x,
        size.y,
        to_macroquad_color(color),
    );
    macroquad::shapes::draw_rectangle_lines(
        center.x - size.x * 0.5,
        center.y - size.y * 0.5,
        size.x,
        size.y,
        2.0,
        macroquad::color::BLACK,
    );
}

fn hud_line(hud: &HudPresentation) -> String {
    format!(
        "Bombs {}/{}   Power {}   Monsters {}",
        hud.capacity.saturating_sub(hud.bombs_in_flight),
        hud.capacity,
        hud.power,
        hud.monsters_left
    )
}

fn draw_hud(hud: &HudPresentation, metrics: &SceneMetrics) {
    let _ = macroquad::text::draw_text(
        &hud_line(hud),
        metrics.offset_x + 8.0,
        HUD_HEIGHT * 0.7,
        24.0,
        macroquad::color::WHITE,
    );
}

fn draw_game_over(metrics: &SceneMetrics) {
    macroquad::shapes::draw_rectangle(
        metrics.offset_x,
        metrics.offset_y,
        metrics.grid_width,
        metrics.grid_height,
        to_macroquad_color(Color::new(0.0, 0.0, 0.0, 0.6)),
    );
    let font_size = 32;
    let dimensions = macroquad::text::measure_text(GAME_OVER_BANNER, None, font_size, 1.0);
    let _ = macroquad::text::draw_text(
        GAME_OVER_BANNER,
        metrics.offset_x + (metrics.grid_width - dimensions.width) * 0.5,
        metrics.offset_y + metrics.grid_height * 0.5,
        f32::from(font_size),
        macroquad::color::WHITE,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> TileGridPresentation {
        TileGridPresentation::new(10, 5, 40.0, 40.0, Color::from_rgb_u8(0, 0, 0))
            .expect("valid grid")
    }

    #[test]
    fn metrics_fit_grid_below_hud_and_center_horizontally() {
        let metrics = SceneMetrics::from_grid(&grid(), 1000.0, 236.0);

        assert_eq!(metrics.scale, 1.0);
        assert_eq!(metrics.offset_x, 300.0);
        assert_eq!(metrics.offset_y, HUD_HEIGHT);
        assert_eq!(metrics.tile_width, 40.0);
    }

    #[test]
    fn metrics_scale_down_to_fit_window() {
        let metrics = SceneMetrics::from_grid(&grid(), 200.0, 600.0);

        assert_eq!(metrics.scale, 0.5);
        assert_eq!(metrics.tile_height, 20.0);
        assert_eq!(
            metrics.tile_center(TileCoord::new(1, 1)),
            Vec2::new(30.0, metrics.offset_y + 30.0)
        );
    }

    #[test]
    fn natural_window_size_includes_hud() {
        let metrics = SceneMetrics::from_grid(&grid(), 0.0, 0.0);

        assert_eq!(metrics.natural_width(), 400);
        assert_eq!(metrics.natural_height(), 236);
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);

        for _ in 0..3 {
            assert!(counter
                .record_frame(frame, Duration::from_millis(2), Duration::from_millis(4))
                .is_none());
        }
        let metrics = counter
            .record_frame(frame, Duration::from_millis(2), Duration::from_millis(4))
            .expect("one second elapsed");

        assert_eq!(metrics.per_second, 4.0);
        assert_eq!(metrics.avg_update, Duration::from_millis(2));
        assert_eq!(metrics.avg_render, Duration::from_millis(4));
    }

    #[test]
    fn hud_line_shows_remaining_bombs() {
        let hud = HudPresentation {
            capacity: 3,
            bombs_in_flight: 1,
            power: 2,
            monsters_left: 4,
        };

        assert_eq!(hud_line(&hud), "Bombs 2/3   Power 2   Monsters 4");
    }
}
