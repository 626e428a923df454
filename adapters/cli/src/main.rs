#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Bombing Adventure experience.

mod level;
mod simulation;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bombing_adventure_rendering::{Color, Presentation, RenderingBackend};
use bombing_adventure_rendering_macroquad::MacroquadBackend;
use clap::{Parser, ValueEnum};

use self::simulation::Simulation;

const WINDOW_TITLE: &str = "Bombing Adventure";

/// Command-line arguments accepted by the binary.
#[derive(Debug, Parser)]
#[command(name = "bombing-adventure", about = "Tile-based bomb-dropping arcade game")]
struct CliArgs {
    /// Level file to play; the built-in level is used when omitted.
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_enum, default_value_t = VsyncMode::On)]
    vsync: VsyncMode,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Advance this many fixed ticks without opening a window, then exit.
    #[arg(long, value_name = "TICKS")]
    headless_ticks: Option<u32>,
    /// Seed driving monster turns.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VsyncMode {
    On,
    Off,
}

/// Entry point for the Bombing Adventure command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();

    let level = match &args.level {
        Some(path) => level::load_level(path)?,
        None => level::default_level()?,
    };
    let mut simulation = Simulation::new(level, args.seed);

    if let Some(ticks) = args.headless_ticks {
        simulation.run_headless(ticks);
        return Ok(());
    }

    let scene = simulation.scene().context("failed to build the initial scene")?;
    let presentation = Presentation::new(WINDOW_TITLE, Color::from_rgb_u8(18, 18, 24), scene);

    MacroquadBackend::new()
        .with_vsync(args.vsync == VsyncMode::On)
        .with_show_fps(args.show_fps)
        .run(presentation, move |dt, input, scene| {
            simulation.handle_input(input);
            for event in simulation.advance(dt) {
                log::debug!("{event:?}");
            }
            simulation.populate_scene(scene);
        })
}
