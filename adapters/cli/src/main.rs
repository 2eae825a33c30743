#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Nuclear Synthesis experience.
//!
//! The binary wires the pure systems to the authoritative world and hands the
//! resulting frame closure to the macroquad backend: control translates key
//! presses into commands, the world applies them, and spawning refills the
//! board in response to the emitted events.

use anyhow::Result;
use clap::Parser;
use glam::Vec2;
use nuclear_synthesis_core::{Phase, TileView};
use nuclear_synthesis_rendering::{
    GridPresentation, Presentation, RenderingBackend, Scene, TilePresentation, BACKGROUND_COLOR,
};
use nuclear_synthesis_rendering_macroquad::MacroquadBackend;
use nuclear_synthesis_system_bootstrap::Bootstrap;
use nuclear_synthesis_system_control::{Control, PlayerIntent};
use nuclear_synthesis_system_spawning::{Config as SpawningConfig, Spawning};
use nuclear_synthesis_world::{apply, query, World};
use rand::Rng;

const WINDOW_TITLE: &str = "2048 - Nuclear Synthesis";

/// Side length of a single tile in world units before screen scaling.
const TILE_LENGTH: f32 = 32.0;

/// Command-line options accepted by the Nuclear Synthesis binary.
#[derive(Debug, Parser)]
#[command(name = "nuclear-synthesis")]
struct Args {
    /// Number of rows and columns laid out in the grid.
    #[arg(long, default_value_t = 4)]
    grid_size: u32,
    /// Seed for the spawn stream; drawn from the thread RNG when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Print frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,
    /// Render as fast as possible instead of synchronising with the display.
    #[arg(long)]
    no_vsync: bool,
}

/// Entry point for the Nuclear Synthesis command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let seed = args
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen::<u64>());

    let mut world = World::new();
    let bootstrap = Bootstrap::default();
    println!("{}", bootstrap.welcome_banner());

    let mut pending_events = Vec::new();
    for command in bootstrap.initial_commands(args.grid_size) {
        apply(&mut world, command, &mut pending_events);
    }

    let mut control = Control::new();
    let mut spawning = Spawning::new(SpawningConfig::new(seed));

    // The initial spawns react to the bootstrap events before the first frame.
    let mut spawn_commands = Vec::new();
    spawning.handle(
        &pending_events,
        &query::empty_cells(&world),
        &mut spawn_commands,
    );
    for command in spawn_commands {
        apply(&mut world, command, &mut pending_events);
    }

    let grid = GridPresentation::new(query::grid_size(&world), TILE_LENGTH)?;
    let scene = Scene::new(grid, tile_presentations(&query::tile_view(&world)), false);
    let presentation = Presentation::new(WINDOW_TITLE, BACKGROUND_COLOR, scene);

    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps);

    backend.run(presentation, move |dt, frame_input, scene| {
        let intent = PlayerIntent {
            direction: frame_input.direction,
            restart: frame_input.restart,
        };

        let mut commands = Vec::new();
        control.handle(&pending_events, intent, dt, &mut commands);
        pending_events.clear();
        for command in commands {
            apply(&mut world, command, &mut pending_events);
        }

        let mut spawn_commands = Vec::new();
        spawning.handle(
            &pending_events,
            &query::empty_cells(&world),
            &mut spawn_commands,
        );
        for command in spawn_commands {
            apply(&mut world, command, &mut pending_events);
        }

        scene.tiles = tile_presentations(&query::tile_view(&world));
        scene.game_over = query::phase(&world) == Phase::GameOver;
    })
}

fn tile_presentations(view: &TileView) -> Vec<TilePresentation> {
    view.iter()
        .map(|snapshot| {
            TilePresentation::from_nuclide(
                Vec2::new(snapshot.position.x, snapshot.position.y),
                snapshot.nuclide,
            )
        })
        .collect()
}
