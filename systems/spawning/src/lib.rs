#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that refills the board between slides.
//!
//! Spawns are driven purely by events: a fresh game receives two tiles, and
//! every settled slide that owes the board a spawn receives one. Cell and
//! nuclide selection draw from a seeded ChaCha stream, so identical seeds
//! replay identical games.

use nuclear_synthesis_core::{CellCoord, Command, Event, Nuclide};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of tiles placed when a fresh game begins.
const INITIAL_SPAWNS: usize = 2;

/// One-in-N odds that a spawned tile is deuterium instead of protium.
const DEUTERIUM_ODDS: u32 = 10;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that emits tile spawn commands after starts and settles.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the currently empty cells to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], empty_cells: &[CellCoord], out: &mut Vec<Command>) {
        let mut due = 0;
        for event in events {
            match event {
                Event::GameStarted => due += INITIAL_SPAWNS,
                Event::BoardSettled { spawn_due: true } => due += 1,
                _ => {}
            }
        }
        if due == 0 {
            return;
        }

        let mut available = empty_cells.to_vec();
        for _ in 0..due {
            if available.is_empty() {
                break;
            }
            let index = self.rng.gen_range(0..available.len());
            let cell = available.swap_remove(index);
            let nuclide = self.next_nuclide();
            out.push(Command::SpawnTile { cell, nuclide });
        }
    }

    fn next_nuclide(&mut self) -> Nuclide {
        if self.rng.gen_range(0..DEUTERIUM_ODDS) == 0 {
            Nuclide::DEUTERIUM
        } else {
            Nuclide::PROTIUM
        }
    }
}
