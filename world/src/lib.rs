#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for the Nuclear Synthesis board.
//!
//! The world owns the tile collection, the canonical occupancy board, and the
//! gameplay phase machine. All mutation flows through [`apply`]: adapters and
//! systems submit [`Command`] values, the world validates them against its
//! invariants, and observers learn the outcome exclusively through the emitted
//! [`Event`] stream. Read access goes through the [`query`] module.
//!
//! A slide is resolved in two steps. Planning computes the fully settled
//! board and a motion schedule up front; the animation that follows merely
//! replays that schedule over time, firing fusions as moving tiles arrive.
//! When the last tile settles, the precomputed board becomes canonical and
//! the world returns to accepting input.

mod board;

use std::time::Duration;

use nuclear_synthesis_core::{
    Byproduct, CellCoord, CellPosition, Command, Direction, Event, Nuclide, Phase, SpawnError,
    TileId, TileSnapshot, TileView,
};
use nuclear_synthesis_system_reactions::ReactionTable;

use crate::board::{Board, SlidePlan};

/// Travel speed of in-flight tiles, in cell units per second.
pub const TILE_SPEED_CELLS_PER_SECOND: f32 = 13.0;

/// Distance from its target, in cell units, at which an in-flight tile snaps
/// into place and counts as arrived.
pub const ARRIVAL_TOLERANCE_CELLS: f32 = 0.16;

/// Grid side length used until a `ConfigureGrid` command arrives.
pub const DEFAULT_GRID_SIZE: u32 = 4;

/// Smallest grid side length the world accepts.
pub const MIN_GRID_SIZE: u32 = 2;

struct Tile {
    id: TileId,
    nuclide: Nuclide,
    cell: CellCoord,
    target: Option<CellCoord>,
    position: CellPosition,
    fusion: Option<ArmedFusion>,
}

impl Tile {
    fn settled(id: TileId, nuclide: Nuclide, cell: CellCoord) -> Self {
        Self {
            id,
            nuclide,
            cell,
            target: None,
            position: cell.anchor(),
            fusion: None,
        }
    }
}

/// Fusion scheduled by a slide, resolved when the active tile arrives.
struct ArmedFusion {
    passive: TileId,
    destination: CellCoord,
    product: Nuclide,
    byproducts: Vec<Byproduct>,
}

/// Fully resolved board waiting for the animation to finish.
struct PendingBoard {
    board: Board,
    spawn_due: bool,
}

/// Authoritative state mutated exclusively through [`apply`].
pub struct World {
    grid_size: u32,
    phase: Phase,
    tiles: Vec<Tile>,
    canonical: Board,
    staging: Option<PendingBoard>,
    reactions: ReactionTable,
    next_tile_id: u32,
}

impl World {
    /// Creates an empty world with the default grid and the built-in
    /// reaction table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            phase: Phase::AwaitingInput,
            tiles: Vec::new(),
            canonical: Board::new(DEFAULT_GRID_SIZE),
            staging: None,
            reactions: ReactionTable::builtin(),
            next_tile_id: 0,
        }
    }

    fn configure_grid(&mut self, size: u32, out_events: &mut Vec<Event>) {
        let size = size.max(MIN_GRID_SIZE);
        self.grid_size = size;
        self.reset_board();
        out_events.push(Event::GridConfigured { size });
        self.set_phase(Phase::AwaitingInput, out_events);
    }

    fn start_game(&mut self, out_events: &mut Vec<Event>) {
        self.reset_board();
        out_events.push(Event::GameStarted);
        self.set_phase(Phase::AwaitingInput, out_events);
    }

    fn reset_board(&mut self) {
        self.tiles.clear();
        self.canonical = Board::new(self.grid_size);
        self.staging = None;
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });
        if self.phase == Phase::Animating {
            self.advance_animation(dt, out_events);
        }
    }

    fn advance_animation(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let step = TILE_SPEED_CELLS_PER_SECOND * dt.as_secs_f32();
        let mut arrivals = Vec::new();
        for tile in &mut self.tiles {
            let Some(target) = tile.target else {
                continue;
            };
            let remaining = tile.position.advance_toward(target.anchor(), step);
            if remaining <= ARRIVAL_TOLERANCE_CELLS {
                tile.position = target.anchor();
                tile.cell = target;
                tile.target = None;
                arrivals.push(tile.id);
            }
        }

        for arrived in arrivals {
            self.resolve_fusion(arrived, out_events);
        }

        if self.tiles.iter().all(|tile| tile.target.is_none()) {
            self.settle(out_events);
        }
    }

    fn resolve_fusion(&mut self, active: TileId, out_events: &mut Vec<Event>) {
        let Some(index) = self.tiles.iter().position(|tile| tile.id == active) else {
            return;
        };
        let Some(fusion) = self.tiles[index].fusion.take() else {
            return;
        };

        let product = self.allocate_tile_id();
        let cell = fusion.destination;
        if let Some(pending) = self.staging.as_mut() {
            pending.board.place(cell, product);
        }
        self.tiles
            .retain(|tile| tile.id != active && tile.id != fusion.passive);
        self.tiles.push(Tile::settled(product, fusion.product, cell));
        out_events.push(Event::TilesFused {
            active,
            passive: fusion.passive,
            product,
            cell,
            nuclide: fusion.product,
            byproducts: fusion.byproducts,
        });
    }

    fn settle(&mut self, out_events: &mut Vec<Event>) {
        let Some(pending) = self.staging.take() else {
            return;
        };
        self.canonical = pending.board;
        self.set_phase(Phase::AwaitingInput, out_events);
        out_events.push(Event::BoardSettled {
            spawn_due: pending.spawn_due,
        });
    }

    fn slide(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.phase != Phase::AwaitingInput {
            out_events.push(Event::SlideIgnored { direction });
            return;
        }

        let plan = self.plan(direction);
        if plan.moves.is_empty() {
            out_events.push(Event::SlideIgnored { direction });
            return;
        }

        for planned in &plan.moves {
            if let Some(tile) = self.tile_mut(planned.tile) {
                tile.target = Some(planned.destination);
            }
        }
        for merge in plan.merges.iter().cloned() {
            if let Some(tile) = self.tile_mut(merge.active) {
                tile.fusion = Some(ArmedFusion {
                    passive: merge.passive,
                    destination: merge.destination,
                    product: merge.reaction.product,
                    byproducts: merge.reaction.byproducts,
                });
            }
        }

        out_events.push(Event::SlideStarted {
            direction,
            moves: plan.moves.len() as u32,
            merges: plan.merges.len() as u32,
        });
        self.staging = Some(PendingBoard {
            board: plan.resolved,
            spawn_due: true,
        });
        self.set_phase(Phase::Animating, out_events);
    }

    fn spawn_tile(&mut self, cell: CellCoord, nuclide: Nuclide, out_events: &mut Vec<Event>) {
        if !self.canonical.contains(cell) {
            out_events.push(Event::SpawnRejected {
                cell,
                reason: SpawnError::OutOfBounds,
            });
            return;
        }
        if self.canonical.is_full() {
            out_events.push(Event::SpawnRejected {
                cell,
                reason: SpawnError::BoardFull,
            });
            return;
        }
        if self.canonical.occupant(cell).is_some() {
            out_events.push(Event::SpawnRejected {
                cell,
                reason: SpawnError::Occupied,
            });
            return;
        }

        let id = self.allocate_tile_id();
        self.canonical.place(cell, id);
        self.tiles.push(Tile::settled(id, nuclide, cell));
        out_events.push(Event::TileSpawned {
            tile: id,
            cell,
            nuclide,
        });

        if self.canonical.is_full() && !self.any_slide_moves() {
            self.set_phase(Phase::GameOver, out_events);
            out_events.push(Event::GameEnded);
        }
    }

    fn plan(&self, direction: Direction) -> SlidePlan {
        board::plan_slide(&self.canonical, direction, &self.reactions, |id| {
            self.nuclide_of(id)
        })
    }

    fn any_slide_moves(&self) -> bool {
        Direction::ALL
            .iter()
            .any(|&direction| !self.plan(direction).moves.is_empty())
    }

    fn nuclide_of(&self, id: TileId) -> Option<Nuclide> {
        self.tiles
            .iter()
            .find(|tile| tile.id == id)
            .map(|tile| tile.nuclide)
    }

    fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|tile| tile.id == id)
    }

    fn allocate_tile_id(&mut self) -> TileId {
        let id = TileId::new(self.next_tile_id);
        self.next_tile_id += 1;
        id
    }

    fn set_phase(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        if self.phase != phase {
            self.phase = phase;
            out_events.push(Event::PhaseChanged { phase });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes a command against the world, appending resulting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { size } => world.configure_grid(size, out_events),
        Command::StartGame => world.start_game(out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::Slide { direction } => world.slide(direction, out_events),
        Command::SpawnTile { cell, nuclide } => world.spawn_tile(cell, nuclide, out_events),
    }
}

/// Read-only views over the world for adapters, systems, and tests.
pub mod query {
    use super::{CellCoord, Phase, TileId, TileSnapshot, TileView, World};

    /// Side length of the configured grid.
    #[must_use]
    pub fn grid_size(world: &World) -> u32 {
        world.grid_size
    }

    /// Phase the world currently occupies.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Snapshot of every live tile, ordered by identifier.
    #[must_use]
    pub fn tile_view(world: &World) -> TileView {
        TileView::from_snapshots(
            world
                .tiles
                .iter()
                .map(|tile| TileSnapshot {
                    id: tile.id,
                    nuclide: tile.nuclide,
                    cell: tile.cell,
                    target: tile.target,
                    position: tile.position,
                    merging: tile.fusion.is_some(),
                })
                .collect(),
        )
    }

    /// Cells of the canonical board that hold no tile.
    #[must_use]
    pub fn empty_cells(world: &World) -> Vec<CellCoord> {
        world.canonical.empty_cells()
    }

    /// Occupant of a canonical board cell, if any.
    #[must_use]
    pub fn occupant(world: &World, cell: CellCoord) -> Option<TileId> {
        world.canonical.occupant(cell)
    }
}
