#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Nuclear Synthesis engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{cmp::Ordering, fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Nuclear Synthesis.";

/// Atomic identity carried by a tile: atomic number and mass number.
///
/// Nuclides order by atomic number first and mass number second, which is the
/// canonical pair order used by the reaction table.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Nuclide {
    atomic_number: u8,
    mass_number: u16,
}

impl Nuclide {
    /// Protium, the lightest hydrogen isotope.
    pub const PROTIUM: Nuclide = Nuclide::new(1, 1);
    /// Deuterium, the heavier spawnable hydrogen isotope.
    pub const DEUTERIUM: Nuclide = Nuclide::new(1, 2);

    /// Creates a new nuclide from its atomic number and mass number.
    #[must_use]
    pub const fn new(atomic_number: u8, mass_number: u16) -> Self {
        Self {
            atomic_number,
            mass_number,
        }
    }

    /// Number of protons in the nucleus.
    #[must_use]
    pub const fn atomic_number(&self) -> u8 {
        self.atomic_number
    }

    /// Number of nucleons in the nucleus.
    #[must_use]
    pub const fn mass_number(&self) -> u16 {
        self.mass_number
    }
}

impl fmt::Display for Nuclide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.atomic_number, self.mass_number)
    }
}

/// Unique identifier assigned to a tile by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Continuous cell-space anchor of this cell.
    #[must_use]
    pub fn anchor(&self) -> CellPosition {
        CellPosition::new(self.column as f32, self.row as f32)
    }
}

/// Continuous position expressed in cell units (1.0 spans one grid step).
///
/// Used only for animation; adapters scale cell units into pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellPosition {
    /// Horizontal coordinate in cell units, increasing with column index.
    pub x: f32,
    /// Vertical coordinate in cell units, increasing with row index.
    pub y: f32,
}

impl CellPosition {
    /// Creates a new continuous position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another position.
    #[must_use]
    pub fn distance_to(&self, other: CellPosition) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Moves this position toward `target` by at most `step` cell units.
    ///
    /// Returns the remaining distance after the move.
    #[must_use]
    pub fn advance_toward(&mut self, target: CellPosition, step: f32) -> f32 {
        let distance = self.distance_to(target);
        if distance <= f32::EPSILON {
            return 0.0;
        }

        let travel = step.min(distance);
        self.x += (target.x - self.x) / distance * travel;
        self.y += (target.y - self.y) / distance * travel;
        distance - travel
    }
}

/// Directional slide commands available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Slide toward decreasing column indices.
    Left,
    /// Slide toward decreasing row indices.
    Up,
    /// Slide toward increasing column indices.
    Right,
    /// Slide toward increasing row indices.
    Down,
}

impl Direction {
    /// All directions in deterministic order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// Counterclockwise quarter turns that normalize this direction to a
    /// leftward slide.
    #[must_use]
    pub const fn quarter_turns(&self) -> u32 {
        match self {
            Direction::Left => 0,
            Direction::Up => 1,
            Direction::Right => 2,
            Direction::Down => 3,
        }
    }
}

/// Gameplay phase advanced by the world's state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Accepting directional commands.
    AwaitingInput,
    /// Advancing in-flight tiles toward their targets.
    Animating,
    /// Board is full with no legal move remaining; only restart applies.
    GameOver,
}

/// Byproduct particle emitted by a fusion reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Particle {
    /// Electron (`e` tag in the rule text).
    Electron,
    /// Positron (`p` tag in the rule text).
    Positron,
    /// Photon (`g` tag in the rule text).
    Photon,
    /// Neutrino (`n` tag in the rule text).
    Neutrino,
}

impl Particle {
    /// Single-character tag used by the textual rule format.
    #[must_use]
    pub const fn tag(&self) -> char {
        match self {
            Particle::Electron => 'e',
            Particle::Positron => 'p',
            Particle::Photon => 'g',
            Particle::Neutrino => 'n',
        }
    }

    /// Decodes a particle from its textual tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "e" => Some(Particle::Electron),
            "p" => Some(Particle::Positron),
            "g" => Some(Particle::Photon),
            "n" => Some(Particle::Neutrino),
            _ => None,
        }
    }
}

/// Emission accompanying a fusion product.
///
/// Byproducts are decoded and reported on fusion events but never spawned as
/// board entities; they are an explicit extension point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Byproduct {
    /// A subatomic particle leaving the reaction.
    Particle(Particle),
    /// A light nucleus ejected by the reaction (e.g. the PPI protons).
    Nucleus(Nuclide),
}

/// Reasons a tile spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// The requested cell lies outside the configured grid.
    OutOfBounds,
    /// The requested cell already holds a tile.
    Occupied,
    /// No empty cell remains on the board.
    BoardFull,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the world's square grid using the provided side length.
    ConfigureGrid {
        /// Number of rows and columns laid out in the grid.
        size: u32,
    },
    /// Clears the board and begins a fresh game awaiting its initial spawns.
    StartGame,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Requests a directional slide of the whole board.
    Slide {
        /// Direction of the requested slide.
        direction: Direction,
    },
    /// Requests placement of a tile at an explicit cell.
    SpawnTile {
        /// Cell the tile should occupy.
        cell: CellCoord,
        /// Nuclide identity assigned to the tile.
        nuclide: Nuclide,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the grid was reconfigured.
    GridConfigured {
        /// Side length of the new grid.
        size: u32,
    },
    /// Announces that a fresh game began with an empty board.
    GameStarted,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the frame.
        dt: Duration,
    },
    /// Announces that the world entered a new phase.
    PhaseChanged {
        /// Phase that became active after processing commands.
        phase: Phase,
    },
    /// Confirms that a slide scheduled motion and animation began.
    SlideStarted {
        /// Direction of the slide.
        direction: Direction,
        /// Number of tiles that will travel to a new cell.
        moves: u32,
        /// Number of fusion reactions armed by the slide.
        merges: u32,
    },
    /// Reports that a slide changed nothing and was dropped.
    SlideIgnored {
        /// Direction of the ignored slide.
        direction: Direction,
    },
    /// Confirms that a tile was created on the board.
    TileSpawned {
        /// Identifier assigned to the new tile.
        tile: TileId,
        /// Cell the tile occupies.
        cell: CellCoord,
        /// Nuclide identity of the tile.
        nuclide: Nuclide,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Cell provided in the spawn request.
        cell: CellCoord,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Confirms that two tiles fused into a product on arrival.
    TilesFused {
        /// Tile that arrived and triggered the reaction.
        active: TileId,
        /// Stationary tile absorbed by the reaction.
        passive: TileId,
        /// Tile created to carry the reaction product.
        product: TileId,
        /// Cell where the product materialized.
        cell: CellCoord,
        /// Nuclide identity of the product.
        nuclide: Nuclide,
        /// Byproducts emitted by the reaction.
        byproducts: Vec<Byproduct>,
    },
    /// Announces that every tile settled and the staging board became
    /// canonical.
    BoardSettled {
        /// Whether the settled slide owes the board a fresh spawn.
        spawn_due: bool,
    },
    /// Reports that the board is full with no legal move remaining.
    GameEnded,
}

/// Immutable representation of a single tile's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct TileSnapshot {
    /// Unique identifier assigned to the tile.
    pub id: TileId,
    /// Nuclide identity carried by the tile.
    pub nuclide: Nuclide,
    /// Authoritative grid cell occupied once settled.
    pub cell: CellCoord,
    /// Destination cell while the tile is in flight.
    pub target: Option<CellCoord>,
    /// Continuous cell-space position used for animation.
    pub position: CellPosition,
    /// Whether the tile carries a pending fusion.
    pub merging: bool,
}

impl TileSnapshot {
    /// Reports whether the tile is currently in flight.
    #[must_use]
    pub fn moving(&self) -> bool {
        self.target.is_some()
    }
}

/// Read-only snapshot describing all live tiles on the board.
#[derive(Clone, Debug, Default)]
pub struct TileView {
    snapshots: Vec<TileSnapshot>,
}

impl TileView {
    /// Creates a new tile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of live tiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TileSnapshot> {
        self.snapshots
    }
}

/// Orders two nuclides into the canonical (lower, higher) pair.
#[must_use]
pub fn canonical_pair(a: Nuclide, b: Nuclide) -> (Nuclide, Nuclide) {
    match a.cmp(&b) {
        Ordering::Greater => (b, a),
        _ => (a, b),
    }
}
