#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Nuclear Synthesis adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use nuclear_synthesis_core::{Direction, Nuclide};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Solid color used to clear each frame.
pub const BACKGROUND_COLOR: Color = Color::from_rgb_u8(0xfa, 0xf9, 0xed);

/// Fill color of the board behind the tiles.
pub const BOARD_COLOR: Color = Color::from_rgb_u8(0xb9, 0xaf, 0xa0);

/// Fill color of an unoccupied board cell.
pub const EMPTY_CELL_COLOR: Color = Color::from_rgb_u8(0xcc, 0xc3, 0xb3);

/// Color used for tile labels and overlay text.
pub const TEXT_COLOR: Color = Color::from_rgb_u8(0x8b, 0x83, 0x76);

/// Tile fill colors indexed by atomic number, hydrogen first.
const TILE_PALETTE: [Color; 11] = [
    Color::from_rgb_u8(0xee, 0xe4, 0xda),
    Color::from_rgb_u8(0xed, 0xe0, 0xc8),
    Color::from_rgb_u8(0xf2, 0xb1, 0x79),
    Color::from_rgb_u8(0xf5, 0x95, 0x63),
    Color::from_rgb_u8(0xf6, 0x7c, 0x5f),
    Color::from_rgb_u8(0xf6, 0x5e, 0x3b),
    Color::from_rgb_u8(0xed, 0xcf, 0x72),
    Color::from_rgb_u8(0xed, 0xcc, 0x61),
    Color::from_rgb_u8(0xed, 0xc8, 0x50),
    Color::from_rgb_u8(0xed, 0xc5, 0x3f),
    Color::from_rgb_u8(0xed, 0xc2, 0x2e),
];

const ELEMENT_SYMBOLS: [&str; 8] = ["H", "He", "Li", "Be", "B", "C", "N", "O"];

/// Fill color associated with an atomic number.
///
/// Elements heavier than the palette covers reuse its last entry.
#[must_use]
pub fn tile_color(atomic_number: u8) -> Color {
    match atomic_number {
        0 => EMPTY_CELL_COLOR,
        n => TILE_PALETTE
            .get(n as usize - 1)
            .copied()
            .unwrap_or(TILE_PALETTE[TILE_PALETTE.len() - 1]),
    }
}

/// Chemical symbol associated with an atomic number, when known.
#[must_use]
pub fn element_symbol(atomic_number: u8) -> Option<&'static str> {
    match atomic_number {
        0 => None,
        n => ELEMENT_SYMBOLS.get(n as usize - 1).copied(),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Directional slide the player pressed on this frame, if any.
    pub direction: Option<Direction>,
    /// Whether the adapter detected a restart press on this frame.
    pub restart: bool,
}

/// Describes the square board that frames the tiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of rows and columns laid out in the grid.
    pub size: u32,
    /// Side length of a single tile expressed in world units.
    pub tile_length: f32,
    /// Fill color of the board behind the tiles.
    pub board_color: Color,
    /// Fill color of an unoccupied cell.
    pub empty_cell_color: Color,
}

impl GridPresentation {
    /// Gap between neighbouring tiles as a fraction of the tile length.
    pub const PADDING_RATIO: f32 = 0.15;

    /// Creates a new grid descriptor.
    ///
    /// Returns an error when the grid has no cells or the tile length is not
    /// positive.
    pub fn new(size: u32, tile_length: f32) -> std::result::Result<Self, RenderingError> {
        if size == 0 {
            return Err(RenderingError::InvalidGridSize { size });
        }
        if tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            size,
            tile_length,
            board_color: BOARD_COLOR,
            empty_cell_color: EMPTY_CELL_COLOR,
        })
    }

    /// Gap between neighbouring tiles in world units.
    #[must_use]
    pub fn padding(&self) -> f32 {
        self.tile_length * Self::PADDING_RATIO
    }

    /// Distance between the origins of neighbouring cells.
    #[must_use]
    pub fn cell_stride(&self) -> f32 {
        self.tile_length + self.padding()
    }

    /// Side length of the whole board.
    #[must_use]
    pub fn span(&self) -> f32 {
        self.size as f32 * self.tile_length + (self.size - 1) as f32 * self.padding()
    }
}

/// Single tile rendered on the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Position of the tile's cell origin in cell units.
    pub position: Vec2,
    /// Fill color of the tile body.
    pub color: Color,
    /// Chemical symbol drawn at the tile's center.
    pub symbol: &'static str,
    /// Mass number drawn in the tile's corner.
    pub mass_number: u16,
}

impl TilePresentation {
    /// Creates a tile descriptor from a nuclide and its animated position.
    #[must_use]
    pub fn from_nuclide(position: Vec2, nuclide: Nuclide) -> Self {
        Self {
            position,
            color: tile_color(nuclide.atomic_number()),
            symbol: element_symbol(nuclide.atomic_number()).unwrap_or("?"),
            mass_number: nuclide.mass_number(),
        }
    }
}

/// Scene description combining the board and its tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board that composes the play area.
    pub grid: GridPresentation,
    /// Tiles currently visible, positioned in cell units.
    pub tiles: Vec<TilePresentation>,
    /// Whether the game has ended and the overlay should be shown.
    pub game_over: bool,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(grid: GridPresentation, tiles: Vec<TilePresentation>, game_over: bool) -> Self {
        Self {
            grid,
            tiles,
            game_over,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Nuclear Synthesis scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene
    /// before it is rendered, allowing adapters to animate world snapshots
    /// deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Grid size must be positive to describe a board.
    InvalidGridSize {
        /// Provided size that failed validation.
        size: u32,
    },
    /// Tile length must be positive to avoid a zero-sized board.
    InvalidTileLength {
        /// Provided tile length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGridSize { size } => {
                write!(f, "grid size must be positive (received {size})")
            }
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_creation_accepts_positive_dimensions() {
        let grid = GridPresentation::new(4, 32.0).expect("valid grid");
        assert_eq!(grid.size, 4);
        assert!((grid.padding() - 4.8).abs() < 1e-5);
        assert!((grid.span() - 4.0 * 32.0 - 3.0 * 4.8).abs() < 1e-4);
    }

    #[test]
    fn grid_creation_rejects_degenerate_dimensions() {
        assert!(matches!(
            GridPresentation::new(0, 32.0),
            Err(RenderingError::InvalidGridSize { size: 0 })
        ));
        assert!(matches!(
            GridPresentation::new(4, 0.0),
            Err(RenderingError::InvalidTileLength { .. })
        ));
    }

    #[test]
    fn palette_covers_known_elements_and_clamps_heavier_ones() {
        assert_eq!(tile_color(1), TILE_PALETTE[0]);
        assert_eq!(tile_color(11), TILE_PALETTE[10]);
        assert_eq!(tile_color(26), TILE_PALETTE[10]);
        assert_eq!(tile_color(0), EMPTY_CELL_COLOR);
    }

    #[test]
    fn element_symbols_cover_hydrogen_through_oxygen() {
        assert_eq!(element_symbol(1), Some("H"));
        assert_eq!(element_symbol(2), Some("He"));
        assert_eq!(element_symbol(8), Some("O"));
        assert_eq!(element_symbol(9), None);
        assert_eq!(element_symbol(0), None);
    }

    #[test]
    fn tile_presentation_derives_label_from_nuclide() {
        let tile = TilePresentation::from_nuclide(Vec2::new(1.0, 2.0), Nuclide::new(2, 4));
        assert_eq!(tile.symbol, "He");
        assert_eq!(tile.mass_number, 4);
        assert_eq!(tile.color, tile_color(2));
    }
}
