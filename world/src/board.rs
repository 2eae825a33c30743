//! Occupancy grid and directional slide planning.
//!
//! Sliding is planned in a rotated frame: the board is rotated so the
//! requested direction becomes a leftward slide, rows are compacted against
//! the provisional occupancy, and the resulting coordinates are rotated back.
//! Planning never mutates tiles; it produces a [`SlidePlan`] the world applies
//! in a second step.

use nuclear_synthesis_core::{CellCoord, Direction, Nuclide, TileId};
use nuclear_synthesis_system_reactions::{Reaction, ReactionTable};

/// Square grid mapping cells to tile occupants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Board {
    size: u32,
    cells: Vec<Option<TileId>>,
}

impl Board {
    pub(crate) fn new(size: u32) -> Self {
        Self {
            size,
            cells: vec![None; (size * size) as usize],
        }
    }

    pub(crate) fn size(&self) -> u32 {
        self.size
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.size && cell.column() < self.size
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<TileId> {
        self.index(cell).and_then(|index| self.cells[index])
    }

    pub(crate) fn place(&mut self, cell: CellCoord, tile: TileId) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = Some(tile);
        }
    }

    pub(crate) fn empty_cells(&self) -> Vec<CellCoord> {
        let mut empties = Vec::new();
        for row in 0..self.size {
            for column in 0..self.size {
                let cell = CellCoord::new(row, column);
                if self.occupant(cell).is_none() {
                    empties.push(cell);
                }
            }
        }
        empties
    }

    pub(crate) fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        self.contains(cell)
            .then(|| (cell.row() * self.size + cell.column()) as usize)
    }

    /// Copy of this board with every occupant remapped into `frame`.
    fn rotated(&self, frame: &Frame) -> Board {
        let mut rotated = Board::new(self.size);
        for row in 0..self.size {
            for column in 0..self.size {
                let cell = CellCoord::new(row, column);
                if let Some(tile) = self.occupant(cell) {
                    rotated.place(frame.to_rotated(cell), tile);
                }
            }
        }
        rotated
    }

    /// Copy of this board with every occupant remapped out of `frame`.
    fn restored(&self, frame: &Frame) -> Board {
        let mut restored = Board::new(self.size);
        for row in 0..self.size {
            for column in 0..self.size {
                let cell = CellCoord::new(row, column);
                if let Some(tile) = self.occupant(cell) {
                    restored.place(frame.to_original(cell), tile);
                }
            }
        }
        restored
    }
}

/// Rotation frame normalizing a slide direction to a leftward slide.
///
/// `to_rotated` and `to_original` are inverse quarter-turn rotations, so a
/// round trip through the frame restores the original coordinate.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Frame {
    size: u32,
    quarter_turns: u32,
}

impl Frame {
    pub(crate) fn new(size: u32, direction: Direction) -> Self {
        Self {
            size,
            quarter_turns: direction.quarter_turns(),
        }
    }

    /// Maps a board-frame cell into the rotated frame (counterclockwise).
    pub(crate) fn to_rotated(&self, cell: CellCoord) -> CellCoord {
        let mut mapped = cell;
        for _ in 0..self.quarter_turns {
            mapped = CellCoord::new(self.size - 1 - mapped.column(), mapped.row());
        }
        mapped
    }

    /// Maps a rotated-frame cell back into the board frame (clockwise).
    pub(crate) fn to_original(&self, cell: CellCoord) -> CellCoord {
        let mut mapped = cell;
        for _ in 0..self.quarter_turns {
            mapped = CellCoord::new(mapped.column(), self.size - 1 - mapped.row());
        }
        mapped
    }
}

/// Single tile relocation scheduled by a slide, in board-frame coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlannedMove {
    pub(crate) tile: TileId,
    pub(crate) destination: CellCoord,
}

/// Fusion armed by a slide, fired when the active tile arrives.
#[derive(Clone, Debug)]
pub(crate) struct PlannedMerge {
    pub(crate) active: TileId,
    pub(crate) passive: TileId,
    pub(crate) destination: CellCoord,
    pub(crate) reaction: Reaction,
}

/// Full resolution of one slide: the post-settle board plus the motion and
/// fusion schedule that produces it.
#[derive(Clone, Debug)]
pub(crate) struct SlidePlan {
    pub(crate) resolved: Board,
    pub(crate) moves: Vec<PlannedMove>,
    pub(crate) merges: Vec<PlannedMerge>,
}

/// Plans a directional slide against `board` without mutating it.
///
/// Rows are scanned near-edge first in the rotated frame. Each tile advances
/// through empty provisional cells; on hitting an occupant it either stops or,
/// when the reaction table admits the pair and the occupant is not already
/// fusing, takes the occupant's resolved cell as a fusion destination. A tile
/// participates in at most one fusion per slide.
pub(crate) fn plan_slide<F>(
    board: &Board,
    direction: Direction,
    reactions: &ReactionTable,
    nuclide_of: F,
) -> SlidePlan
where
    F: Fn(TileId) -> Option<Nuclide>,
{
    let size = board.size();
    let frame = Frame::new(size, direction);
    let rotated = board.rotated(&frame);

    let mut resolved = Board::new(size);
    let mut fusing: Vec<TileId> = Vec::new();
    let mut moves = Vec::new();
    let mut merges = Vec::new();

    for row in 0..size {
        for column in 0..size {
            let Some(tile) = rotated.occupant(CellCoord::new(row, column)) else {
                continue;
            };

            let mut resting = column;
            while resting > 0 {
                let ahead = CellCoord::new(row, resting - 1);
                match resolved.occupant(ahead) {
                    None => resting -= 1,
                    Some(blocker) => {
                        if fusing.contains(&blocker) {
                            break;
                        }
                        let reaction = nuclide_of(tile)
                            .zip(nuclide_of(blocker))
                            .and_then(|(a, b)| reactions.lookup(a, b));
                        let Some(reaction) = reaction else {
                            break;
                        };
                        fusing.push(tile);
                        merges.push(PlannedMerge {
                            active: tile,
                            passive: blocker,
                            destination: frame.to_original(ahead),
                            reaction: reaction.clone(),
                        });
                        resting -= 1;
                        break;
                    }
                }
            }

            let destination = CellCoord::new(row, resting);
            resolved.place(destination, tile);
            if resting != column {
                moves.push(PlannedMove {
                    tile,
                    destination: frame.to_original(destination),
                });
            }
        }
    }

    SlidePlan {
        resolved: resolved.restored(&frame),
        moves,
        merges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nuclear_synthesis_core::Direction;

    #[test]
    fn frame_rotations_are_inverse() {
        for direction in Direction::ALL {
            let frame = Frame::new(4, direction);
            for row in 0..4 {
                for column in 0..4 {
                    let cell = CellCoord::new(row, column);
                    assert_eq!(frame.to_original(frame.to_rotated(cell)), cell);
                    assert_eq!(frame.to_rotated(frame.to_original(cell)), cell);
                }
            }
        }
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        let frame = Frame {
            size: 5,
            quarter_turns: 4,
        };
        let cell = CellCoord::new(1, 3);
        assert_eq!(frame.to_rotated(cell), cell);
        assert_eq!(frame.to_original(cell), cell);
    }

    #[test]
    fn rotated_and_restored_round_trip_the_board() {
        let mut board = Board::new(4);
        board.place(CellCoord::new(0, 0), TileId::new(1));
        board.place(CellCoord::new(2, 3), TileId::new(2));
        board.place(CellCoord::new(3, 1), TileId::new(3));

        for direction in Direction::ALL {
            let frame = Frame::new(4, direction);
            assert_eq!(board.rotated(&frame).restored(&frame), board);
        }
    }

    #[test]
    fn out_of_bounds_cells_are_unoccupied_and_unplaceable() {
        let mut board = Board::new(2);
        let outside = CellCoord::new(2, 0);
        assert!(!board.contains(outside));
        board.place(outside, TileId::new(9));
        assert_eq!(board.occupant(outside), None);
        assert_eq!(board.empty_cells().len(), 4);
    }
}
