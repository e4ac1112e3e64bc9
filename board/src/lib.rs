// Copyright (C) 2025 Marceline Cramer
// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Pacifist is free software: you can redistribute it and/or modify it under
// the terms of the GNU Affero General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option) any
// later version.
//
// Pacifist is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for
// more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with Pacifist. If not, see <https://www.gnu.org/licenses/>.

use std::{fmt, str::FromStr};

use strum::{Display, EnumIter, EnumString};

pub mod line;
pub mod movement;
pub mod render;


pub use line::line_between;
pub use movement::{Movement, Ray};

pub type Result<T> = std::result::Result<T, ParseError>;

/// A square on an `size × size` board.
///
/// Cells are addressed by row and column, both zero-based. The row-major
/// index of a cell is `row * size + col`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Converts a row-major index back into a cell.
    pub fn from_index(index: usize, size: usize) -> Self {
        Self {
            row: index / size,
            col: index % size,
        }
    }

    /// Returns the row-major index of this cell.
    pub fn index(self, size: usize) -> usize {
        self.row * size + self.col
    }

    /// Tests if this cell lies on a board with the given size.
    pub fn in_bounds(self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    /// Moves this cell by a signed offset, returning `None` if it leaves the
    /// board.
    pub fn offset(self, d_row: isize, d_col: isize, size: usize) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Some(Self { row, col }).filter(|cell| cell.in_bounds(size))
    }

    /// Iterates every cell of a board in row-major order.
    pub fn all(size: usize) -> impl Iterator<Item = Cell> {
        (0..size * size).map(move |idx| Cell::from_index(idx, size))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl FromStr for Cell {
    type Err = ParseError;

    /// Parses a cell written as `ROW,COL`.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || ParseError::InvalidCell(s.to_string());
        let (row, col) = s.split_once(',').ok_or_else(bad)?;
        let row = row.trim().parse().map_err(|_| bad())?;
        let col = col.trim().parse().map_err(|_| bad())?;
        Ok(Self { row, col })
    }
}

/// The kinds of chess pieces that may be placed.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum PieceKind {
    #[strum(serialize = "queen", to_string = "Q")]
    Queen,

    #[strum(serialize = "rook", to_string = "R")]
    Rook,

    #[strum(serialize = "bishop", to_string = "B")]
    Bishop,

    #[strum(serialize = "knight", to_string = "N")]
    Knight,
}

impl PieceKind {
    /// The piece's movement pattern.
    pub fn movement(self) -> Movement {
        match self {
            PieceKind::Queen => Movement::Queen,
            PieceKind::Rook => Movement::Rook,
            PieceKind::Bishop => Movement::Bishop,
            PieceKind::Knight => Movement::Knight,
        }
    }
}

/// A request for some number of pieces of one kind.
///
/// Written as the piece letter followed by an optional count, like `Q8` or
/// `n`. A missing count means one piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SlotGroup {
    pub kind: PieceKind,
    pub count: usize,
}

impl FromStr for SlotGroup {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(s.len());

        let (kind, count) = s.split_at(split);

        let kind = kind
            .parse()
            .map_err(|_| ParseError::InvalidPiece(kind.to_string()))?;

        let count = match count {
            "" => 1,
            count => count
                .parse()
                .map_err(|_| ParseError::InvalidCount(count.to_string()))?,
        };

        Ok(Self { kind, count })
    }
}

/// A decoded piece on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    /// The kind of piece.
    pub kind: PieceKind,

    /// The one-based instance number of this piece within its kind.
    pub instance: usize,

    /// The cell the piece stands on.
    pub cell: Cell,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} at {}", self.kind, self.instance, self.cell)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown piece kind {0:?} (expected one of Q, R, B, N)")]
    InvalidPiece(String),

    #[error("invalid piece count {0:?}")]
    InvalidCount(String),

    #[error("invalid cell {0:?} (expected ROW,COL)")]
    InvalidCell(String),
}
