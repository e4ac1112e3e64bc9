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

use smallvec::SmallVec;

use crate::Cell;

/// A sequence of cells radiating outward from an anchor, nearest first.
///
/// For sliding pieces, every cell on a ray is blocked by any occupied cell
/// earlier on the same ray. Rays never include the anchor itself.
pub type Ray = SmallVec<[Cell; 8]>;

const DIAGONALS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const ORTHOGONALS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const KNIGHT_HOPS: [(isize, isize); 8] = [
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (2, 1),
    (-2, 1),
    (2, -1),
    (-2, -1),
];

/// The movement pattern of a piece kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Movement {
    /// Slides along both diagonals.
    Bishop,

    /// Slides along its row and column.
    Rook,

    /// The union of [Movement::Bishop] and [Movement::Rook].
    Queen,

    /// Hops to fixed offsets; never blocked.
    Knight,
}

impl Movement {
    /// Whether pieces between the anchor and a target block the attack.
    pub fn obstructible(self) -> bool {
        !matches!(self, Movement::Knight)
    }

    /// Returns every ray from `anchor` on a board of the given size.
    ///
    /// Queen rays are the bishop rays followed by the rook rays. A knight's
    /// rays each hold a single landing cell. Empty rays are omitted.
    pub fn rays(self, anchor: Cell, size: usize) -> Vec<Ray> {
        match self {
            Movement::Bishop => slide(anchor, size, &DIAGONALS),
            Movement::Rook => slide(anchor, size, &ORTHOGONALS),
            Movement::Queen => {
                let mut rays = slide(anchor, size, &DIAGONALS);
                rays.extend(slide(anchor, size, &ORTHOGONALS));
                rays
            }
            Movement::Knight => KNIGHT_HOPS
                .iter()
                .filter_map(|&(d_row, d_col)| anchor.offset(d_row, d_col, size))
                .map(|cell| SmallVec::from_slice(&[cell]))
                .collect(),
        }
    }

    /// Computes the cells attacked from `anchor`, given which cells are
    /// occupied.
    ///
    /// Attacks stop at the first occupied cell on each ray, which is itself
    /// attacked. The anchor is not attacked.
    pub fn attacked(self, anchor: Cell, size: usize, occupied: impl Fn(Cell) -> bool) -> Vec<Cell> {
        let obstructible = self.obstructible();
        let mut attacked = Vec::new();
        for ray in self.rays(anchor, size) {
            for cell in ray {
                attacked.push(cell);
                if obstructible && occupied(cell) {
                    break;
                }
            }
        }

        attacked
    }
}

fn slide(anchor: Cell, size: usize, directions: &[(isize, isize)]) -> Vec<Ray> {
    let mut rays = Vec::with_capacity(directions.len());
    for &(d_row, d_col) in directions {
        let mut ray = Ray::new();
        let mut cursor = anchor;
        while let Some(next) = cursor.offset(d_row, d_col, size) {
            ray.push(next);
            cursor = next;
        }

        if !ray.is_empty() {
            rays.push(ray);
        }
    }

    rays
}
