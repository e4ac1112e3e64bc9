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

use crate::Cell;

/// Returns the cells strictly between two colinear cells, ordered from `from`
/// towards `to`.
///
/// Both endpoints are excluded, so adjacent cells (and a cell paired with
/// itself) yield an empty list. Returns `None` if the cells do not share a
/// row, a column, or a diagonal.
pub fn line_between(from: Cell, to: Cell) -> Option<Vec<Cell>> {
    let d_row = to.row as isize - from.row as isize;
    let d_col = to.col as isize - from.col as isize;

    // only straight lines have well-defined intermediate cells
    let colinear = d_row == 0 || d_col == 0 || d_row.abs() == d_col.abs();
    if !colinear {
        return None;
    }

    let step_row = d_row.signum();
    let step_col = d_col.signum();

    // the Chebyshev distance also covers the case where one delta is zero
    let distance = d_row.abs().max(d_col.abs());

    let between = (1..distance)
        .map(|step| Cell {
            row: (from.row as isize + step * step_row) as usize,
            col: (from.col as isize + step * step_col) as usize,
        })
        .collect();

    Some(between)
}
