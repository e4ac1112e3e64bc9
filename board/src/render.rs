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

use crate::{Cell, Placement};

/// Draws a board as text, one row per line.
///
/// Pieces are shown by letter, walls as `#`, and empty cells as `.`.
pub fn render(size: usize, placements: &[Placement], walls: &[Cell]) -> String {
    let mut grid = vec!['.'; size * size];

    for wall in walls.iter().filter(|cell| cell.in_bounds(size)) {
        grid[wall.index(size)] = '#';
    }

    for placement in placements.iter().filter(|p| p.cell.in_bounds(size)) {
        let letter = placement.kind.to_string().chars().next().unwrap_or('?');
        grid[placement.cell.index(size)] = letter;
    }

    let mut out = String::with_capacity(size * (size * 2 + 1));
    for row in grid.chunks(size.max(1)) {
        let line: Vec<String> = row.iter().map(char::to_string).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }

    out
}
