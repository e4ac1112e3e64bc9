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

use pacifist_board::Cell;
use rustsat::{instances::Cnf, types::Clause};

use crate::{
    card::Cardinality,
    registry::{Registry, VarGrid},
    Result, Slot,
};

/// Every non-wall cell is occupied or attacked by at least one slot.
///
/// One clause per cell listing each slot's coverage and position variables
/// there. With no slots, every clause is empty and the formula is
/// unsatisfiable.
pub fn board_completion(size: usize, slots: &[Slot], walls: &[Cell]) -> Cnf {
    let mut cnf = Cnf::new();
    for cell in Cell::all(size).filter(|cell| !walls.contains(cell)) {
        let mut clause = Clause::new();
        for slot in slots {
            clause.add(slot.coverage[cell].pos_lit());
            clause.add(slot.position[cell].pos_lit());
        }

        cnf.add_clause(clause);
    }

    cnf
}

/// No two slots stand on the same cell.
pub fn cell_exclusivity(
    size: usize,
    slots: &[Slot],
    card: &Cardinality,
    registry: &mut Registry,
) -> Result<Cnf> {
    let mut cnf = Cnf::new();
    for cell in Cell::all(size) {
        let lits: Vec<_> = slots.iter().map(|slot| slot.position[cell].pos_lit()).collect();
        cnf.extend(card.at_most_one(&lits, registry)?);
    }

    Ok(cnf)
}

/// Ties the obstacle block to piece positions and walls.
///
/// On an open cell the obstacle variable is true exactly when some slot
/// stands there. A wall cell is always an obstacle and never occupied.
pub fn obstacle_merge(slots: &[Slot], obstacles: &VarGrid, walls: &[Cell]) -> Cnf {
    let mut cnf = Cnf::new();
    for (cell, obstacle) in obstacles.iter() {
        if walls.contains(&cell) {
            cnf.add_unit(obstacle.pos_lit());
            for slot in slots {
                cnf.add_unit(slot.position[cell].neg_lit());
            }

            continue;
        }

        let mut occupied = Clause::new();
        occupied.add(obstacle.neg_lit());
        for slot in slots {
            let pos = slot.position[cell];
            cnf.add_binary(pos.neg_lit(), obstacle.pos_lit());
            occupied.add(pos.pos_lit());
        }

        cnf.add_clause(occupied);
    }

    cnf
}

/// No slot attacks a cell that another slot stands on.
pub fn non_attack(size: usize, slots: &[Slot]) -> Cnf {
    let mut cnf = Cnf::new();
    for attacker in slots {
        for target in slots.iter().filter(|slot| slot.id != attacker.id) {
            for cell in Cell::all(size) {
                cnf.add_binary(
                    attacker.coverage[cell].neg_lit(),
                    target.position[cell].neg_lit(),
                );
            }
        }
    }

    cnf
}
