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

use pacifist_board::{line_between, Cell};
use rustsat::{
    instances::Cnf,
    types::{Clause, Lit},
};
use smallvec::{smallvec, SmallVec};
use tracing::trace;

use crate::{registry::VarGrid, Slot};

/// Encodes which cells a slot's piece attacks from each possible anchor.
///
/// For an anchor `a` with position literal `p`, every target `t` on one of
/// the piece's rays gets:
///
/// - `¬p ∨ C(t) ∨ o₁ ∨ … ∨ oₖ`, where `oᵢ` are the obstacles strictly between
///   `a` and `t`, so an unobstructed target is covered;
/// - `¬p ∨ ¬oᵢ ∨ ¬C(t)` for each `oᵢ`, so an obstructed target is not.
///
/// Every other cell, including `a` itself, gets `¬p ∨ ¬C(cell)`. Knight hops
/// have no intermediate cells, so their targets are covered unconditionally.
pub fn encode_movement(slot: &Slot, obstacles: &VarGrid) -> Cnf {
    let size = slot.position.size();
    let movement = slot.kind.movement();
    let mut cnf = Cnf::new();

    for anchor in Cell::all(size) {
        let pos = slot.position[anchor];
        let mut reachable = vec![false; size * size];

        for ray in movement.rays(anchor, size) {
            for target in ray {
                reachable[target.index(size)] = true;
                let cover = slot.coverage[target];

                let between = match movement.obstructible() {
                    true => line_between(anchor, target).unwrap_or_default(),
                    false => Vec::new(),
                };

                let mut reach: SmallVec<[Lit; 8]> = smallvec![pos.neg_lit(), cover.pos_lit()];
                for cell in between {
                    let obstacle = obstacles[cell];
                    reach.push(obstacle.pos_lit());
                    cnf.add_ternary(pos.neg_lit(), obstacle.neg_lit(), cover.neg_lit());
                }

                cnf.add_clause(Clause::from_iter(reach));
            }
        }

        for cell in Cell::all(size).filter(|cell| !reachable[cell.index(size)]) {
            cnf.add_binary(pos.neg_lit(), slot.coverage[cell].neg_lit());
        }
    }

    trace!("{} movement: {} clauses", slot.name(), cnf.len());

    cnf
}
