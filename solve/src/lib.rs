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

use std::fmt::Display;

use pacifist_board::Placement;
use pacifist_encode::{Formula, Slot};
use rustsat::{
    solvers::{Solve, SolverResult},
    types::{Clause, Var},
};
use tracing::{debug, info};


pub type Oracle = rustsat_batsat::BasicSolver;

pub type Result<T> = std::result::Result<T, SolveError>;

#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error(transparent)]
    Encode(#[from] pacifist_encode::Error),

    #[error("SAT backend failed: {0}")]
    Backend(String),

    #[error("model has {found} true position variables for slot {slot}")]
    MalformedModel { slot: String, found: usize },
}

fn backend(err: impl Display) -> SolveError {
    SolveError::Backend(err.to_string())
}

/// The outcome of solving a puzzle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Solution {
    /// The solver gave up before reaching an answer.
    Unknown,

    /// No placement meets the puzzle's requirements.
    Unsat,

    /// A placement was found.
    Sat {
        /// One placement per slot, in request order.
        placements: Vec<Placement>,
    },
}

impl Solution {
    /// Tests if the result is [Solution::Sat].
    pub fn is_sat(&self) -> bool {
        matches!(self, Solution::Sat { .. })
    }

    /// Tests if the result is [Solution::Unsat].
    pub fn is_unsat(&self) -> bool {
        matches!(self, Solution::Unsat)
    }

    /// The decoded placements, if any.
    pub fn placements(&self) -> Option<&[Placement]> {
        match self {
            Solution::Sat { placements } => Some(placements),
            _ => None,
        }
    }
}

/// Solves a [Formula] with a SAT oracle.
///
/// The solver borrows the formula so that it can decode models back into
/// the formula's slots.
pub struct Solver<'a> {
    formula: &'a Formula,
    oracle: Oracle,
}

impl<'a> Solver<'a> {
    /// Loads every clause of the formula into a fresh oracle.
    pub fn new(formula: &'a Formula) -> Result<Self> {
        let mut oracle = Oracle::default();
        for clause in formula.cnf().iter() {
            oracle.add_clause(clause.clone()).map_err(backend)?;
        }

        Ok(Self { formula, oracle })
    }

    /// Adds an extra clause on top of the formula.
    pub fn add_clause(&mut self, clause: Clause) -> Result<()> {
        self.oracle.add_clause(clause).map_err(backend)
    }

    /// Runs the oracle and decodes the model if there is one.
    pub fn solve(&mut self) -> Result<Solution> {
        // time solving
        let start = std::time::Instant::now();

        let result = self.oracle.solve().map_err(backend)?;

        debug!("solved in {:?}", start.elapsed());

        match result {
            SolverResult::Sat => {}
            SolverResult::Unsat => {
                info!("no placement exists");
                return Ok(Solution::Unsat);
            }
            SolverResult::Interrupted => return Ok(Solution::Unknown),
        }

        let placements = decode(self.formula.slots(), |var| self.value(var))?;
        info!("found placement of {} pieces", placements.len());
        Ok(Solution::Sat { placements })
    }

    /// Reads a variable from the last model; unassigned variables are false.
    pub fn value(&self, var: Var) -> Result<bool> {
        let value = self.oracle.var_val(var).map_err(backend)?;
        Ok(value.to_bool_with_def(false))
    }
}

/// Solves a formula once.
pub fn solve(formula: &Formula) -> Result<Solution> {
    Solver::new(formula)?.solve()
}

/// Recovers each slot's cell from a model.
///
/// Every slot must have exactly one true variable in its position block.
pub fn decode(
    slots: &[Slot],
    mut value: impl FnMut(Var) -> Result<bool>,
) -> Result<Vec<Placement>> {
    let mut placements = Vec::with_capacity(slots.len());
    for slot in slots {
        let mut cells = Vec::with_capacity(1);
        for (cell, var) in slot.position.iter() {
            if value(var)? {
                cells.push(cell);
            }
        }

        let [cell] = cells[..] else {
            return Err(SolveError::MalformedModel {
                slot: slot.name(),
                found: cells.len(),
            });
        };

        placements.push(Placement {
            kind: slot.kind,
            instance: slot.instance,
            cell,
        });
    }

    Ok(placements)
}
