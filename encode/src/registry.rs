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

use std::{fmt, ops::Index};

use indexmap::IndexMap;
use pacifist_board::Cell;
use rustsat::{
    instances::ManageVars,
    types::{Lit, Var},
};

use crate::{Error, Result};

/// A named Boolean proposition in the puzzle encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Prop {
    /// The piece in slot `slot` stands on `cell`.
    Position { slot: usize, cell: Cell },

    /// The piece in slot `slot` attacks `cell` from wherever it stands.
    Coverage { slot: usize, cell: Cell },

    /// The cell blocks sliding attacks.
    Obstacle(Cell),
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Position { slot, cell } => write!(f, "P{slot}{cell}"),
            Prop::Coverage { slot, cell } => write!(f, "C{slot}{cell}"),
            Prop::Obstacle(cell) => write!(f, "O{cell}"),
        }
    }
}

/// Allocates SAT variables for propositions.
///
/// Ids are handed out in strictly increasing order and are never reused.
/// Auxiliary variables requested through [ManageVars] come from the same
/// counter, so cardinality encodings never collide with named propositions.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    props: IndexMap<Prop, Var>,
    next_var: u32,
}

impl Registry {
    /// Assigns a fresh variable to a proposition that has not been seen yet.
    pub fn allocate(&mut self, prop: Prop) -> Result<Var> {
        if let Some(var) = self.props.get(&prop) {
            return Err(Error::AlreadyAllocated(prop, *var));
        }

        let var = self.new_var();
        self.props.insert(prop, var);
        Ok(var)
    }

    /// Looks up the variable previously allocated for a proposition.
    pub fn lookup(&self, prop: Prop) -> Result<Var> {
        self.props
            .get(&prop)
            .copied()
            .ok_or(Error::UnknownProp(prop))
    }

    /// The DIMACS id that the next allocated variable will receive.
    pub fn watermark(&self) -> u32 {
        self.next_var + 1
    }

    /// Allocates one proposition per cell of a board, in row-major order.
    pub fn allocate_grid(&mut self, size: usize, family: impl Fn(Cell) -> Prop) -> Result<VarGrid> {
        let vars = Cell::all(size)
            .map(|cell| self.allocate(family(cell)))
            .collect::<Result<_>>()?;

        Ok(VarGrid { size, vars })
    }

    /// The number of named propositions.
    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Iterates named propositions in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (Prop, Var)> + '_ {
        self.props.iter().map(|(prop, var)| (*prop, *var))
    }
}

impl ManageVars for Registry {
    fn new_var(&mut self) -> Var {
        let var = Var::new(self.next_var);
        self.next_var += 1;
        var
    }

    fn max_var(&self) -> Option<Var> {
        self.next_var.checked_sub(1).map(Var::new)
    }

    fn increase_next_free(&mut self, v: Var) -> bool {
        if v.idx32() > self.next_var {
            self.next_var = v.idx32();
            true
        } else {
            false
        }
    }

    fn combine(&mut self, other: Self) {
        for (prop, var) in other.props {
            self.props.entry(prop).or_insert(var);
        }

        self.next_var = self.next_var.max(other.next_var);
    }

    fn n_used(&self) -> u32 {
        self.next_var
    }

    fn forget_from(&mut self, min_var: Var) {
        self.props.retain(|_, var| *var < min_var);
        self.next_var = self.next_var.min(min_var.idx32());
    }
}

/// A block of variables, one per board cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarGrid {
    size: usize,
    vars: Vec<Var>,
}

impl VarGrid {
    /// The side length of the board this grid covers.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Iterates each cell with its variable in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Var)> + '_ {
        self.vars
            .iter()
            .enumerate()
            .map(|(idx, var)| (Cell::from_index(idx, self.size), *var))
    }

    /// The positive literal of every variable, in row-major order.
    pub fn pos_lits(&self) -> Vec<Lit> {
        self.vars.iter().map(|var| var.pos_lit()).collect()
    }
}

impl Index<Cell> for VarGrid {
    type Output = Var;

    fn index(&self, cell: Cell) -> &Var {
        &self.vars[cell.index(self.size)]
    }
}
