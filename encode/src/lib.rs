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

//! Encodes chess-piece placement puzzles as CNF.
//!
//! A [Puzzle] lists the board size, any walls, and the pieces to place in
//! request order. [Puzzle::encode] allocates a position block and a coverage
//! block for each piece slot, emits a clause batch per movement generator and
//! global constraint, and merges them into a [Formula].

use std::io;

use pacifist_board::{Cell, PieceKind, SlotGroup};
use rustsat::{
    instances::{Cnf, ManageVars},
    types::Var,
};
use tracing::{debug, info};

pub mod card;
pub mod global;
pub mod movement;
pub mod registry;

#[cfg(test)]
pub mod tests;

use card::{AmoEncoding, Cardinality};
use registry::{Prop, Registry, VarGrid};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("proposition {0} was never allocated")]
    UnknownProp(Prop),

    #[error("proposition {0} is already allocated as {1:?}")]
    AlreadyAllocated(Prop, Var),

    #[error("cell {cell} is outside a board of size {size}")]
    CellOutOfBounds { cell: Cell, size: usize },

    #[error("out of memory while encoding cardinality constraints")]
    OutOfMemory(#[from] rustsat::OutOfMemory),
}

/// Which global requirements a solution must meet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Objective {
    /// No piece attacks another piece.
    pub peaceable: bool,

    /// Every open cell is occupied or attacked by some piece.
    pub dominate: bool,
}

impl Default for Objective {
    fn default() -> Self {
        Self {
            peaceable: true,
            dominate: false,
        }
    }
}

/// One requested piece awaiting placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    /// The index of this slot in request order.
    pub id: usize,

    /// The kind of piece.
    pub kind: PieceKind,

    /// The one-based instance number within this kind.
    pub instance: usize,

    /// One variable per cell, true where the piece stands.
    pub position: VarGrid,

    /// One variable per cell, true where the piece attacks.
    pub coverage: VarGrid,
}

impl Slot {
    /// A short name like `Q2` for the second queen.
    pub fn name(&self) -> String {
        format!("{}{}", self.kind, self.instance)
    }
}

/// A puzzle configuration.
#[derive(Clone, Debug)]
pub struct Puzzle {
    size: usize,
    walls: Vec<Cell>,
    groups: Vec<SlotGroup>,
    objective: Objective,
    amo: AmoEncoding,
}

impl Puzzle {
    /// Creates an empty puzzle on a `size × size` board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            walls: Vec::new(),
            groups: Vec::new(),
            objective: Objective::default(),
            amo: AmoEncoding::default(),
        }
    }

    /// Requests `count` more pieces of a kind.
    pub fn add(mut self, kind: PieceKind, count: usize) -> Self {
        self.groups.push(SlotGroup { kind, count });
        self
    }

    /// Requests a group of pieces.
    pub fn add_group(self, group: SlotGroup) -> Self {
        self.add(group.kind, group.count)
    }

    /// Marks a cell as a pre-placed wall.
    pub fn with_wall(mut self, cell: Cell) -> Self {
        if !self.walls.contains(&cell) {
            self.walls.push(cell);
        }

        self
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_amo(mut self, amo: AmoEncoding) -> Self {
        self.amo = amo;
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn walls(&self) -> &[Cell] {
        &self.walls
    }

    /// The total number of requested slots.
    pub fn slot_count(&self) -> usize {
        self.groups.iter().map(|group| group.count).sum()
    }

    /// Builds the CNF formula for this puzzle.
    pub fn encode(&self) -> Result<Formula> {
        let size = self.size;

        if let Some(cell) = self.walls.iter().find(|cell| !cell.in_bounds(size)) {
            return Err(Error::CellOutOfBounds { cell: *cell, size });
        }

        let card = Cardinality::new(self.amo);
        let mut registry = Registry::default();
        let mut cnf = Cnf::new();
        let obstacles = registry.allocate_grid(size, Prop::Obstacle)?;

        // allocate each slot and constrain its own blocks
        let mut slots: Vec<Slot> = Vec::with_capacity(self.slot_count());
        for group in self.groups.iter() {
            for _ in 0..group.count {
                let id = slots.len();
                let instance = 1 + slots.iter().filter(|s| s.kind == group.kind).count();
                let position =
                    registry.allocate_grid(size, |cell| Prop::Position { slot: id, cell })?;
                let coverage =
                    registry.allocate_grid(size, |cell| Prop::Coverage { slot: id, cell })?;

                let slot = Slot {
                    id,
                    kind: group.kind,
                    instance,
                    position,
                    coverage,
                };

                cnf.extend(card.exactly_one(&slot.position.pos_lits(), &mut registry)?);
                cnf.extend(movement::encode_movement(&slot, &obstacles));
                debug!("allocated slot {} (#{id})", slot.name());
                slots.push(slot);
            }
        }

        // tie the slots together
        if self.objective.dominate {
            cnf.extend(global::board_completion(size, &slots, &self.walls));
        }

        cnf.extend(global::cell_exclusivity(size, &slots, &card, &mut registry)?);
        cnf.extend(global::obstacle_merge(&slots, &obstacles, &self.walls));

        if self.objective.peaceable {
            cnf.extend(global::non_attack(size, &slots));
        }

        info!(
            "encoded {} slots on a {size}x{size} board: {} vars, {} clauses",
            slots.len(),
            registry.n_used(),
            cnf.len()
        );

        Ok(Formula {
            size,
            walls: self.walls.clone(),
            registry,
            slots,
            obstacles,
            cnf,
        })
    }
}

/// An encoded puzzle, ready to hand to a solver.
#[derive(Clone, Debug)]
pub struct Formula {
    size: usize,
    walls: Vec<Cell>,
    registry: Registry,
    slots: Vec<Slot>,
    obstacles: VarGrid,
    cnf: Cnf,
}

impl Formula {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn walls(&self) -> &[Cell] {
        &self.walls
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The piece slots in request order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn obstacles(&self) -> &VarGrid {
        &self.obstacles
    }

    pub fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// The number of variables, named and auxiliary.
    pub fn n_vars(&self) -> u32 {
        self.registry.n_used()
    }

    /// Writes the formula in DIMACS CNF format.
    pub fn write_dimacs(&self, mut out: impl io::Write) -> io::Result<()> {
        writeln!(
            out,
            "c {} slots on a {}x{} board",
            self.slots.len(),
            self.size,
            self.size
        )?;

        writeln!(out, "p cnf {} {}", self.n_vars(), self.cnf.len())?;

        for clause in self.cnf.iter() {
            for lit in clause.iter() {
                write!(out, "{} ", lit.to_ipasir())?;
            }

            writeln!(out, "0")?;
        }

        Ok(())
    }
}
