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

use std::collections::HashSet;

use pacifist_board::{Cell, Movement, PieceKind};
use rustsat::{
    instances::{Cnf, ManageVars},
    types::{Lit, Var},
};

use crate::{
    card::{AmoEncoding, Cardinality},
    global,
    movement::encode_movement,
    registry::{Prop, Registry},
    Error, Objective, Puzzle,
};

fn satisfied(cnf: &Cnf, truth: &HashSet<Var>) -> bool {
    cnf.iter()
        .all(|clause| clause.iter().any(|lit| truth.contains(&lit.var()) != lit.is_neg()))
}

/// Tests every assignment of `lits`, extended by any assignment to the vars
/// in `aux`, and returns which literal counts admit a satisfying extension.
fn satisfiable_counts(cnf: &Cnf, lits: &[Lit], aux: &[Var]) -> HashSet<usize> {
    let mut counts = HashSet::new();
    for mask in 0u32..(1 << lits.len()) {
        for aux_mask in 0u32..(1 << aux.len()) {
            let mut truth = HashSet::new();
            for (idx, lit) in lits.iter().enumerate() {
                if mask & (1 << idx) != 0 {
                    truth.insert(lit.var());
                }
            }

            for (idx, var) in aux.iter().enumerate() {
                if aux_mask & (1 << idx) != 0 {
                    truth.insert(*var);
                }
            }

            if satisfied(cnf, &truth) {
                counts.insert(mask.count_ones() as usize);
            }
        }
    }

    counts
}

fn fresh_lits(registry: &mut Registry, n: usize) -> Vec<Lit> {
    (0..n)
        .map(|idx| {
            let cell = Cell::new(0, idx);
            registry.allocate(Prop::Obstacle(cell)).unwrap().pos_lit()
        })
        .collect()
}

#[test]
fn registry_allocates_increasing_ids() {
    let mut registry = Registry::default();
    assert_eq!(registry.watermark(), 1);

    let a = registry.allocate(Prop::Obstacle(Cell::new(0, 0))).unwrap();
    let b = registry.allocate(Prop::Obstacle(Cell::new(0, 1))).unwrap();
    assert!(a < b);
    assert_eq!(a.pos_lit().to_ipasir(), 1);
    assert_eq!(b.pos_lit().to_ipasir(), 2);
    assert_eq!(registry.watermark(), 3);

    assert_eq!(registry.lookup(Prop::Obstacle(Cell::new(0, 1))).unwrap(), b);

    let props: Vec<_> = registry.iter().collect();
    assert_eq!(
        props,
        vec![
            (Prop::Obstacle(Cell::new(0, 0)), a),
            (Prop::Obstacle(Cell::new(0, 1)), b),
        ]
    );
}

#[test]
fn registry_lookup_unknown() {
    let registry = Registry::default();
    let prop = Prop::Coverage {
        slot: 3,
        cell: Cell::new(1, 1),
    };

    assert!(matches!(registry.lookup(prop), Err(Error::UnknownProp(p)) if p == prop));
}

#[test]
fn registry_rejects_duplicates() {
    let mut registry = Registry::default();
    let prop = Prop::Position {
        slot: 0,
        cell: Cell::new(2, 2),
    };

    let var = registry.allocate(prop).unwrap();
    assert!(matches!(registry.allocate(prop), Err(Error::AlreadyAllocated(p, v)) if p == prop && v == var));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.watermark(), 2);
}

#[test]
fn registry_grid_is_row_major() {
    let mut registry = Registry::default();
    let grid = registry
        .allocate_grid(3, |cell| Prop::Position { slot: 0, cell })
        .unwrap();

    let ids: Vec<i32> = grid.iter().map(|(_, var)| var.pos_lit().to_ipasir()).collect();
    assert_eq!(ids, (1..=9).collect::<Vec<_>>());
    assert_eq!(grid[Cell::new(1, 2)].pos_lit().to_ipasir(), 6);

    for (cell, var) in grid.iter() {
        let prop = Prop::Position { slot: 0, cell };
        assert_eq!(registry.lookup(prop).unwrap(), var);
    }
}

#[test]
fn registry_aux_vars_raise_watermark() {
    let mut registry = Registry::default();
    registry.allocate(Prop::Obstacle(Cell::new(0, 0))).unwrap();

    let aux = registry.new_var();
    assert_eq!(aux.pos_lit().to_ipasir(), 2);
    assert_eq!(registry.watermark(), 3);
    assert_eq!(registry.len(), 1);

    let named = registry.allocate(Prop::Obstacle(Cell::new(0, 1))).unwrap();
    assert_ne!(named, aux);
}

#[test]
fn pairwise_exactly_one() {
    let mut registry = Registry::default();
    let lits = fresh_lits(&mut registry, 5);
    let card = Cardinality::new(AmoEncoding::Pairwise);
    let cnf = card.exactly_one(&lits, &mut registry).unwrap();

    assert_eq!(registry.watermark(), 6);
    assert_eq!(satisfiable_counts(&cnf, &lits, &[]), HashSet::from([1]));
}

#[test]
fn pairwise_at_most_one() {
    let mut registry = Registry::default();
    let lits = fresh_lits(&mut registry, 4);
    let card = Cardinality::new(AmoEncoding::Pairwise);
    let cnf = card.at_most_one(&lits, &mut registry).unwrap();

    assert_eq!(cnf.len(), 6);
    assert_eq!(satisfiable_counts(&cnf, &lits, &[]), HashSet::from([0, 1]));
}

#[test]
fn commander_at_most_one() {
    let mut registry = Registry::default();
    let lits = fresh_lits(&mut registry, 9);
    let before = registry.n_used();

    let card = Cardinality::new(AmoEncoding::Commander);
    let cnf = card.exactly_one(&lits, &mut registry).unwrap();

    let aux: Vec<Var> = (before..registry.n_used()).map(Var::new).collect();
    assert_eq!(satisfiable_counts(&cnf, &lits, &aux), HashSet::from([1]));
}

#[test]
fn exactly_one_of_nothing_is_unsat() {
    let mut registry = Registry::default();
    let cnf = Cardinality::default().exactly_one(&[], &mut registry).unwrap();
    assert!(cnf.iter().any(|clause| clause.is_empty()));
}

#[test]
fn amo_encoding_parses() {
    assert_eq!("pairwise".parse(), Ok(AmoEncoding::Pairwise));
    assert_eq!("Commander".parse(), Ok(AmoEncoding::Commander));
    assert_eq!(AmoEncoding::Commander.to_string(), "commander");
}

/// Checks that, with a slot anchored at `anchor` and the given obstacles,
/// the movement clauses force coverage to be exactly the attacked cells.
fn check_coverage(kind: PieceKind, size: usize, anchor: Cell, blocked: &[Cell]) {
    let formula = Puzzle::new(size).add(kind, 1).encode().unwrap();
    let slot = &formula.slots()[0];
    let obstacles = formula.obstacles();
    let cnf = encode_movement(slot, obstacles);

    let attacked = kind
        .movement()
        .attacked(anchor, size, |cell| blocked.contains(&cell));

    let mut truth = HashSet::new();
    truth.insert(slot.position[anchor]);
    for cell in blocked {
        truth.insert(obstacles[*cell]);
    }

    for cell in attacked.iter() {
        truth.insert(slot.coverage[*cell]);
    }

    assert!(
        satisfied(&cnf, &truth),
        "{kind:?} at {anchor} with {blocked:?} rejects its true coverage"
    );

    // any deviation from the true coverage must be rejected
    for (cell, cover) in slot.coverage.iter() {
        let mut flipped = truth.clone();
        if !flipped.remove(&cover) {
            flipped.insert(cover);
        }

        assert!(
            !satisfied(&cnf, &flipped),
            "{kind:?} at {anchor} with {blocked:?} accepts flipped coverage at {cell}"
        );
    }
}

#[test]
fn bishop_coverage() {
    check_coverage(PieceKind::Bishop, 5, Cell::new(2, 2), &[]);
    check_coverage(PieceKind::Bishop, 5, Cell::new(0, 0), &[Cell::new(2, 2)]);
    check_coverage(PieceKind::Bishop, 5, Cell::new(2, 2), &[Cell::new(1, 1), Cell::new(3, 1)]);
}

#[test]
fn rook_coverage() {
    check_coverage(PieceKind::Rook, 5, Cell::new(0, 0), &[]);
    check_coverage(PieceKind::Rook, 5, Cell::new(2, 0), &[Cell::new(2, 2), Cell::new(4, 0)]);
    check_coverage(PieceKind::Rook, 5, Cell::new(3, 3), &[Cell::new(3, 4), Cell::new(0, 3)]);
}

#[test]
fn queen_coverage() {
    check_coverage(PieceKind::Queen, 5, Cell::new(2, 2), &[]);
    check_coverage(
        PieceKind::Queen,
        5,
        Cell::new(2, 2),
        &[Cell::new(1, 1), Cell::new(2, 4), Cell::new(4, 2)],
    );
    check_coverage(PieceKind::Queen, 4, Cell::new(0, 3), &[Cell::new(1, 2)]);
}

#[test]
fn knight_coverage() {
    check_coverage(PieceKind::Knight, 5, Cell::new(2, 2), &[]);
    check_coverage(PieceKind::Knight, 5, Cell::new(0, 0), &[Cell::new(0, 1), Cell::new(1, 1)]);
    check_coverage(PieceKind::Knight, 5, Cell::new(4, 3), &[Cell::new(2, 2), Cell::new(3, 3)]);
}

#[test]
fn knight_clauses_ignore_obstacles() {
    let formula = Puzzle::new(6).add(PieceKind::Knight, 1).encode().unwrap();
    let cnf = encode_movement(&formula.slots()[0], formula.obstacles());
    let obstacles: HashSet<Var> = formula.obstacles().iter().map(|(_, var)| var).collect();

    for clause in cnf.iter() {
        assert!(clause.len() == 2);
        for lit in clause.iter() {
            assert!(!obstacles.contains(&lit.var()));
        }
    }

    // one clause per anchor and cell
    assert_eq!(cnf.len(), 36 * 36);
}

#[test]
fn sliding_clauses_use_line_obstacles() {
    let size = 4;
    let formula = Puzzle::new(size).add(PieceKind::Rook, 1).encode().unwrap();
    let slot = &formula.slots()[0];
    let cnf = encode_movement(slot, formula.obstacles());

    // one reach clause per target, one per obstacle on its line, and one per
    // unreachable cell
    let per_anchor: usize = Cell::all(size)
        .map(|anchor| {
            let rays = Movement::Rook.rays(anchor, size);
            let targets: usize = rays.iter().map(|ray| ray.len()).sum();
            let obstructions: usize = rays
                .iter()
                .map(|ray| (0..ray.len()).sum::<usize>())
                .sum();
            targets + obstructions + (size * size - targets)
        })
        .sum();

    assert_eq!(cnf.len(), per_anchor);
}

#[test]
fn obstacle_merge_open_and_walls() {
    let wall = Cell::new(1, 1);
    let formula = Puzzle::new(3)
        .add(PieceKind::Rook, 2)
        .with_wall(wall)
        .encode()
        .unwrap();

    let slots = formula.slots();
    let obstacles = formula.obstacles();
    let cnf = global::obstacle_merge(slots, obstacles, formula.walls());

    // open cells: one clause per slot plus the disjunction; walls: units
    assert_eq!(cnf.len(), 8 * 3 + 3);

    let mut truth = HashSet::new();
    truth.insert(obstacles[wall]);
    truth.insert(slots[0].position[Cell::new(0, 0)]);
    truth.insert(obstacles[Cell::new(0, 0)]);
    truth.insert(slots[1].position[Cell::new(2, 1)]);
    truth.insert(obstacles[Cell::new(2, 1)]);
    assert!(satisfied(&cnf, &truth));

    // an obstacle with no piece on it
    let mut stray = truth.clone();
    stray.insert(obstacles[Cell::new(0, 2)]);
    assert!(!satisfied(&cnf, &stray));

    // a piece without its obstacle
    let mut hidden = truth.clone();
    hidden.remove(&obstacles[Cell::new(0, 0)]);
    assert!(!satisfied(&cnf, &hidden));

    // a piece on the wall
    let mut on_wall = truth.clone();
    on_wall.insert(slots[1].position[wall]);
    assert!(!satisfied(&cnf, &on_wall));
}

#[test]
fn board_completion_lists_every_slot() {
    let formula = Puzzle::new(3)
        .add(PieceKind::Queen, 1)
        .add(PieceKind::Knight, 2)
        .with_wall(Cell::new(0, 0))
        .encode()
        .unwrap();

    let cnf = global::board_completion(3, formula.slots(), formula.walls());
    assert_eq!(cnf.len(), 8);
    assert!(cnf.iter().all(|clause| clause.len() == 6));

    // standing on a cell dominates it
    let queen = &formula.slots()[0];
    let corner = Cell::new(2, 2);
    let occupied = HashSet::from([queen.position[corner]]);
    let dominated = cnf
        .iter()
        .filter(|clause| clause.iter().any(|lit| occupied.contains(&lit.var()) && lit.is_pos()))
        .count();
    assert_eq!(dominated, 1);

    let empty = global::board_completion(3, &[], &[]);
    assert!(empty.iter().all(|clause| clause.is_empty()));
}

#[test]
fn non_attack_pairs_every_slot() {
    let formula = Puzzle::new(4).add(PieceKind::Bishop, 3).encode().unwrap();
    let cnf = global::non_attack(4, formula.slots());
    assert_eq!(cnf.len(), 3 * 2 * 16);

    let single = Puzzle::new(4).add(PieceKind::Bishop, 1).encode().unwrap();
    assert_eq!(global::non_attack(4, single.slots()).len(), 0);
}

#[test]
fn slots_are_numbered_per_kind() {
    let formula = Puzzle::new(4)
        .add(PieceKind::Queen, 2)
        .add(PieceKind::Rook, 1)
        .add(PieceKind::Queen, 1)
        .encode()
        .unwrap();

    let names: Vec<String> = formula.slots().iter().map(|slot| slot.name()).collect();
    assert_eq!(names, ["Q1", "Q2", "R1", "Q3"]);

    let ids: Vec<usize> = formula.slots().iter().map(|slot| slot.id).collect();
    assert_eq!(ids, [0, 1, 2, 3]);
}

#[test]
fn wall_out_of_bounds() {
    let result = Puzzle::new(3)
        .add(PieceKind::Rook, 1)
        .with_wall(Cell::new(3, 0))
        .encode();

    assert!(matches!(result, Err(Error::CellOutOfBounds { size: 3, .. })));
}

#[test]
fn encoding_is_deterministic() {
    let puzzle = Puzzle::new(5)
        .add(PieceKind::Queen, 2)
        .add(PieceKind::Knight, 1)
        .with_wall(Cell::new(2, 2))
        .with_objective(Objective {
            peaceable: true,
            dominate: true,
        })
        .with_amo(AmoEncoding::Commander);

    let a = puzzle.encode().unwrap();
    let b = puzzle.encode().unwrap();

    assert!(a.registry().iter().eq(b.registry().iter()));
    assert_eq!(a.n_vars(), b.n_vars());
    assert!(a.cnf().iter().eq(b.cnf().iter()));
}

#[test]
fn every_clause_uses_allocated_vars() {
    let formula = Puzzle::new(4)
        .add(PieceKind::Queen, 2)
        .add(PieceKind::Bishop, 1)
        .with_amo(AmoEncoding::Commander)
        .with_objective(Objective {
            peaceable: true,
            dominate: true,
        })
        .encode()
        .unwrap();

    let watermark = formula.registry().watermark();
    for clause in formula.cnf().iter() {
        for lit in clause.iter() {
            let id = lit.var().pos_lit().to_ipasir() as u32;
            assert!(id >= 1 && id < watermark);
        }
    }
}

#[test]
fn dimacs_header_and_terminators() {
    let formula = Puzzle::new(2).add(PieceKind::Rook, 1).encode().unwrap();
    let mut out = Vec::new();
    formula.write_dimacs(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let mut lines = text.lines().filter(|line| !line.starts_with('c'));
    let header = lines.next().unwrap();
    assert_eq!(header, format!("p cnf {} {}", formula.n_vars(), formula.cnf().len()));

    let body: Vec<&str> = lines.collect();
    assert_eq!(body.len(), formula.cnf().len());
    assert!(body.iter().all(|line| line.ends_with(" 0") || *line == "0"));
}
