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

use std::{
    fs::File,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use pacifist_board::{render::render, Cell, SlotGroup};
use pacifist_encode::{card::AmoEncoding, Objective, Puzzle};
use pacifist_solve::Solution;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Places the pieces and prints the board.
    Solve {
        #[command(flatten)]
        puzzle: PuzzleArgs,
    },

    /// Writes the puzzle's CNF formula in DIMACS format.
    Encode {
        #[command(flatten)]
        puzzle: PuzzleArgs,

        /// The file to write to. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
pub struct PuzzleArgs {
    /// The side length of the board.
    #[arg(short, long, default_value_t = 8)]
    pub size: usize,

    /// The pieces to place, in order, like `Q8` or `R2 N`.
    #[arg(required = true, value_name = "PIECES")]
    pub pieces: Vec<SlotGroup>,

    /// A cell that blocks attacks and cannot be occupied.
    #[arg(long = "wall", value_name = "ROW,COL")]
    pub walls: Vec<Cell>,

    /// Require every open cell to be attacked.
    #[arg(long)]
    pub dominate: bool,

    /// Allow pieces to attack each other.
    #[arg(long)]
    pub allow_attacks: bool,

    /// The at-most-one encoding to use.
    #[arg(long, default_value_t = AmoEncoding::Pairwise)]
    pub amo: AmoEncoding,
}

impl PuzzleArgs {
    pub fn to_puzzle(&self) -> Puzzle {
        let objective = Objective {
            peaceable: !self.allow_attacks,
            dominate: self.dominate,
        };

        let mut puzzle = Puzzle::new(self.size)
            .with_objective(objective)
            .with_amo(self.amo);

        for group in self.pieces.iter() {
            puzzle = puzzle.add_group(*group);
        }

        for wall in self.walls.iter() {
            puzzle = puzzle.with_wall(*wall);
        }

        puzzle
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Encode(#[from] pacifist_encode::Error),

    #[error(transparent)]
    Solve(#[from] pacifist_solve::SolveError),

    #[error("failed to write formula: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let args = Args::parse();

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);

    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_env_var("PACIFIST_LOG")
        .with_default_directive("pacifist=info".parse().unwrap())
        .from_env()
        .expect("failed to parse logging directives");

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Solve { puzzle } => {
            let puzzle = puzzle.to_puzzle();
            let formula = puzzle.encode()?;

            match pacifist_solve::solve(&formula)? {
                Solution::Sat { placements } => {
                    print!("{}", render(puzzle.size(), &placements, puzzle.walls()));
                    for placement in placements.iter() {
                        println!("{placement}");
                    }
                }
                Solution::Unsat => println!("unsatisfiable"),
                Solution::Unknown => println!("unknown"),
            }
        }
        Command::Encode { puzzle, output } => {
            let formula = puzzle.to_puzzle().encode()?;

            match output {
                Some(path) => {
                    let mut file = io::BufWriter::new(File::create(path)?);
                    formula.write_dimacs(&mut file)?;
                    file.flush()?;
                }
                None => formula.write_dimacs(io::stdout().lock())?,
            }
        }
    }

    Ok(())
}
