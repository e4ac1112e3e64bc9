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

use rustsat::{
    encodings::am1::{Commander, Encode, Pairwise},
    instances::Cnf,
    types::Lit,
};
use strum::{Display, EnumString};

use crate::{registry::Registry, Result};

/// The at-most-one encoding used by a [Cardinality] layer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AmoEncoding {
    /// Forbids every pair of literals. Adds no auxiliary variables.
    #[default]
    Pairwise,

    /// Groups literals under commander variables, with pairwise encodings at
    /// the leaves.
    Commander,
}

/// Builds cardinality constraints over literal sets.
///
/// Auxiliary variables are drawn from the [Registry], which keeps its
/// watermark above every id an encoding consumes.
#[derive(Copy, Clone, Debug, Default)]
pub struct Cardinality {
    pub encoding: AmoEncoding,
}

impl Cardinality {
    pub fn new(encoding: AmoEncoding) -> Self {
        Self { encoding }
    }

    /// Exactly one of `lits` is true.
    ///
    /// An empty literal set yields the empty clause.
    pub fn exactly_one(&self, lits: &[Lit], registry: &mut Registry) -> Result<Cnf> {
        let mut cnf = self.at_most_one(lits, registry)?;
        cnf.add_clause(lits.iter().copied().collect());
        Ok(cnf)
    }

    /// At most one of `lits` is true.
    pub fn at_most_one(&self, lits: &[Lit], registry: &mut Registry) -> Result<Cnf> {
        let mut cnf = Cnf::new();
        let lits = lits.iter().copied();

        match self.encoding {
            AmoEncoding::Pairwise => {
                let mut am1 = Pairwise::from_iter(lits);
                am1.encode(&mut cnf, registry)?;
            }
            AmoEncoding::Commander => {
                let mut am1 = Commander::<4, Pairwise>::from_iter(lits);
                am1.encode(&mut cnf, registry)?;
            }
        }

        Ok(cnf)
    }
}
