//! Random k-CNF formulas

use crate::{Assignment, Clause, Literal, CNF};
use anyhow::{bail, Result};
use rand::{seq::index, Rng};
use std::{collections::BTreeSet, num::NonZeroU32};

/// Uniform random k-CNF with distinct clauses over distinct variables
///
/// ```rust
/// use cnfsat::{generator::Generator, verify::verify};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let generator = Generator {
///     num_variables: 10,
///     num_clauses: 30,
///     clause_size: 3,
///     planted: true,
/// };
/// let (cnf, hidden) = generator.generate(&mut StdRng::seed_from_u64(42)).unwrap();
/// assert_eq!(cnf.len(), 30);
/// assert!(verify(&cnf, &hidden.unwrap()).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    pub num_variables: u32,
    pub num_clauses: usize,
    /// Literals per clause, often called `k`
    pub clause_size: usize,
    /// Draw a hidden assignment first and reject the clauses it falsifies
    pub planted: bool,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            num_variables: 20,
            num_clauses: 80,
            clause_size: 3,
            planted: false,
        }
    }
}

impl Generator {
    /// Returns the formula, and the hidden assignment if planted
    ///
    /// Fewer clauses are returned if not enough distinct ones are drawn
    /// within `100 * num_clauses` attempts.
    pub fn generate(&self, rng: &mut impl Rng) -> Result<(CNF, Option<Assignment>)> {
        let n = self.num_variables;
        let k = self.clause_size;
        if k == 0 {
            bail!("Clause size must be positive");
        }
        if n > 0 && k > n as usize {
            bail!("Clause size {} exceeds the number of variables {}", k, n);
        }
        if n == 0 {
            if self.num_clauses > 0 {
                log::warn!("No clauses can be generated without variables");
            }
            return Ok((CNF::default(), self.planted.then(Assignment::default)));
        }

        let hidden: Option<Assignment> = self.planted.then(|| {
            (1..=n)
                .filter_map(NonZeroU32::new)
                .map(|id| {
                    if rng.gen_bool(0.5) {
                        Literal::positive(id)
                    } else {
                        Literal::negative(id)
                    }
                })
                .collect()
        });

        let max_attempts = self.num_clauses.saturating_mul(100);
        let mut seen = BTreeSet::new();
        let mut clauses = Vec::with_capacity(self.num_clauses);
        let mut attempts = 0;
        while clauses.len() < self.num_clauses && attempts < max_attempts {
            attempts += 1;
            let literals: Vec<Literal> = index::sample(rng, n as usize, k)
                .into_iter()
                .filter_map(|i| NonZeroU32::new(i as u32 + 1))
                .map(|id| {
                    if rng.gen_bool(0.5) {
                        Literal::positive(id)
                    } else {
                        Literal::negative(id)
                    }
                })
                .collect();
            let clause = Clause::from_literals(&literals);
            if let Some(hidden) = &hidden {
                if !clause.is_satisfied_by(hidden) {
                    continue;
                }
            }
            if seen.insert(clause.clone()) {
                clauses.push(clause);
            }
        }

        if clauses.len() < self.num_clauses {
            log::warn!(
                "Only {} distinct clauses generated after {} attempts",
                clauses.len(),
                attempts
            );
        }
        log::info!(
            "Generated {} clauses over {} variables (k = {})",
            clauses.len(),
            n,
            k
        );
        Ok((CNF::new(n, clauses), hidden))
    }
}
