//! Davis–Putnam variable elimination
//!
//! Variables are eliminated in ascending order by replacing the clauses mentioning them
//! with their pairwise resolvents. A variable occurring with a single polarity is skipped,
//! and its clauses are carried forward untouched; such clauses may survive until the end,
//! in which case the formula is reported satisfiable without further checks.

use crate::{Clause, Deadline, Literal, Report, Solver, Statistics, Status, CNF};
use anyhow::Result;
use serde::Serialize;
use std::{collections::BTreeSet, fmt, num::NonZeroU32, time::Duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavisPutnam {
    /// Absolute lower bound of the clause ceiling, `max(2 * input + 5000, max_clauses)`
    pub max_clauses: usize,
}

impl Default for DavisPutnam {
    fn default() -> Self {
        Self {
            max_clauses: 1_000_000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DavisPutnamStats {
    /// Variables processed, including those skipped for occurring with a single polarity
    pub variables_eliminated: usize,
    /// Pairs of clauses resolved
    pub resolutions: usize,
    /// Largest clause collection observed
    pub max_clauses: usize,
}

impl fmt::Display for DavisPutnamStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "eliminated={} resolutions={} max_clauses={}",
            self.variables_eliminated, self.resolutions, self.max_clauses
        )
    }
}

/// One of `Sat`, `Unsat`, `Timeout` or `UnknownExplosion`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavisPutnamOutcome {
    pub status: Status,
    pub stats: DavisPutnamStats,
}

/// Result of eliminating a single variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Elimination {
    /// The clause collection after elimination
    Reduced {
        clauses: Vec<Clause>,
        resolutions: usize,
    },
    /// Some resolvent was empty
    Refuted { resolutions: usize },
}

/// Replace the clauses mentioning `id` by their pairwise resolvents
///
/// Clauses containing `x` go to the positive side even if they also contain `¬x`.
/// If either side is empty, nothing is resolved and the clauses are kept,
/// the others first followed by the positive and then the negative side.
///
/// ```rust
/// use cnfsat::{clause, davis_putnam::{eliminate, Elimination}};
/// use std::num::NonZeroU32;
///
/// let clauses = vec![clause![1, 2], clause![-1, 3], clause![2, 4]];
/// let x1 = NonZeroU32::new(1).unwrap();
/// assert_eq!(
///     eliminate(clauses, x1),
///     Elimination::Reduced {
///         clauses: vec![clause![2, 4], clause![2, 3]],
///         resolutions: 1,
///     }
/// );
/// ```
pub fn eliminate(clauses: Vec<Clause>, id: NonZeroU32) -> Elimination {
    let positive = Literal::positive(id);
    let negative = Literal::negative(id);

    let mut pos = Vec::new();
    let mut neg = Vec::new();
    let mut others = Vec::new();
    for clause in clauses {
        if clause.contains(positive) {
            pos.push(clause);
        } else if clause.contains(negative) {
            neg.push(clause);
        } else {
            others.push(clause);
        }
    }

    if pos.is_empty() || neg.is_empty() {
        others.append(&mut pos);
        others.append(&mut neg);
        return Elimination::Reduced {
            clauses: others,
            resolutions: 0,
        };
    }

    let mut resolvents = BTreeSet::new();
    let mut resolutions = 0;
    for p in &pos {
        for q in &neg {
            resolutions += 1;
            let resolvent = p.resolve_on(q, positive);
            if resolvent.is_empty() {
                return Elimination::Refuted { resolutions };
            }
            if !resolvent.is_tautology() {
                resolvents.insert(resolvent);
            }
        }
    }
    others.extend(resolvents);
    Elimination::Reduced {
        clauses: others,
        resolutions,
    }
}

impl DavisPutnam {
    fn ceiling(&self, input: usize) -> usize {
        (2 * input + 5000).max(self.max_clauses)
    }

    pub fn run(&self, cnf: &CNF, deadline: &Deadline) -> Result<DavisPutnamOutcome> {
        cnf.validate()?;
        let mut stats = DavisPutnamStats {
            max_clauses: cnf.len(),
            ..Default::default()
        };
        if cnf.has_empty_clause() {
            return Ok(DavisPutnamOutcome {
                status: Status::Unsat,
                stats,
            });
        }

        let ceiling = self.ceiling(cnf.len());
        let mut clauses = cnf.clauses().to_vec();
        for id in (1..=cnf.num_variables()).filter_map(NonZeroU32::new) {
            if let Err(err) = deadline.check() {
                log::debug!("Davis-Putnam at x{}: {}", id, err);
                return Ok(DavisPutnamOutcome {
                    status: Status::Timeout,
                    stats,
                });
            }

            stats.variables_eliminated += 1;
            clauses = match eliminate(clauses, id) {
                Elimination::Reduced {
                    clauses,
                    resolutions,
                } => {
                    stats.resolutions += resolutions;
                    clauses
                }
                Elimination::Refuted { resolutions } => {
                    stats.resolutions += resolutions;
                    log::debug!("⊥ derived while eliminating x{}", id);
                    return Ok(DavisPutnamOutcome {
                        status: Status::Unsat,
                        stats,
                    });
                }
            };
            stats.max_clauses = stats.max_clauses.max(clauses.len());
            log::debug!("Eliminated x{}: {} clauses remain", id, clauses.len());

            if clauses.len() > ceiling {
                log::warn!(
                    "Davis-Putnam clause set exceeded the limit ({} > {})",
                    clauses.len(),
                    ceiling
                );
                return Ok(DavisPutnamOutcome {
                    status: Status::UnknownExplosion,
                    stats,
                });
            }
        }

        let status = if clauses.is_empty() {
            Status::Sat
        } else if clauses.iter().any(Clause::is_empty) {
            Status::Unsat
        } else {
            log::warn!(
                "Davis-Putnam finished with {} clauses remaining, assuming SAT",
                clauses.len()
            );
            Status::Sat
        };
        Ok(DavisPutnamOutcome { status, stats })
    }
}

impl Solver for DavisPutnam {
    fn name(&self) -> &'static str {
        "Davis-Putnam"
    }

    fn solve(&mut self, cnf: &CNF, timeout: Duration) -> Result<Report> {
        let deadline = Deadline::new(timeout);
        let outcome = self.run(cnf, &deadline)?;
        Ok(Report {
            solver: self.name(),
            timeout,
            status: outcome.status,
            elapsed: deadline.elapsed(),
            statistics: Statistics::DavisPutnam(outcome.stats),
            model: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clause, testing};
    use proptest::prelude::*;

    fn run(cnf: CNF) -> DavisPutnamOutcome {
        DavisPutnam::default()
            .run(&cnf, &Deadline::unbounded())
            .unwrap()
    }

    fn x(id: u32) -> NonZeroU32 {
        NonZeroU32::new(id).unwrap()
    }

    #[test]
    fn eliminate_single_polarity_keeps_clauses() {
        let clauses = vec![clause![-1, 2], clause![3], clause![-1, -3]];
        assert_eq!(
            eliminate(clauses, x(1)),
            Elimination::Reduced {
                clauses: vec![clause![3], clause![-1, 2], clause![-1, -3]],
                resolutions: 0,
            }
        );
    }

    #[test]
    fn eliminate_discards_tautologies() {
        let clauses = vec![clause![1, 2], clause![-1, -2], clause![-1, 3]];
        assert_eq!(
            eliminate(clauses, x(1)),
            Elimination::Reduced {
                clauses: vec![clause![2, 3]],
                resolutions: 2,
            }
        );
    }

    #[test]
    fn eliminate_dedups_resolvents() {
        let clauses = vec![clause![1, 2], clause![1, 2, 3], clause![-1, 2]];
        assert_eq!(
            eliminate(clauses, x(1)),
            Elimination::Reduced {
                clauses: vec![clause![2], clause![2, 3]],
                resolutions: 2,
            }
        );
    }

    #[test]
    fn unsat_on_second_variable() {
        let outcome = run(clause![1, 2] & clause![1, -2] & clause![-1, 2] & clause![-1, -2]);
        assert_eq!(outcome.status, Status::Unsat);
        assert_eq!(
            outcome.stats,
            DavisPutnamStats {
                variables_eliminated: 2,
                resolutions: 5,
                max_clauses: 4,
            }
        );
    }

    #[test]
    fn complementary_units() {
        let outcome = run(clause![1] & clause![-1]);
        assert_eq!(outcome.status, Status::Unsat);
        assert_eq!(outcome.stats.resolutions, 1);
        assert_eq!(outcome.stats.variables_eliminated, 1);
    }

    #[test]
    fn refutation_counts_examined_pairs() {
        // [1, 2] x [-1] is examined before the refuting [1] x [-1]
        let outcome = run(clause![1, 2] & clause![1] & clause![-1]);
        assert_eq!(outcome.status, Status::Unsat);
        assert_eq!(
            outcome.stats,
            DavisPutnamStats {
                variables_eliminated: 1,
                resolutions: 2,
                max_clauses: 3,
            }
        );
    }

    #[test]
    fn residual_clauses_are_assumed_sat() {
        // x2 only occurs positively once x1 is gone
        let outcome = run(clause![1, 2] & clause![-1, 2] & clause![1, -2]);
        assert_eq!(outcome.status, Status::Sat);
        assert_eq!(
            outcome.stats,
            DavisPutnamStats {
                variables_eliminated: 2,
                resolutions: 2,
                max_clauses: 3,
            }
        );
    }

    #[test]
    fn explosion() {
        // x1 ∨ x{i} and ¬x1 ∨ x{80+i} for i in 2..=81 give 80 × 80 distinct resolvents
        let mut clauses = Vec::new();
        for i in 2..=81 {
            clauses.push(clause![1, i]);
            clauses.push(clause![-1, 80 + i]);
        }
        let cnf = CNF::from_clauses(clauses);
        let solver = DavisPutnam { max_clauses: 0 };
        let outcome = solver.run(&cnf, &Deadline::unbounded()).unwrap();
        // Ceiling is 2 * 160 + 5000 = 5320
        assert_eq!(outcome.status, Status::UnknownExplosion);
        assert_eq!(
            outcome.stats,
            DavisPutnamStats {
                variables_eliminated: 1,
                resolutions: 6400,
                max_clauses: 6400,
            }
        );

        // Under the default ceiling, every variable occurs with a single polarity after x1
        assert_eq!(run(cnf).status, Status::Sat);
    }

    #[test]
    fn empty_clause_is_unsat_without_work() {
        let outcome = run(CNF::new(2, vec![clause![1], clause![]]));
        assert_eq!(outcome.status, Status::Unsat);
        assert_eq!(outcome.stats.variables_eliminated, 0);
        assert_eq!(outcome.stats.resolutions, 0);
    }

    #[test]
    fn zero_budget_times_out() {
        let cnf = clause![1, 2] & clause![-1, 2];
        let outcome = DavisPutnam::default()
            .run(&cnf, &Deadline::new(Duration::ZERO))
            .unwrap();
        assert_eq!(outcome.status, Status::Timeout);
        assert_eq!(outcome.stats.variables_eliminated, 0);
    }

    #[test]
    fn single_solution_cases() {
        for (cnf, expected) in testing::single_solution_cases() {
            let expected = if expected.is_some() {
                Status::Sat
            } else {
                Status::Unsat
            };
            assert_eq!(run(cnf.clone()).status, expected, "Failed on {cnf:?}");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn agrees_with_brute_force(cnf: CNF) {
            let outcome = run(cnf.clone());
            let expected = if testing::brute_force(&cnf).is_some() {
                Status::Sat
            } else {
                Status::Unsat
            };
            prop_assert_eq!(outcome.status, expected, "Failed on {:?}", cnf);
        }
    }
}
