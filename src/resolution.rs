//! Refutation by saturating the clause set under resolution

use crate::{Clause, Deadline, Report, Solver, Statistics, Status, CNF};
use anyhow::Result;
use serde::Serialize;
use std::{collections::BTreeSet, fmt, time::Duration};

/// Resolution refutation, which never claims satisfiability
///
/// The closure is computed semi-naively: every round resolves the clauses derived in the previous
/// round against every clause known so far, so no pair of old clauses is examined twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Absolute lower bound of the clause ceiling, `max(2 * initial + 5000, max_clauses)`
    pub max_clauses: usize,
    /// Pairs examined in a single round before the round is cut short
    ///
    /// A cut-short round deriving nothing new still ends the run as `UnknownSaturated`,
    /// but [ResolutionStats::saturated] stays false since unexamined pairs remain.
    pub max_pairs_per_round: usize,
    /// The deadline is polled whenever this many pairs have been examined within a round
    pub check_interval: usize,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            max_clauses: 1_000_000,
            max_pairs_per_round: 100_000,
            check_interval: 5_000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    /// Pairs of clauses examined
    pub resolutions: usize,
    /// Distinct clauses derived on top of the input
    pub clauses_generated: usize,
    pub rounds: usize,
    pub empty_clause_found: bool,
    /// Every pair of the last round was examined without deriving a new clause
    pub saturated: bool,
}

impl fmt::Display for ResolutionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "resolutions={} generated={} rounds={} empty_clause={} saturated={}",
            self.resolutions,
            self.clauses_generated,
            self.rounds,
            self.empty_clause_found,
            self.saturated
        )
    }
}

/// One of `Unsat`, `Timeout`, `UnknownSaturated` or `UnknownExplosion`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionOutcome {
    pub status: Status,
    pub stats: ResolutionStats,
}

impl Resolution {
    fn ceiling(&self, initial: usize) -> usize {
        (2 * initial + 5000).max(self.max_clauses)
    }

    pub fn run(&self, cnf: &CNF, deadline: &Deadline) -> Result<ResolutionOutcome> {
        cnf.validate()?;
        let mut stats = ResolutionStats::default();
        if cnf.has_empty_clause() {
            stats.empty_clause_found = true;
            return Ok(ResolutionOutcome {
                status: Status::Unsat,
                stats,
            });
        }

        let mut current: BTreeSet<Clause> = cnf.clauses().iter().cloned().collect();
        let initial = current.len();
        let ceiling = self.ceiling(initial);
        let mut frontier: Vec<Clause> = current.iter().cloned().collect();

        // Clauses of the unfinished round still count as generated when ⊥ is found
        let (status, pending) = 'rounds: loop {
            stats.rounds += 1;
            if let Err(err) = deadline.check() {
                log::debug!("Resolution round {}: {}", stats.rounds, err);
                break (Status::Timeout, 0);
            }

            let mut next_round = BTreeSet::new();
            let mut pairs = 0;
            let mut cut_short = false;
            'pairs: for new in &frontier {
                for existing in &current {
                    if pairs >= self.max_pairs_per_round {
                        log::debug!(
                            "Round {} cut short after {} pairs",
                            stats.rounds,
                            pairs
                        );
                        cut_short = true;
                        break 'pairs;
                    }
                    if new == existing {
                        continue;
                    }
                    if pairs % self.check_interval.max(1) == 0 && deadline.check().is_err() {
                        break 'rounds (Status::Timeout, 0);
                    }
                    stats.resolutions += 1;
                    pairs += 1;

                    let Some(resolvent) = new.resolve(existing) else {
                        continue;
                    };
                    if resolvent.is_empty() {
                        log::debug!("⊥ derived from {} and {}", new, existing);
                        stats.empty_clause_found = true;
                        break 'rounds (Status::Unsat, next_round.len());
                    }
                    if !current.contains(&resolvent) {
                        next_round.insert(resolvent);
                    }
                }
            }

            if next_round.is_empty() {
                stats.saturated = !cut_short;
                break (Status::UnknownSaturated, 0);
            }
            log::debug!(
                "Round {}: {} new clauses, {} in total",
                stats.rounds,
                next_round.len(),
                current.len() + next_round.len()
            );
            current.extend(next_round.iter().cloned());
            frontier = next_round.into_iter().collect();

            if current.len() > ceiling {
                log::warn!(
                    "Resolution clause set exceeded the limit ({} > {})",
                    current.len(),
                    ceiling
                );
                break (Status::UnknownExplosion, 0);
            }
        };

        stats.clauses_generated = current.len() + pending - initial;
        Ok(ResolutionOutcome { status, stats })
    }
}

impl Solver for Resolution {
    fn name(&self) -> &'static str {
        "Resolution"
    }

    fn solve(&mut self, cnf: &CNF, timeout: Duration) -> Result<Report> {
        let deadline = Deadline::new(timeout);
        let outcome = self.run(cnf, &deadline)?;
        Ok(Report {
            solver: self.name(),
            timeout,
            status: outcome.status,
            elapsed: deadline.elapsed(),
            statistics: Statistics::Resolution(outcome.stats),
            model: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clause, generator::Generator, testing};
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::{
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
        thread,
    };

    fn random_3cnf(num_variables: u32, num_clauses: usize, seed: u64) -> CNF {
        let generator = Generator {
            num_variables,
            num_clauses,
            clause_size: 3,
            planted: false,
        };
        generator
            .generate(&mut StdRng::seed_from_u64(seed))
            .unwrap()
            .0
    }

    fn run(cnf: CNF) -> ResolutionOutcome {
        Resolution::default()
            .run(&cnf, &Deadline::unbounded())
            .unwrap()
    }

    #[test]
    fn complementary_units() {
        let outcome = run(clause![1] & clause![-1]);
        assert_eq!(outcome.status, Status::Unsat);
        assert_eq!(outcome.stats.rounds, 1);
        assert_eq!(outcome.stats.resolutions, 1);
        assert!(outcome.stats.empty_clause_found);
    }

    #[test]
    fn empty_clause_is_unsat_without_work() {
        let outcome = run(CNF::new(3, vec![clause![1, 2], clause![]]));
        assert_eq!(outcome.status, Status::Unsat);
        assert_eq!(
            outcome.stats,
            ResolutionStats {
                empty_clause_found: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn satisfiable_saturates() {
        // Resolving on x1 gives x2 ∨ ¬x2, which is discarded
        let outcome = run(clause![1, 2] & clause![-1, -2]);
        assert_eq!(outcome.status, Status::UnknownSaturated);
        assert!(outcome.stats.saturated);
        assert!(!outcome.stats.empty_clause_found);
        assert_eq!(outcome.stats.clauses_generated, 0);
        assert_eq!(outcome.stats.rounds, 1);
    }

    #[test]
    fn empty_formula_saturates() {
        let outcome = run(CNF::new(2, vec![]));
        assert_eq!(outcome.status, Status::UnknownSaturated);
    }

    #[test]
    fn refutes_in_later_round() {
        // x1 ∨ x2, x1 ∨ ¬x2, ¬x1 ∨ x2, ¬x1 ∨ ¬x2
        let outcome = run(clause![1, 2] & clause![1, -2] & clause![-1, 2] & clause![-1, -2]);
        assert_eq!(outcome.status, Status::Unsat);
        assert_eq!(outcome.stats.rounds, 2);
        assert!(outcome.stats.clauses_generated >= 2);
    }

    #[test]
    fn zero_budget_times_out() {
        let cnf = clause![1, 2] & clause![-1, 2] & clause![-2, 3];
        let outcome = Resolution::default()
            .run(&cnf, &Deadline::new(Duration::ZERO))
            .unwrap();
        assert_eq!(outcome.status, Status::Timeout);
        assert_eq!(outcome.stats.resolutions, 0);
    }

    #[test]
    fn ceiling() {
        let solver = Resolution::default();
        assert_eq!(solver.ceiling(10), 1_000_000);
        assert_eq!(solver.ceiling(600_000), 1_205_000);
        let solver = Resolution {
            max_clauses: 0,
            ..Default::default()
        };
        assert_eq!(solver.ceiling(4), 5_008);
    }

    #[test]
    fn explosion() {
        let cnf = random_3cnf(8, 30, 1);
        let solver = Resolution {
            max_clauses: 0,
            ..Default::default()
        };
        let outcome = solver.run(&cnf, &Deadline::unbounded()).unwrap();
        assert_eq!(outcome.status, Status::UnknownExplosion);
        // Ceiling is 2 * 30 + 5000
        assert!(outcome.stats.clauses_generated + 30 > 5060);
        assert_eq!(outcome.stats.rounds, 4);
        assert!(!outcome.stats.saturated);
        assert!(!outcome.stats.empty_clause_found);
    }

    #[test]
    fn round_cut_short_is_not_saturated() {
        let cnf = clause![1, 2] & clause![-1, -2];
        let solver = Resolution {
            max_pairs_per_round: 1,
            ..Default::default()
        };
        let outcome = solver.run(&cnf, &Deadline::unbounded()).unwrap();
        assert_eq!(outcome.status, Status::UnknownSaturated);
        assert_eq!(outcome.stats.resolutions, 1);
        assert_eq!(outcome.stats.rounds, 1);
        assert!(!outcome.stats.saturated);
    }

    #[test]
    fn pair_cap_per_round() {
        // (x1 ∨ x2), (¬x1 ∨ x2), (x1 ∨ ¬x2), (¬x1 ∨ ¬x2) gives 12 ordered pairs in the first round
        let cnf = clause![1, 2] & clause![1, -2] & clause![-1, 2] & clause![-1, -2];
        let solver = Resolution {
            max_pairs_per_round: 5,
            ..Default::default()
        };
        let outcome = solver.run(&cnf, &Deadline::unbounded()).unwrap();
        assert_eq!(outcome.status, Status::Unsat);
        assert!(outcome.stats.resolutions <= 5 * outcome.stats.rounds);
    }

    #[test]
    fn canceled_within_round() {
        let cnf = random_3cnf(200, 1000, 0);
        let solver = Resolution {
            max_pairs_per_round: 1_000_000,
            check_interval: 1000,
            ..Default::default()
        };
        let token = Arc::new(AtomicBool::new(false));
        let deadline = Deadline::unbounded().with_cancel_token(token.clone());
        let canceler = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            token.store(true, Ordering::Relaxed);
        });
        let outcome = solver.run(&cnf, &deadline).unwrap();
        canceler.join().unwrap();

        assert_eq!(outcome.status, Status::Timeout);
        // Stopped at an in-round poll of the first round
        assert_eq!(outcome.stats.rounds, 1);
        assert!(outcome.stats.resolutions > 0);
        assert!(outcome.stats.resolutions < 1_000_000);
        assert_eq!(outcome.stats.resolutions % 1000, 0);
    }

    #[test]
    fn single_solution_cases_never_sat() {
        for (cnf, expected) in testing::single_solution_cases() {
            let outcome = run(cnf.clone());
            assert_ne!(outcome.status, Status::Sat);
            if expected.is_some() {
                assert_ne!(outcome.status, Status::Unsat, "Failed on {cnf:?}");
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn unsat_is_sound(cnf: CNF) {
            let outcome = Resolution::default()
                .run(&cnf, &Deadline::new(Duration::from_secs(5)))
                .unwrap();
            prop_assert_ne!(outcome.status, Status::Sat);
            if outcome.status == Status::Unsat {
                prop_assert!(testing::brute_force(&cnf).is_none(), "Refuted a satisfiable {:?}", cnf);
            }
        }
    }
}
