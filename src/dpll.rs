//! DPLL backtracking search with unit propagation
//!
//! The search tree is walked depth first with an explicit [Trail] instead of recursion.
//! A search node is entered by propagating units under the assignment of the trail;
//! when unresolved clauses remain, the lowest unassigned variable is decided true in a new
//! decision level, and if that subtree fails the level is undone and false is tried instead.

mod propagation;
mod trail;

pub use propagation::{assign_pure_literals, unit_propagate};
pub use trail::{DecisionLevel, Reason, Trail};

use crate::{Deadline, Literal, Report, Solution, Solver, Statistics, CNF};
use anyhow::{ensure, Result};
use serde::Serialize;
use std::{fmt, time::Duration};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DPLL {
    /// Assign pure literals after unit propagation at every node
    pub pure_literal: bool,
    /// Maximum number of nested decisions. Exceeding it reports [Solution::ResourceExhausted].
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DpllStats {
    /// Variables branched on
    pub decisions: usize,
    pub unit_propagations: usize,
    /// Nodes which failed for both values of their variable
    pub backtracks: usize,
    pub pure_literals: usize,
}

impl fmt::Display for DpllStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "decisions={} propagations={} backtracks={}",
            self.decisions, self.unit_propagations, self.backtracks
        )?;
        if self.pure_literals > 0 {
            write!(f, " pure={}", self.pure_literals)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpllOutcome {
    pub solution: Solution,
    pub stats: DpllStats,
}

impl DPLL {
    pub fn run(&self, cnf: &CNF, deadline: &Deadline) -> Result<DpllOutcome> {
        cnf.validate()?;
        let mut stats = DpllStats::default();
        let solution = self.search(cnf, deadline, &mut stats)?;
        Ok(DpllOutcome { solution, stats })
    }

    fn search(&self, cnf: &CNF, deadline: &Deadline, stats: &mut DpllStats) -> Result<Solution> {
        if cnf.has_empty_clause() {
            log::debug!("DPLL: empty clause in the input");
            return Ok(Solution::UnSat);
        }

        let clauses = cnf.clauses();
        let num_variables = cnf.num_variables();
        let mut trail = Trail::default();

        'node: loop {
            if let Err(err) = deadline.check() {
                log::debug!("DPLL at level {}: {}", trail.level(), err);
                return Ok(Solution::Canceled);
            }

            // Explore this node, falling through to backtracking on failure
            match unit_propagate(clauses, &mut trail, stats) {
                Ok(()) => {
                    if self.pure_literal {
                        stats.pure_literals += assign_pure_literals(clauses, &mut trail);
                    }
                    if clauses
                        .iter()
                        .all(|clause| clause.is_satisfied_by(trail.assignment()))
                    {
                        let model = trail.assignment().completed(num_variables);
                        ensure!(
                            model.is_complete(num_variables),
                            "Model does not bind all {} variables: {}",
                            num_variables,
                            model
                        );
                        return Ok(Solution::Sat(model));
                    }
                    if let Some(id) = trail.assignment().first_unassigned(num_variables) {
                        if self.max_depth.is_some_and(|max| trail.level() >= max) {
                            log::warn!("DPLL search exceeded depth {}", trail.level());
                            return Ok(Solution::ResourceExhausted);
                        }
                        let decision = Literal::positive(id);
                        log::trace!("Decision: {}", decision);
                        stats.decisions += 1;
                        trail.decide(decision);
                        continue 'node;
                    }
                }
                Err(conflict) => {
                    log::trace!("{} at level {}", conflict, trail.level());
                }
            }

            // Backtrack to the innermost decision whose other value is untried
            loop {
                let Some(level) = trail.backtrack() else {
                    return Ok(Solution::UnSat);
                };
                let decision = level
                    .decision()
                    .expect("Only the root level has no decision");
                if !level.is_flipped() {
                    log::trace!("Decision: {}", !decision);
                    trail.decide_flipped(!decision);
                    continue 'node;
                }
                stats.backtracks += 1;
            }
        }
    }
}

impl Solver for DPLL {
    fn name(&self) -> &'static str {
        "DPLL"
    }

    fn solve(&mut self, cnf: &CNF, timeout: Duration) -> Result<Report> {
        let deadline = Deadline::new(timeout);
        let outcome = self.run(cnf, &deadline)?;
        Ok(Report {
            solver: self.name(),
            timeout,
            status: outcome.solution.status(),
            elapsed: deadline.elapsed(),
            statistics: Statistics::Dpll(outcome.stats),
            model: outcome.solution.as_sat().cloned(),
        })
    }
}
