//! Classical CNF satisfiability: resolution refutation, Davis–Putnam elimination, and DPLL search

pub mod davis_putnam;
pub mod dimacs;
pub mod dpll;
mod expr;
pub mod generator;
pub mod report;
pub mod resolution;
mod timeout;
pub mod verify;

#[cfg(test)]
mod testing;

pub use davis_putnam::DavisPutnam;
pub use dpll::DPLL;
pub use expr::*;
pub use report::{Report, Statistics};
pub use resolution::Resolution;
pub use timeout::*;

use anyhow::Result;
use serde::Serialize;
use std::{fmt, time::Duration};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Solution {
    /// Find a satisfying assignment binding every variable
    Sat(Assignment),
    /// Prove unsatisfiability
    UnSat,
    /// Solver is canceled
    Canceled,
    /// Search grew deeper than allowed
    ResourceExhausted,
}

impl Solution {
    pub fn as_sat(&self) -> Option<&Assignment> {
        match self {
            Solution::Sat(model) => Some(model),
            _ => None,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Solution::Sat(_) => Status::Sat,
            Solution::UnSat => Status::Unsat,
            Solution::Canceled => Status::Timeout,
            Solution::ResourceExhausted => Status::ErrorResource,
        }
    }
}

/// Outcome of a solver run
///
/// Each solver only produces a subset of these.
/// `ErrorResource` is a fault of the search itself, reported apart from `Timeout` and `Unsat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Sat,
    Unsat,
    Timeout,
    UnknownSaturated,
    UnknownExplosion,
    ErrorResource,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Sat => "SAT",
            Status::Unsat => "UNSAT",
            Status::Timeout => "TIMEOUT",
            Status::UnknownSaturated => "UNKNOWN_SATURATED",
            Status::UnknownExplosion => "UNKNOWN_EXPLOSION",
            Status::ErrorResource => "ERROR_RESOURCE",
        };
        write!(f, "{}", s)
    }
}

pub trait Solver {
    fn name(&self) -> &'static str;

    /// Solve `cnf` within `timeout`
    ///
    /// Solver outcomes, including timeouts, are reported in [Report::status].
    /// `Err` is only returned for malformed input, e.g. a literal beyond the declared variables.
    fn solve(&mut self, cnf: &CNF, timeout: Duration) -> Result<Report>;
}
