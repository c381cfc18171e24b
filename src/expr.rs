//! Clauses, formulas and assignments shared by every solver

mod assignment;
mod clause;
mod cnf;
mod literal;

pub use assignment::Assignment;
pub use clause::{Clause, ClauseState, Conflict};
pub use cnf::{simplify, CnfParameters, CNF};
pub use literal::Literal;
