//! Check a model against a formula

use crate::{Assignment, Clause, ClauseState, CNF};
use std::fmt;

/// First clause which a model fails to satisfy, with its 1-based index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Some literal of the clause is unassigned and none is true
    Unassigned { index: usize, clause: Clause },
    /// Every literal of the clause is false
    Falsified { index: usize, clause: Clause },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Unassigned { index, clause } => {
                write!(f, "Clause {} ({}) has unassigned literals", index, clause)
            }
            Violation::Falsified { index, clause } => {
                write!(f, "Clause {} ({}) is not satisfied", index, clause)
            }
        }
    }
}

impl std::error::Error for Violation {}

/// ```rust
/// use cnfsat::{clause, lit, verify::{verify, Violation}, Assignment};
///
/// let cnf = clause![1, 2] & clause![-1, 3];
/// let model: Assignment = [lit!(1), lit!(-2), lit!(3)].into_iter().collect();
/// assert!(verify(&cnf, &model).is_ok());
///
/// let model: Assignment = [lit!(1), lit!(-3)].into_iter().collect();
/// assert_eq!(
///     verify(&cnf, &model),
///     Err(Violation::Falsified { index: 2, clause: clause![-1, 3] })
/// );
/// ```
pub fn verify(cnf: &CNF, model: &Assignment) -> Result<(), Violation> {
    for (i, clause) in cnf.clauses().iter().enumerate() {
        match clause.evaluate(model) {
            ClauseState::Satisfied => {}
            ClauseState::Falsified => {
                return Err(Violation::Falsified {
                    index: i + 1,
                    clause: clause.clone(),
                })
            }
            ClauseState::Unit(_) | ClauseState::Unresolved => {
                return Err(Violation::Unassigned {
                    index: i + 1,
                    clause: clause.clone(),
                })
            }
        }
    }
    Ok(())
}
