use super::{DpllStats, Reason, Trail};
use crate::{Clause, ClauseState, Conflict, Literal};
use std::{collections::BTreeMap, num::NonZeroU32};

/// Boolean constraint propagation up to a fixpoint
///
/// Clauses are never rewritten: a clause is reduced implicitly by the assignment in `trail`,
/// i.e. satisfied clauses are skipped and false literals are ignored.
/// Every pass collects the unit clauses first, and then assigns their literals in the same order.
/// A unit whose literal has become false by then, or a clause with every literal false,
/// is a conflict.
pub fn unit_propagate(
    clauses: &[Clause],
    trail: &mut Trail,
    stats: &mut DpllStats,
) -> Result<(), Conflict> {
    loop {
        let mut units = Vec::new();
        for (index, clause) in clauses.iter().enumerate() {
            match clause.evaluate(trail.assignment()) {
                ClauseState::Satisfied | ClauseState::Unresolved => {}
                ClauseState::Falsified => {
                    return Err(Conflict {
                        clause: clause.clone(),
                    })
                }
                ClauseState::Unit(lit) => units.push((lit, index)),
            }
        }
        if units.is_empty() {
            return Ok(());
        }

        let mut assigned = false;
        for (lit, index) in units {
            match trail.assignment().value(lit) {
                None => {
                    log::trace!("Propagate {} by {}", lit, clauses[index]);
                    trail.push_implied(lit, Reason::Clause(index));
                    stats.unit_propagations += 1;
                    assigned = true;
                }
                Some(true) => {}
                Some(false) => {
                    return Err(Conflict {
                        clause: clauses[index].clone(),
                    })
                }
            }
        }
        if !assigned {
            return Ok(());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    Positive,
    Negative,
    Mixed,
}

/// Assign every pure literal, returning how many were assigned
///
/// Only unassigned literals of clauses not yet satisfied are considered.
/// Assigning pure literals only satisfies clauses, hence never conflicts.
pub fn assign_pure_literals(clauses: &[Clause], trail: &mut Trail) -> usize {
    let mut polarities: BTreeMap<NonZeroU32, Polarity> = BTreeMap::new();
    for clause in clauses {
        if clause.is_satisfied_by(trail.assignment()) {
            continue;
        }
        for &lit in clause.literals() {
            if trail.assignment().value(lit).is_some() {
                continue;
            }
            let polarity = if lit.positive {
                Polarity::Positive
            } else {
                Polarity::Negative
            };
            polarities
                .entry(lit.id)
                .and_modify(|current| {
                    if *current != polarity {
                        *current = Polarity::Mixed;
                    }
                })
                .or_insert(polarity);
        }
    }

    let mut assigned = 0;
    for (id, polarity) in polarities {
        let lit = match polarity {
            Polarity::Positive => Literal::positive(id),
            Polarity::Negative => Literal::negative(id),
            Polarity::Mixed => continue,
        };
        log::trace!("Pure literal {}", lit);
        trail.push_implied(lit, Reason::Pure);
        assigned += 1;
    }
    assigned
}
