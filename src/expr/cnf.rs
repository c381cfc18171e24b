use super::{Assignment, Clause, Conflict, Literal};
use anyhow::{ensure, Result};
use proptest::prelude::*;
use std::{fmt, num::NonZeroU32, ops::BitAnd};

/// Formula in Conjunctive Normal Form
///
/// Clauses are kept in input order, and duplicates are allowed.
///
/// ```rust
/// use cnfsat::{clause, CNF};
///
/// let cnf = clause![1, 2] & clause![-1] & clause![3];
/// assert_eq!(cnf.num_variables(), 3);
/// assert_eq!(cnf.to_string(), "(x1 ∨ x2) ∧ ¬x1 ∧ x3");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct CNF {
    num_variables: u32,
    clauses: Vec<Clause>,
}

impl CNF {
    /// Formula over variables `1..=num_variables`
    pub fn new(num_variables: u32, clauses: Vec<Clause>) -> Self {
        Self {
            num_variables,
            clauses,
        }
    }

    /// Formula whose variable count is the largest ID in `clauses`
    pub fn from_clauses(clauses: Vec<Clause>) -> Self {
        let num_variables = clauses
            .iter()
            .filter_map(Clause::max_id)
            .max()
            .map_or(0, NonZeroU32::get);
        Self::new(num_variables, clauses)
    }

    pub fn num_variables(&self) -> u32 {
        self.num_variables
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Number of clauses
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    pub fn add_clause(&mut self, clause: Clause) {
        if let Some(id) = clause.max_id() {
            self.num_variables = self.num_variables.max(id.get());
        }
        self.clauses.push(clause);
    }

    /// Check that every literal refers to a variable in `1..=num_variables`
    pub fn validate(&self) -> Result<()> {
        for (i, clause) in self.clauses.iter().enumerate() {
            if let Some(id) = clause.max_id() {
                ensure!(
                    id.get() <= self.num_variables,
                    "Clause {} ({}) refers to x{} beyond the declared {} variables",
                    i + 1,
                    clause,
                    id,
                    self.num_variables
                );
            }
        }
        Ok(())
    }
}

/// Drop satisfied clauses, and strip false literals from the others
///
/// ```rust
/// use cnfsat::{clause, lit, simplify, Assignment};
///
/// let clauses = vec![clause![1, 2], clause![-1, 3], clause![2, 3]];
/// let assignment: Assignment = [lit!(1)].into_iter().collect();
/// assert_eq!(
///     simplify(&clauses, &assignment).unwrap(),
///     vec![clause![3], clause![2, 3]]
/// );
///
/// let assignment: Assignment = [lit!(1), lit!(-3)].into_iter().collect();
/// assert_eq!(simplify(&clauses, &assignment).unwrap_err().clause, clause![-1, 3]);
/// ```
pub fn simplify(clauses: &[Clause], assignment: &Assignment) -> Result<Vec<Clause>, Conflict> {
    let mut simplified = Vec::with_capacity(clauses.len());
    for clause in clauses {
        if let Some(reduced) = clause.simplify(assignment) {
            if reduced.is_empty() {
                return Err(Conflict {
                    clause: clause.clone(),
                });
            }
            simplified.push(reduced);
        }
    }
    Ok(simplified)
}

impl From<Clause> for CNF {
    fn from(clause: Clause) -> Self {
        Self::from_clauses(vec![clause])
    }
}

impl From<Literal> for CNF {
    fn from(lit: Literal) -> Self {
        Self::from(Clause::from(lit))
    }
}

impl BitAnd<Clause> for CNF {
    type Output = CNF;
    fn bitand(mut self, rhs: Clause) -> Self::Output {
        self.add_clause(rhs);
        self
    }
}

impl BitAnd for CNF {
    type Output = CNF;
    fn bitand(mut self, rhs: CNF) -> Self::Output {
        self.num_variables = self.num_variables.max(rhs.num_variables);
        self.clauses.extend(rhs.clauses);
        self
    }
}

impl fmt::Display for CNF {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "⊤");
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ∧ ")?;
            }
            if clause.len() > 1 {
                write!(f, "({})", clause)?;
            } else {
                write!(f, "{}", clause)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CNF {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[n={}] {}", self.num_variables, self)
    }
}

/// Size limits for generating [CNF] in property tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CnfParameters {
    pub max_variables: u32,
    pub max_clauses: usize,
    pub max_clause_len: usize,
}

impl Default for CnfParameters {
    fn default() -> Self {
        Self {
            max_variables: 5,
            max_clauses: 8,
            max_clause_len: 4,
        }
    }
}

impl Arbitrary for CNF {
    type Parameters = CnfParameters;
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(params: Self::Parameters) -> Self::Strategy {
        let CnfParameters {
            max_variables,
            max_clauses,
            max_clause_len,
        } = params;
        let max_variables = max_variables.max(1);
        let literal = (1..=max_variables as i32, any::<bool>())
            .prop_map(|(id, positive)| Literal::new(if positive { id } else { -id }));
        let clause = proptest::collection::vec(literal, 0..=max_clause_len)
            .prop_map(|literals| Clause::from_literals(&literals));
        (
            1..=max_variables,
            proptest::collection::vec(clause, 0..=max_clauses),
        )
            .prop_map(move |(extra, clauses)| {
                let inferred = CNF::from_clauses(clauses);
                // Declare some variables that may not occur in any clause
                let num_variables = inferred.num_variables.max(extra);
                CNF::new(num_variables, inferred.clauses)
            })
            .boxed()
    }
}
