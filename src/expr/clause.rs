use super::{Assignment, Literal, CNF};
use proptest::prelude::*;
use std::{
    collections::BTreeSet,
    fmt,
    num::NonZeroU32,
    ops::{BitAnd, BitOr},
};

/// A clause in [Conjunctive Normal Form](https://en.wikipedia.org/wiki/Conjunctive_normal_form)
///
/// A clause is a set of literals, and the set itself is its identity:
/// two clauses listing the same literals in any order are equal and hash the same.
/// The empty clause `⊥` is unsatisfiable.
///
/// # Order
///
/// Clauses are in graded lexical order, i.e. the number of literals is the primary key.
///
/// ```rust
/// use cnfsat::clause;
///
/// let a = clause![1, 2];
/// let b = clause![1];
/// let c = clause![2];
/// let d = clause![];
///
/// assert!(d < b);
/// assert!(b < c); // since 1 < 2
/// assert!(c < a);
/// ```
///
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Clause {
    literals: BTreeSet<Literal>,
}

#[macro_export]
macro_rules! clause {
    ($($lit:expr),*) => {
        $crate::Clause::from_literals(&[$($lit.into()),*])
    };
}

/// Status of a clause under a partial assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseState {
    /// Some literal is true
    Satisfied,
    /// Every literal is false
    Falsified,
    /// Exactly one literal is unassigned and none is true
    Unit(Literal),
    /// More than one literal is unassigned and none is true
    Unresolved,
}

/// A clause falsified under the current assignment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Conflict {
    pub clause: Clause,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Conflict on {}", self.clause)
    }
}

impl PartialOrd for Clause {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Clause {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.literals.len().cmp(&other.literals.len()) {
            std::cmp::Ordering::Equal => self.literals.cmp(&other.literals),
            ordering => ordering,
        }
    }
}

impl Clause {
    pub fn new(literals: BTreeSet<Literal>) -> Self {
        Self { literals }
    }

    pub fn from_literals(literals: &[Literal]) -> Self {
        Self::new(literals.iter().cloned().collect())
    }

    /// The empty clause `⊥`
    pub fn empty() -> Self {
        Self::default()
    }

    /// Convert the clause to a DIMACS format string
    ///
    /// ```rust
    /// use cnfsat::{clause, Clause};
    /// let clause = clause![1, -2];
    /// assert_eq!(clause.as_dimacs(), "1 -2 0");
    ///
    /// // Empty clause is written as a bare terminator
    /// assert_eq!(Clause::empty().as_dimacs(), "0");
    /// ```
    pub fn as_dimacs(&self) -> String {
        let mut s = String::new();
        for lit in &self.literals {
            s.push_str(&lit.as_i32().to_string());
            s.push(' ');
        }
        s.push('0');
        s
    }

    pub fn literals(&self) -> impl DoubleEndedIterator<Item = &Literal> {
        self.literals.iter()
    }

    /// Number of literals in the clause
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn contains(&self, lit: Literal) -> bool {
        self.literals.contains(&lit)
    }

    /// Largest variable ID in the clause
    pub fn max_id(&self) -> Option<NonZeroU32> {
        self.literals.iter().map(|lit| lit.id).max()
    }

    /// Check if the clause contains a literal and its negation
    ///
    /// ```rust
    /// use cnfsat::clause;
    ///
    /// assert!(clause![1, 2, -1].is_tautology());
    /// assert!(!clause![1, 2].is_tautology());
    /// assert!(!clause![].is_tautology());
    /// ```
    pub fn is_tautology(&self) -> bool {
        // The negation of some literal must be next to it since sorted.
        let mut iter = self.literals.iter().peekable();
        while let Some(lit) = iter.next() {
            if let Some(next) = iter.peek() {
                if lit.id == next.id {
                    return true;
                }
            }
        }
        false
    }

    pub fn as_unit(&self) -> Option<Literal> {
        if self.literals.len() == 1 {
            self.literals.iter().next().copied()
        } else {
            None
        }
    }

    /// Classify the clause under a partial assignment
    ///
    /// ```rust
    /// use cnfsat::{clause, lit, Assignment, ClauseState};
    ///
    /// let assignment: Assignment = [lit!(1)].into_iter().collect();
    /// assert_eq!(clause![1, 2].evaluate(&assignment), ClauseState::Satisfied);
    /// assert_eq!(clause![-1, 2].evaluate(&assignment), ClauseState::Unit(lit!(2)));
    /// assert_eq!(clause![-1].evaluate(&assignment), ClauseState::Falsified);
    /// assert_eq!(clause![2, 3].evaluate(&assignment), ClauseState::Unresolved);
    /// ```
    pub fn evaluate(&self, assignment: &Assignment) -> ClauseState {
        let mut unassigned = None;
        let mut num_unassigned = 0;
        for &lit in &self.literals {
            match assignment.value(lit) {
                Some(true) => return ClauseState::Satisfied,
                Some(false) => {}
                None => {
                    num_unassigned += 1;
                    unassigned = Some(lit);
                }
            }
        }
        match (num_unassigned, unassigned) {
            (0, _) => ClauseState::Falsified,
            (1, Some(lit)) => ClauseState::Unit(lit),
            _ => ClauseState::Unresolved,
        }
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.literals
            .iter()
            .any(|&lit| assignment.value(lit) == Some(true))
    }

    /// Partially evaluate the clause under a partial assignment
    ///
    /// Returns `None` if the clause is already satisfied,
    /// otherwise the clause without its false literals, which may be empty.
    ///
    /// ```rust
    /// use cnfsat::{clause, lit, Assignment};
    ///
    /// let assignment: Assignment = [lit!(-1)].into_iter().collect();
    ///
    /// // x1 ∨ x2 becomes x2 when x1 is false
    /// assert_eq!(clause![1, 2].simplify(&assignment), Some(clause![2]));
    ///
    /// // ¬x1 ∨ x2 is always true when x1 is false
    /// assert_eq!(clause![-1, 2].simplify(&assignment), None);
    ///
    /// // x1 becomes ⊥
    /// assert!(clause![1].simplify(&assignment).unwrap().is_empty());
    /// ```
    pub fn simplify(&self, assignment: &Assignment) -> Option<Self> {
        let mut literals = BTreeSet::new();
        for &lit in &self.literals {
            match assignment.value(lit) {
                Some(true) => return None,
                Some(false) => {}
                None => {
                    literals.insert(lit);
                }
            }
        }
        Some(Self::new(literals))
    }

    /// Resolvent of two clauses on a given variable, `(self ∖ {x}) ∪ (other ∖ {¬x})`
    ///
    /// The caller decides which polarity `pivot` takes in `self`.
    /// Tautological resolvents are returned as is.
    pub fn resolve_on(&self, other: &Self, pivot: Literal) -> Self {
        let mut literals = self.literals.clone();
        literals.remove(&pivot);
        literals.extend(other.literals.iter().filter(|&&lit| lit != !pivot));
        Self::new(literals)
    }

    /// Get the single resolvent of two clauses
    ///
    /// The literals of `self` are scanned in ascending order, and the first literal whose negation
    /// appears in `other` is resolved upon, i.e. the complementary variable of the smallest ID wins.
    /// Other complementary pairs are not tried. Returns `None` if there is no complementary pair,
    /// or if the resolvent is a tautology.
    ///
    /// ```rust
    /// use cnfsat::clause;
    ///
    /// let a = clause![1, 2];
    /// let b = clause![-1, 3];
    /// assert_eq!(a.resolve(&b).unwrap().to_string(), "x2 ∨ x3");
    /// assert_eq!(b.resolve(&a).unwrap().to_string(), "x2 ∨ x3");
    ///
    /// // No pair
    /// let a = clause![1, 2];
    /// let b = clause![3, 4];
    /// assert!(a.resolve(&b).is_none());
    ///
    /// // x1 and x1 cannot be a pair
    /// let a = clause![1, 2];
    /// let b = clause![1, 3];
    /// assert!(a.resolve(&b).is_none());
    ///
    /// // Multiple pairs: resolving on x1 leaves x2 ∨ ¬x2, which is discarded
    /// let a = clause![1, 2];
    /// let b = clause![-1, -2];
    /// assert!(a.resolve(&b).is_none());
    ///
    /// // Complementary units resolve into ⊥
    /// assert!(clause![1].resolve(&clause![-1]).unwrap().is_empty());
    /// ```
    ///
    /// <https://en.wikipedia.org/wiki/Resolution_(logic)>
    pub fn resolve(&self, other: &Self) -> Option<Self> {
        let pivot = *self.literals.iter().find(|&&lit| other.contains(!lit))?;
        let resolvent = self.resolve_on(other, pivot);
        if resolvent.is_tautology() {
            None
        } else {
            Some(resolvent)
        }
    }
}

impl From<Literal> for Clause {
    fn from(literal: Literal) -> Self {
        Self::from_literals(&[literal])
    }
}

impl PartialEq<Literal> for Clause {
    fn eq(&self, other: &Literal) -> bool {
        self.literals.len() == 1 && self.literals.contains(other)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "⊥");
        }
        for (i, literal) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " ∨ ")?;
            }
            write!(f, "{}", literal)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl BitOr for Clause {
    type Output = Self;
    fn bitor(mut self, mut rhs: Self) -> Self {
        self.literals.append(&mut rhs.literals);
        self
    }
}

impl BitOr<Literal> for Clause {
    type Output = Self;
    fn bitor(mut self, rhs: Literal) -> Self {
        self.literals.insert(rhs);
        self
    }
}

impl BitOr<Clause> for Literal {
    type Output = Clause;
    fn bitor(self, rhs: Clause) -> Clause {
        rhs | self
    }
}

impl BitAnd for Clause {
    type Output = CNF;
    fn bitand(self, rhs: Self) -> Self::Output {
        CNF::from_clauses(vec![self, rhs])
    }
}

impl Arbitrary for Clause {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Clause::empty()),
            proptest::collection::vec(any::<Literal>(), 0..5)
                .prop_map(|literals| Clause::from_literals(&literals))
        ]
        .boxed()
    }
}
