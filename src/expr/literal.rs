use super::Clause;
use maplit::btreeset;
use proptest::prelude::*;
use std::{
    cmp::Ordering,
    fmt,
    num::NonZeroU32,
    ops::{BitOr, Not},
};

/// Variable with a polarity, written as a signed integer in DIMACS
///
/// `3` is `x3` and `-3` is `¬x3`. Zero terminates a DIMACS clause and is never a literal.
///
/// ```rust
/// use cnfsat::{lit, Literal};
///
/// let x3 = Literal::from_i32(-3).unwrap();
/// assert_eq!(x3.to_string(), "¬x3");
/// assert_eq!(x3.as_i32(), -3);
/// assert_eq!(!x3, lit!(3));
///
/// assert!(Literal::from_i32(0).is_none());
/// // -2^31 has no positive counterpart
/// assert!(Literal::from_i32(i32::MIN).is_none());
/// ```
///
/// Literals sort by variable, `x` before `¬x`, which is the order clauses list them in:
///
/// ```rust
/// use cnfsat::lit;
///
/// let mut literals = vec![lit!(-2), lit!(2), lit!(-1), lit!(3)];
/// literals.sort();
/// assert_eq!(
///     literals.iter().map(|l| l.as_i32()).collect::<Vec<_>>(),
///     vec![-1, 2, -2, 3]
/// );
///
/// // `|` collects literals into a clause, keeping complementary pairs
/// assert_eq!((lit!(1) | lit!(-2)).as_dimacs(), "1 -2 0");
/// assert!((lit!(1) | lit!(-1)).is_tautology());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    pub id: NonZeroU32,
    pub positive: bool,
}

#[macro_export]
macro_rules! lit {
    ($lit:expr) => {
        $crate::Literal::new($lit)
    };
}

impl Literal {
    /// Literal of a DIMACS integer, panics unless it is a valid literal
    pub fn new(lit: i32) -> Self {
        Self::from_i32(lit).expect("DIMACS literal must be nonzero and above i32::MIN")
    }

    /// Literal of a DIMACS integer, `None` for `0` and `i32::MIN`
    pub fn from_i32(lit: i32) -> Option<Self> {
        let id = NonZeroU32::new(lit.checked_abs()? as u32)?;
        Some(Self {
            id,
            positive: lit > 0,
        })
    }

    pub fn positive(id: NonZeroU32) -> Self {
        Self { id, positive: true }
    }

    pub fn negative(id: NonZeroU32) -> Self {
        Self {
            id,
            positive: false,
        }
    }

    /// DIMACS integer
    pub fn as_i32(&self) -> i32 {
        let magnitude = self.id.get() as i32;
        if self.positive {
            magnitude
        } else {
            -magnitude
        }
    }
}

impl From<i32> for Literal {
    fn from(lit: i32) -> Self {
        Self::new(lit)
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self {
        Self {
            id: self.id,
            positive: !self.positive,
        }
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| other.positive.cmp(&self.positive))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.positive { "" } else { "¬" };
        write!(f, "{}x{}", sign, self.id)
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl BitOr for Literal {
    type Output = Clause;
    fn bitor(self, rhs: Self) -> Clause {
        Clause::new(btreeset! {self, rhs})
    }
}

impl Arbitrary for Literal {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        // Every literal with a DIMACS representation
        (1..=i32::MAX, any::<bool>())
            .prop_map(|(magnitude, negated)| {
                Literal::new(if negated { -magnitude } else { magnitude })
            })
            .boxed()
    }
}
