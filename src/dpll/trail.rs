use crate::{Assignment, Literal};
use std::fmt;

/// Why a literal was assigned without a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    /// Unit under the current assignment, by index of the clause
    Clause(usize),
    /// Occurs with a single polarity among unsatisfied clauses
    Pure,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Clause(index) => write!(f, "c{}", index),
            Reason::Pure => write!(f, "pure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Implied {
    literal: Literal,
    reason: Reason,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecisionLevel {
    decision: Option<Literal>,
    /// The decision is the second value tried for its variable
    flipped: bool,
    implied: Vec<Implied>,
}

impl DecisionLevel {
    /// Root decision level
    fn root() -> Self {
        Self {
            decision: None,
            flipped: false,
            implied: vec![],
        }
    }

    pub fn decision(&self) -> Option<Literal> {
        self.decision
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Literals assigned in this level, the decision first
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.decision
            .into_iter()
            .chain(self.implied.iter().map(|i| i.literal))
    }
}

/// Assignment of the search path, grouped by decision level
///
/// Every level is an undo log: leaving a level unassigns exactly the literals it assigned,
/// so sibling branches never see each other's assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trail {
    decision_levels: Vec<DecisionLevel>,
    assignment: Assignment,
}

impl Default for Trail {
    fn default() -> Self {
        Self {
            decision_levels: vec![DecisionLevel::root()],
            assignment: Assignment::default(),
        }
    }
}

impl fmt::Display for Trail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_width = self.decision_levels.len().to_string().len();
        let Some(max_id) = self.assignment.literals().map(|lit| lit.id).max() else {
            // No output for empty trail
            return Ok(());
        };
        let literal_width = max_id.to_string().len() + 2;

        for (i, level) in self.decision_levels.iter().enumerate() {
            if let Some(decision) = &level.decision {
                let mark = if level.flipped { "Λ'" } else { "Λ" };
                writeln!(
                    f,
                    "{:<literal_width$} | {i:>level_width$} | {mark}",
                    decision.to_string()
                )?;
            }
            for imp in &level.implied {
                writeln!(
                    f,
                    "{:<literal_width$} | {i:>level_width$} | {}",
                    imp.literal.to_string(),
                    imp.reason
                )?;
            }
        }
        Ok(())
    }
}

impl Trail {
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Number of literals in the trail
    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    /// Current decision level. This returns 0 if in the root level.
    pub fn level(&self) -> usize {
        self.decision_levels.len() - 1
    }

    /// Open a new level whose first literal is `decision`
    pub fn decide(&mut self, decision: Literal) {
        self.push_level(decision, false);
    }

    /// Open a new level trying the opposite value of a decision that failed
    pub fn decide_flipped(&mut self, decision: Literal) {
        self.push_level(decision, true);
    }

    fn push_level(&mut self, decision: Literal, flipped: bool) {
        debug_assert!(self.assignment.value(decision).is_none());
        self.assignment.assign(decision);
        self.decision_levels.push(DecisionLevel {
            decision: Some(decision),
            flipped,
            implied: vec![],
        });
    }

    pub fn push_implied(&mut self, literal: Literal, reason: Reason) {
        debug_assert!(self.assignment.value(literal).is_none());
        self.assignment.assign(literal);
        self.decision_levels
            .last_mut()
            .expect("Root level is always present")
            .implied
            .push(Implied { literal, reason });
    }

    /// Leave the current level, unassigning its literals
    ///
    /// Returns `None` at the root level, which is never removed.
    pub fn backtrack(&mut self) -> Option<DecisionLevel> {
        if self.decision_levels.len() <= 1 {
            return None;
        }
        let level = self.decision_levels.pop()?;
        for lit in level.literals() {
            self.assignment.unassign(lit.id);
        }
        Some(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit;

    #[test]
    fn backtrack_restores_assignment() {
        let mut trail = Trail::default();
        trail.push_implied(lit!(3), Reason::Clause(0));
        trail.decide(lit!(1));
        trail.push_implied(lit!(-2), Reason::Clause(4));
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.level(), 1);

        let level = trail.backtrack().unwrap();
        assert_eq!(level.decision(), Some(lit!(1)));
        assert!(!level.is_flipped());
        assert_eq!(trail.level(), 0);
        assert_eq!(
            trail.assignment().literals().collect::<Vec<_>>(),
            vec![lit!(3)]
        );

        // Root level stays
        assert!(trail.backtrack().is_none());
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn display() {
        let mut trail = Trail::default();
        trail.push_implied(lit!(12), Reason::Clause(0));
        trail.decide(lit!(1));
        trail.push_implied(lit!(-2), Reason::Clause(3));
        trail.backtrack();
        trail.decide_flipped(lit!(-1));
        trail.push_implied(lit!(5), Reason::Pure);

        insta::assert_snapshot!(trail.to_string(), @r"
        x12  | 0 | c0
        ¬x1  | 1 | Λ'
        x5   | 1 | pure
        ");
    }
}
