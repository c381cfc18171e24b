use super::Literal;
use serde::Serialize;
use std::{collections::BTreeMap, fmt, num::NonZeroU32};

/// Partial mapping from variables to truth values
///
/// ```rust
/// use cnfsat::{lit, Assignment};
///
/// let mut assignment = Assignment::default();
/// assignment.assign(lit!(-2));
/// assert_eq!(assignment.value(lit!(2)), Some(false));
/// assert_eq!(assignment.value(lit!(-2)), Some(true));
/// assert_eq!(assignment.value(lit!(1)), None);
///
/// // Unassigned variables default to true when completing a model
/// let model = assignment.completed(3);
/// assert_eq!(model.to_string(), "x1=T, x2=F, x3=T");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Assignment(BTreeMap<NonZeroU32, bool>);

impl Assignment {
    pub fn get(&self, id: NonZeroU32) -> Option<bool> {
        self.0.get(&id).copied()
    }

    /// Truth value of the literal, `None` if its variable is unassigned
    pub fn value(&self, lit: Literal) -> Option<bool> {
        self.get(lit.id).map(|value| value == lit.positive)
    }

    /// Make `lit` true. Returns the previous value of the variable.
    pub fn assign(&mut self, lit: Literal) -> Option<bool> {
        self.0.insert(lit.id, lit.positive)
    }

    pub fn unassign(&mut self, id: NonZeroU32) -> Option<bool> {
        self.0.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Assigned variables as true literals, ordered by ID
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.0
            .iter()
            .map(|(&id, &positive)| Literal { id, positive })
    }

    /// Lowest variable in `1..=num_variables` without a value
    pub fn first_unassigned(&self, num_variables: u32) -> Option<NonZeroU32> {
        (1..=num_variables)
            .filter_map(NonZeroU32::new)
            .find(|id| !self.0.contains_key(id))
    }

    pub fn is_complete(&self, num_variables: u32) -> bool {
        self.first_unassigned(num_variables).is_none()
    }

    /// Bind every variable in `1..=num_variables`, defaulting the unassigned ones to true
    pub fn completed(&self, num_variables: u32) -> Self {
        let mut model = self.clone();
        for id in (1..=num_variables).filter_map(NonZeroU32::new) {
            model.0.entry(id).or_insert(true);
        }
        model
    }
}

impl FromIterator<Literal> for Assignment {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Self(iter.into_iter().map(|lit| (lit.id, lit.positive)).collect())
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, (id, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "x{}={}", id, if *value { "T" } else { "F" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit;

    #[test]
    fn test_first_unassigned() {
        let assignment: Assignment = [lit!(1), lit!(-3)].into_iter().collect();
        assert_eq!(assignment.first_unassigned(3), NonZeroU32::new(2));
        assert_eq!(assignment.first_unassigned(1), None);
        assert!(!assignment.is_complete(3));
        assert!(assignment.completed(5).is_complete(5));
    }

    #[test]
    fn test_completion_keeps_existing_values() {
        let assignment: Assignment = [lit!(-2)].into_iter().collect();
        let model = assignment.completed(3);
        assert_eq!(
            model.literals().collect::<Vec<_>>(),
            vec![lit!(1), lit!(-2), lit!(3)]
        );
    }

    #[test]
    fn test_unassign() {
        let mut assignment = Assignment::default();
        assert_eq!(assignment.assign(lit!(4)), None);
        assert_eq!(assignment.assign(lit!(-4)), Some(true));
        assert_eq!(assignment.unassign(lit!(4).id), Some(false));
        assert!(assignment.is_empty());
    }

    #[test]
    fn test_serialize() {
        let assignment: Assignment = [lit!(1), lit!(-2)].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&assignment).unwrap(),
            r#"{"1":true,"2":false}"#
        );
    }
}
