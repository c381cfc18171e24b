use crate::{clause, lit, Assignment, Literal, CNF};
use std::num::NonZeroU32;

/// Formulas with exactly one model over their variables, or none
pub fn single_solution_cases() -> Vec<(CNF, Option<Assignment>)> {
    vec![
        // ⊤
        (CNF::default(), Some(Assignment::default())),
        // ⊥
        (CNF::new(1, vec![clause![]]), None),
        // x1
        (clause![1].into(), Some(model(&[1]))),
        // ¬x1
        (clause![-1].into(), Some(model(&[-1]))),
        // x1 ∧ x2
        (clause![1] & clause![2], Some(model(&[1, 2]))),
        // x1 ∧ ¬x2
        (clause![1] & clause![-2], Some(model(&[1, -2]))),
        // ¬x1 ∧ x2
        (clause![-1] & clause![2], Some(model(&[-1, 2]))),
        // ¬x1 ∧ ¬x2
        (clause![-1] & clause![-2], Some(model(&[-1, -2]))),
        // x1 ∧ x2 ∧ x3
        (
            clause![1] & clause![2] & clause![3],
            Some(model(&[1, 2, 3])),
        ),
        // (x1 ∨ x2) ∧ (¬x1 ∨ x2) ∧ (x1 ∨ ¬x2)
        (
            clause![1, 2] & clause![-1, 2] & clause![1, -2],
            Some(model(&[1, 2])),
        ),
        // x1 ∧ ¬x1
        (clause![1] & clause![-1], None),
        // All four clauses over x1 and x2
        (
            clause![1, 2] & clause![1, -2] & clause![-1, 2] & clause![-1, -2],
            None,
        ),
        // From Knuth 4B (112)
        (
            clause![1, 2, 3, 4]
                & clause![1, -2]
                & clause![-1, -2, -3]
                & clause![-1, 3]
                & clause![2, -3]
                & clause![3, -4],
            None,
        ),
        // Knuth's R, 4B (6)
        (
            clause![1, 2, -3]
                & clause![2, 3, -4]
                & clause![3, 4, 1]
                & clause![4, -1, 2]
                & clause![-1, -2, 3]
                & clause![-2, -3, 4]
                & clause![-3, -4, -1]
                & clause![-4, 1, -2],
            None,
        ),
    ]
}

fn model(literals: &[i32]) -> Assignment {
    literals.iter().map(|&i| Literal::new(i)).collect()
}

/// Some model binding every declared variable, by trying all of them
pub fn brute_force(cnf: &CNF) -> Option<Assignment> {
    let n = cnf.num_variables();
    assert!(n < 20, "Too many variables for brute force: {}", n);
    (0..1u32 << n).find_map(|bits| {
        let assignment: Assignment = (1..=n)
            .filter_map(NonZeroU32::new)
            .map(|id| {
                if bits & (1 << (id.get() - 1)) == 0 {
                    Literal::positive(id)
                } else {
                    Literal::negative(id)
                }
            })
            .collect();
        cnf.clauses()
            .iter()
            .all(|clause| clause.is_satisfied_by(&assignment))
            .then_some(assignment)
    })
}

#[test]
fn brute_force_cases() {
    for (cnf, expected) in single_solution_cases() {
        assert_eq!(brute_force(&cnf), expected, "Failed on {cnf:?}");
    }
    assert_eq!(
        brute_force(&(clause![1, 2] & clause![-1])),
        Some([lit!(-1), lit!(2)].into_iter().collect())
    );
}
