//! DIMACS CNF reader and writer

use crate::{Clause, Literal, CNF};
use anyhow::{Context, Result};
use std::{fmt, fs, path::Path};

/// Malformed DIMACS input, with the 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `p` line other than `p cnf <variables> <clauses>`
    InvalidHeader { line: usize, content: String },
    /// Token which is not a literal
    InvalidLiteral { line: usize, token: String },
    /// `0` before the end of a clause line
    MisplacedZero { line: usize },
    /// Literal beyond the number of variables
    LiteralOutOfRange {
        line: usize,
        literal: i32,
        num_variables: u32,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidHeader { line, content } => {
                write!(f, "Line {}: invalid header '{}'", line, content)
            }
            ParseError::InvalidLiteral { line, token } => {
                write!(f, "Line {}: invalid literal '{}'", line, token)
            }
            ParseError::MisplacedZero { line } => {
                write!(f, "Line {}: 0 found inside a non-empty clause", line)
            }
            ParseError::LiteralOutOfRange {
                line,
                literal,
                num_variables,
            } => write!(
                f,
                "Line {}: literal {} is out of range for {} variables",
                line, literal, num_variables
            ),
        }
    }
}

impl std::error::Error for ParseError {}

struct Header {
    num_variables: u32,
    num_clauses: usize,
}

fn parse_header(line: usize, content: &str) -> Result<Header, ParseError> {
    let invalid = || ParseError::InvalidHeader {
        line,
        content: content.to_string(),
    };
    let fields: Vec<&str> = content.split_whitespace().collect();
    match fields.as_slice() {
        ["p", "cnf", variables, clauses] => Ok(Header {
            num_variables: variables.parse().map_err(|_| invalid())?,
            num_clauses: clauses.parse().map_err(|_| invalid())?,
        }),
        _ => Err(invalid()),
    }
}

/// Literals of a clause line, without the terminating `0`
fn parse_clause(line: usize, content: &str) -> Result<Vec<i32>, ParseError> {
    let mut literals = content
        .split_whitespace()
        .map(|token| match token.parse::<i32>() {
            Ok(i32::MIN) | Err(_) => Err(ParseError::InvalidLiteral {
                line,
                token: token.to_string(),
            }),
            Ok(lit) => Ok(lit),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if literals.last() == Some(&0) {
        literals.pop();
    } else {
        log::warn!("Line {}: clause is not terminated by 0", line);
    }
    if literals.contains(&0) {
        return Err(ParseError::MisplacedZero { line });
    }
    Ok(literals)
}

/// Parse a formula in DIMACS CNF format
///
/// Every non-comment line is a single clause. A line `0` is an explicit empty clause.
/// Without a header, or with zero variables declared,
/// the number of variables is the largest variable in the clauses.
///
/// ```rust
/// use cnfsat::{clause, dimacs::parse_dimacs};
///
/// let cnf = parse_dimacs(r"
/// c Example
/// p cnf 3 2
/// 1 -2 0
/// 2 3 0
/// ").unwrap();
/// assert_eq!(cnf.num_variables(), 3);
/// assert_eq!(cnf.clauses(), &[clause![1, -2], clause![2, 3]]);
/// ```
pub fn parse_dimacs(input: &str) -> Result<CNF, ParseError> {
    let mut header: Option<Header> = None;
    let mut clauses: Vec<(usize, Vec<i32>)> = Vec::new();

    for (i, content) in input.lines().enumerate() {
        let line = i + 1;
        let content = content.trim();
        if content.is_empty() || content.starts_with('c') {
            continue;
        }
        if content.starts_with('%') {
            break;
        }
        if content.starts_with('p') {
            header = Some(parse_header(line, content)?);
            continue;
        }
        let literals = parse_clause(line, content)?;
        if literals.is_empty() {
            log::warn!("Line {}: empty clause, the formula is UNSAT", line);
        }
        clauses.push((line, literals));
    }

    let inferred = clauses
        .iter()
        .flat_map(|(_, literals)| literals.iter().map(|lit| lit.unsigned_abs()))
        .max()
        .unwrap_or(0);
    let num_variables = match &header {
        Some(header) if header.num_variables > 0 => header.num_variables,
        _ => {
            if !clauses.is_empty() {
                log::warn!(
                    "No header or zero variables declared, {} variables inferred",
                    inferred
                );
            }
            inferred
        }
    };
    if let Some(header) = &header {
        if header.num_clauses != clauses.len() {
            log::warn!(
                "Header declares {} clauses, but {} found",
                header.num_clauses,
                clauses.len()
            );
        }
    }

    let mut cnf = Vec::with_capacity(clauses.len());
    for (line, literals) in clauses {
        let mut clause = Vec::with_capacity(literals.len());
        for literal in literals {
            if literal.unsigned_abs() > num_variables {
                return Err(ParseError::LiteralOutOfRange {
                    line,
                    literal,
                    num_variables,
                });
            }
            clause.extend(Literal::from_i32(literal));
        }
        cnf.push(Clause::from_literals(&clause));
    }
    Ok(CNF::new(num_variables, cnf))
}

pub fn read_dimacs(path: impl AsRef<Path>) -> Result<CNF> {
    let path = path.as_ref();
    let input = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cnf = parse_dimacs(&input).with_context(|| format!("Failed to parse {}", path.display()))?;
    log::info!(
        "Parsed {} clauses over {} variables from {}",
        cnf.len(),
        cnf.num_variables(),
        path.display()
    );
    Ok(cnf)
}

/// Serialize in DIMACS CNF format, prefixed by `comment` as comment lines
pub fn write_dimacs(cnf: &CNF, comment: &str) -> String {
    let mut out = String::new();
    for line in comment.lines() {
        out.push_str("c ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&format!("p cnf {} {}\n", cnf.num_variables(), cnf.len()));
    for clause in cnf.clauses() {
        out.push_str(&clause.as_dimacs());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause;

    #[test]
    fn unterminated_clause_and_satlib_trailer() {
        let cnf = parse_dimacs(
            r"
p cnf 3 2
1 -3
-2 3 0
%
0
",
        )
        .unwrap();
        assert_eq!(cnf.num_variables(), 3);
        assert_eq!(cnf.clauses(), &[clause![1, -3], clause![-2, 3]]);
    }

    #[test]
    fn empty_clause() {
        let cnf = parse_dimacs("p cnf 2 2\n1 2 0\n0\n").unwrap();
        assert!(cnf.has_empty_clause());
        assert_eq!(cnf.len(), 2);
    }

    #[test]
    fn infer_variables() {
        let cnf = parse_dimacs("1 -5 0\n2 0\n").unwrap();
        assert_eq!(cnf.num_variables(), 5);

        let cnf = parse_dimacs("p cnf 0 1\n-4 0\n").unwrap();
        assert_eq!(cnf.num_variables(), 4);
    }

    #[test]
    fn clause_count_mismatch_is_allowed() {
        let cnf = parse_dimacs("p cnf 2 5\n1 2 0\n").unwrap();
        assert_eq!(cnf.len(), 1);
    }

    #[test]
    fn errors() {
        assert_eq!(
            parse_dimacs("p cnf 3\n1 0\n"),
            Err(ParseError::InvalidHeader {
                line: 1,
                content: "p cnf 3".to_string()
            })
        );
        assert!(matches!(
            parse_dimacs("p dnf 3 1\n1 0\n"),
            Err(ParseError::InvalidHeader { line: 1, .. })
        ));
        assert_eq!(
            parse_dimacs("p cnf 3 1\n1 x2 0\n"),
            Err(ParseError::InvalidLiteral {
                line: 2,
                token: "x2".to_string()
            })
        );
        assert_eq!(
            parse_dimacs("p cnf 3 1\n1 0 2 0\n"),
            Err(ParseError::MisplacedZero { line: 2 })
        );
        assert_eq!(
            parse_dimacs("c comment\np cnf 3 2\n1 2 0\n-4 0\n"),
            Err(ParseError::LiteralOutOfRange {
                line: 4,
                literal: -4,
                num_variables: 3
            })
        );
    }

    #[test]
    fn write() {
        let cnf = CNF::new(4, vec![clause![1, -2], clause![3], clause![]]);
        insta::assert_snapshot!(write_dimacs(&cnf, "Generated\nseed = 7"), @r"
        c Generated
        c seed = 7
        p cnf 4 3
        1 -2 0
        3 0
        0
        ");
        assert_eq!(parse_dimacs(&write_dimacs(&cnf, "")).unwrap(), cnf);
    }
}
