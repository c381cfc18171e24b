use crate::{
    davis_putnam::DavisPutnamStats, dpll::DpllStats, resolution::ResolutionStats, Assignment,
    Status,
};
use colored::{ColoredString, Colorize};
use serde::{Serialize, Serializer};
use std::{fmt, time::Duration};

/// Engine-specific counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Statistics {
    Resolution(ResolutionStats),
    DavisPutnam(DavisPutnamStats),
    Dpll(DpllStats),
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistics::Resolution(stats) => write!(f, "{}", stats),
            Statistics::DavisPutnam(stats) => write!(f, "{}", stats),
            Statistics::Dpll(stats) => write!(f, "{}", stats),
        }
    }
}

/// Result of a single solver run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub solver: &'static str,
    #[serde(serialize_with = "as_secs")]
    pub timeout: Duration,
    pub status: Status,
    #[serde(serialize_with = "as_secs")]
    pub elapsed: Duration,
    pub statistics: Statistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<Assignment>,
}

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

fn colored_status(status: Status) -> ColoredString {
    let tag = status.to_string();
    match status {
        Status::Sat | Status::Unsat => tag.bold().green(),
        Status::Timeout | Status::UnknownSaturated | Status::UnknownExplosion => {
            tag.bold().yellow()
        }
        Status::ErrorResource => tag.bold().red(),
    }
}

impl Report {
    /// Model restricted to its first `limit` variables, with an ellipsis if anything is cut
    pub fn model_preview(&self, limit: usize) -> Option<String> {
        let model = self.model.as_ref()?;
        let mut preview = model
            .literals()
            .take(limit)
            .map(|lit| format!("x{}={}", lit.id, if lit.positive { "T" } else { "F" }))
            .collect::<Vec<_>>()
            .join(", ");
        if model.len() > limit {
            preview.push_str(", ...");
        }
        Some(preview)
    }

    /// Print a status line with timing and counters
    pub fn print(&self) {
        eprintln!(
            "{:>18} {} (in {:?}, timeout = {:?})",
            colored_status(self.status),
            self.solver,
            self.elapsed,
            self.timeout
        );
        eprintln!("{:>18} {}", "Statistics".bold().blue(), self.statistics);
        if let Some(preview) = self.model_preview(20) {
            eprintln!("{:>18} {}", "Model".bold().blue(), preview);
        }
    }
}

/// Print a line for every report, and a warning if definite answers disagree
pub fn print_summary(reports: &[Report]) {
    eprintln!("{:>18} {} solvers", "Summary".bold().magenta(), reports.len());
    for report in reports {
        eprintln!(
            "{:>18} {:<12} {:?}",
            colored_status(report.status),
            report.solver,
            report.elapsed
        );
    }

    let sat = reports.iter().any(|r| r.status == Status::Sat);
    let unsat = reports.iter().any(|r| r.status == Status::Unsat);
    if sat && unsat {
        eprintln!(
            "{:>18} solvers disagree on satisfiability",
            "Warning".bold().red()
        );
    }
}
