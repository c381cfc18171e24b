use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// Wall-clock budget polled by solvers at their checkpoints
///
/// The budget is spent once `elapsed >= limit`, hence a zero budget is always spent.
/// A shared cancel token can stop the solver earlier.
///
/// ```rust
/// use cnfsat::Deadline;
/// use std::time::Duration;
///
/// assert!(Deadline::new(Duration::ZERO).check().is_err());
/// assert!(Deadline::new(Duration::from_secs(60)).check().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Deadline {
    start: Instant,
    limit: Duration,
    cancel_token: Option<Arc<AtomicBool>>,
}

impl Deadline {
    pub fn new(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit,
            cancel_token: None,
        }
    }

    /// Never expires unless canceled
    pub fn unbounded() -> Self {
        Self::new(Duration::MAX)
    }

    pub fn with_cancel_token(mut self, cancel_token: Arc<AtomicBool>) -> Self {
        self.cancel_token = Some(cancel_token);
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn is_canceled(&self) -> bool {
        self.cancel_token
            .as_ref()
            .is_some_and(|token| token.load(Ordering::Relaxed))
    }

    pub fn check(&self) -> Result<(), TimeoutError> {
        let elapsed = self.elapsed();
        if elapsed >= self.limit || self.is_canceled() {
            return Err(TimeoutError { elapsed });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeoutError {
    elapsed: Duration,
}

impl TimeoutError {
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timeout after {:?}", self.elapsed)
    }
}

impl std::error::Error for TimeoutError {}
