//! Retry policy for transient planner and retriever failures.

use std::time::Duration;

/// How often, and after what delay, a failed stage is re-run.
///
/// Only errors for which [`EditError::is_transient`](crate::EditError::is_transient) holds are
/// retried, and never the assembler stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RetryPolicy {
    /// Fail on the first error.
    #[default]
    None,
    /// Constant delay between attempts.
    Fixed { max_retries: usize, delay: Duration },
    /// Delay grows by `multiplier` per retry, capped at `max_delay`.
    Exponential {
        max_retries: usize,
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: f64,
    },
}

impl RetryPolicy {
    pub fn fixed(max_retries: usize, delay: Duration) -> Self {
        RetryPolicy::Fixed { max_retries, delay }
    }

    pub fn exponential(
        max_retries: usize,
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: f64,
    ) -> Self {
        RetryPolicy::Exponential {
            max_retries,
            initial_delay,
            max_delay,
            multiplier,
        }
    }

    /// Retries allowed after the first attempt.
    pub fn max_retries(&self) -> usize {
        match self {
            RetryPolicy::None => 0,
            RetryPolicy::Fixed { max_retries, .. }
            | RetryPolicy::Exponential { max_retries, .. } => *max_retries,
        }
    }

    /// Whether retry number `retry` (0-based) is allowed.
    pub fn allows(&self, retry: usize) -> bool {
        retry < self.max_retries()
    }

    /// Sleep before retry number `retry` (0-based).
    pub fn delay(&self, retry: usize) -> Duration {
        match self {
            RetryPolicy::None => Duration::ZERO,
            RetryPolicy::Fixed { delay, .. } => *delay,
            RetryPolicy::Exponential {
                initial_delay,
                max_delay,
                multiplier,
                ..
            } => {
                let secs = initial_delay.as_secs_f64() * multiplier.powi(retry as i32);
                if !secs.is_finite() || secs >= max_delay.as_secs_f64() {
                    return *max_delay;
                }
                Duration::from_secs_f64(secs.max(0.0))
            }
        }
    }
}
