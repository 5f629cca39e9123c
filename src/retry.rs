use std::thread::sleep;
use std::time::Duration;
use tracing::{debug, warn};

/// How often and how patiently a failing write is retried
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    /// Wait before the first retry
    pub initial_delay: Duration,
    /// Upper bound on any single wait
    pub max_delay: Duration,
    /// Growth factor applied to the wait after each retry
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
        }
    }

    /// Cap every wait at `max_delay`
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Preset: retries after a slug unique-constraint violation (3 attempts)
    /// Delays: 10ms, 20ms
    pub fn slug_conflict() -> Self {
        Self::new(3, Duration::from_millis(10))
            .with_max_delay(Duration::from_millis(100))
            .with_backoff_multiplier(2.0)
    }

    /// Preset: retry immediately, no waiting (used by tests and batch imports)
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO).with_max_delay(Duration::ZERO)
    }

    /// Wait before attempt `attempt` (0-based); the first attempt never waits
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match attempt {
            0 => Duration::ZERO,
            n => {
                let factor = self.backoff_multiplier.powi(n as i32 - 1);
                let nanos = self.initial_delay.as_nanos() as f64 * factor;
                Duration::from_nanos(nanos as u64).min(self.max_delay)
            }
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::slug_conflict()
    }
}

/// Run `operation` until it succeeds, `should_retry` rejects its error, or
/// `config.max_attempts` is used up.
///
/// The closure receives the 0-based attempt number. The last error is returned
/// when attempts run out. A `max_attempts` of 0 still runs the operation once.
pub fn with_retry_if<T, E, F, P>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut(u32) -> Result<T, E>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = config.max_attempts.max(1);

    let mut attempt = 0;
    loop {
        match operation(attempt) {
            Ok(value) => {
                if attempt > 0 {
                    debug!("{}: succeeded after {} retries", operation_name, attempt);
                }
                return Ok(value);
            }
            Err(e) if !should_retry(&e) => {
                debug!("{}: not retryable: {}", operation_name, e);
                return Err(e);
            }
            Err(e) if attempt + 1 >= max_attempts => {
                warn!(
                    "{}: giving up after {} attempts, last error: {}",
                    operation_name, max_attempts, e
                );
                return Err(e);
            }
            Err(e) => {
                attempt += 1;
                let delay = config.delay_for_attempt(attempt);
                warn!(
                    "{}: attempt {}/{} failed ({}), retrying in {:?}",
                    operation_name, attempt, max_attempts, e, delay
                );
                if !delay.is_zero() {
                    sleep(delay);
                }
            }
        }
    }
}
