use crate::cloud::TransportError;
use crate::config::{ConfigError, duration_millis};
use crate::domain::LogError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    #[serde(with = "duration_millis")]
    pub base_delay: Duration,
    #[serde(with = "duration_millis")]
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidConfig(
                "Retry max attempts must be greater than 0".to_string(),
            ));
        }

        if self.base_delay.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "Retry base delay must be greater than 0".to_string(),
            ));
        }

        // The cap must not flatten the sequence: the last delay ever slept
        // still has to be strictly larger than the one before it.
        if self.max_attempts >= 2 {
            let last = nominal_delay(self.base_delay, self.max_attempts - 2);
            if last > self.max_delay {
                return Err(ConfigError::InvalidConfig(format!(
                    "Retry max delay ({:?}) is below the last backoff step ({:?})",
                    self.max_delay, last
                )));
            }
        }

        Ok(())
    }
}

fn nominal_delay(base_delay: Duration, attempt: u32) -> Duration {
    let multiplier = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base_delay.saturating_mul(multiplier)
}

/// Exponential backoff policy plus the retry loop that applies it.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: RetryConfig,
}

impl Backoff {
    pub fn new(config: RetryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Delay to sleep after the failed attempt `attempt` (0-based).
    ///
    /// Without jitter this is `base_delay * 2^attempt`. Jitter stretches the
    /// delay by a factor in `[1.0, 1.5)`, which stays below the next
    /// doubling, so consecutive delays are always strictly increasing.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay = std::cmp::min(
            nominal_delay(self.config.base_delay, attempt),
            self.config.max_delay,
        );

        if self.config.jitter {
            Self::apply_jitter(delay)
        } else {
            delay
        }
    }

    fn apply_jitter(delay: Duration) -> Duration {
        let mut rng = rand::rng();
        let jitter_factor = rng.random_range(1.0..1.5);
        delay.mul_f64(jitter_factor)
    }

    /// Runs `op` until it succeeds or the attempt budget is spent, blocking
    /// the calling thread between attempts.
    pub fn retry<T, F>(&self, operation: &'static str, op: F) -> Result<T, LogError>
    where
        F: FnMut(u32) -> Result<T, TransportError>,
    {
        self.retry_with_sleep(operation, op, std::thread::sleep)
    }

    /// Same as [`Backoff::retry`] with the wait between attempts supplied by
    /// the caller. `op` receives the 0-based attempt number.
    pub fn retry_with_sleep<T, F, S>(
        &self,
        operation: &'static str,
        mut op: F,
        mut sleep: S,
    ) -> Result<T, LogError>
    where
        F: FnMut(u32) -> Result<T, TransportError>,
        S: FnMut(Duration),
    {
        let mut attempt = 0;

        loop {
            match op(attempt) {
                Ok(value) => {
                    if attempt > 0 {
                        debug!("{} succeeded on attempt {}", operation, attempt + 1);
                    }
                    return Ok(value);
                }
                Err(e) => {
                    attempt += 1;

                    if attempt >= self.config.max_attempts {
                        error!("{} failed after {} attempts: {}", operation, attempt, e);
                        return Err(LogError::RetriesExhausted {
                            operation,
                            attempts: attempt,
                            source: e,
                        });
                    }

                    let delay = self.calculate_delay(attempt - 1);
                    warn!(
                        "Retrying {} in {:?} (attempt {}): {}",
                        operation,
                        delay,
                        attempt + 1,
                        e
                    );
                    sleep(delay);
                }
            }
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            config: RetryConfig::default(),
        }
    }
}
