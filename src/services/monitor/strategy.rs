use rand::Rng;
use std::time::Duration;

/// Delay between two polls.
///
/// A flat period by default. A non-zero `jitter_factor` spreads each delay
/// uniformly over `period × [1 - jitter, 1 + jitter]`.
#[derive(Debug, Clone)]
pub struct RetryPeriod {
    pub period: Duration,
    pub jitter_factor: f64,
}

impl RetryPeriod {
    pub fn new(period: Duration, jitter_factor: f64) -> Self {
        Self {
            period,
            jitter_factor: jitter_factor.clamp(0.0, 0.99),
        }
    }

    pub fn flat(period: Duration) -> Self {
        Self::new(period, 0.0)
    }

    pub fn next_delay(&self) -> Duration {
        if self.jitter_factor == 0.0 {
            return self.period;
        }

        let mut rng = rand::rng();
        let jitter = 1.0 + (rng.random::<f64>() * 2.0 - 1.0) * self.jitter_factor;

        self.period.mul_f64(jitter)
    }
}

impl Default for RetryPeriod {
    fn default() -> Self {
        Self::flat(Duration::from_secs(600))
    }
}
