//! Exponential reconnect backoff with jitter.
//!
//! Keeps a lost backend link from turning into a tight reconnect loop and a
//! log storm.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
    jitter_ratio: f64,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        let base = base.max(Duration::from_millis(1));
        Self {
            base,
            max: max.max(base),
            current: base,
            jitter_ratio: 0.2,
        }
    }

    /// Successful connect: start over from the base delay.
    pub fn reset(&mut self) {
        self.current = self.base;
    }

    /// Failed attempt: double the delay up to the cap and return how long
    /// to wait before retrying.
    pub fn fail(&mut self) -> Duration {
        let delay = add_jitter(self.current, self.jitter_ratio);
        self.current = self.current.saturating_mul(2).min(self.max);
        delay
    }
}

fn add_jitter(delay: Duration, ratio: f64) -> Duration {
    let delay_ms = delay.as_millis();
    let jitter_max = ((delay_ms as f64) * ratio) as u128;
    if jitter_max == 0 {
        return delay;
    }

    let now_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    let jitter_ms = (now_nanos as u128) % (jitter_max + 1);
    delay + Duration::from_millis(jitter_ms as u64)
}
