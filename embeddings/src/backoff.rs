//! Jittered exponential backoff for retrying failed embedding calls
//! (spec §5: "jittered exponential backoff up to a bounded attempt
//! count"). Dependency-free: jitter is derived from a small xorshift
//! PRNG seeded off the system clock, in the same hand-rolled-math spirit
//! as the content hashing in `knowcode-model::ids`.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

struct XorShift64(u64);

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self(seed | 1)
    }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Returns a value in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64 {
        (self.next() >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn seed() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos() as u64).unwrap_or(0x9E3779B97F4A7C15)
}

/// Computes the delay before attempt `attempt` (1-based), full jitter
/// between 0 and `base * 2^(attempt-1)`, capped at `max_delay`.
pub fn backoff_delay(attempt: u32, base: Duration, max_delay: Duration) -> Duration {
    let mut rng = XorShift64::new(seed().wrapping_add(attempt as u64));
    let exp = base.as_millis().saturating_mul(1u128 << attempt.saturating_sub(1).min(20));
    let capped = exp.min(max_delay.as_millis());
    let jittered = (capped as f64 * rng.next_f64()) as u64;
    Duration::from_millis(jittered)
}

/// Retries `f` up to `max_attempts` times, sleeping a jittered backoff
/// delay between attempts. Returns the last error if every attempt fails.
pub async fn retry_with_backoff<T, E, F, Fut>(max_attempts: u32, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut last_err = None;
    for attempt in 1..=max_attempts.max(1) {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                if attempt < max_attempts {
                    let delay = backoff_delay(attempt, Duration::from_millis(200), Duration::from_secs(10));
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
        }
    }
    Err(last_err.expect("max_attempts >= 1 guarantees at least one iteration"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_never_exceeds_cap() {
        for attempt in 1..10 {
            let d = backoff_delay(attempt, Duration::from_millis(100), Duration::from_millis(500));
            assert!(d <= Duration::from_millis(500));
        }
    }

    #[tokio::test]
    async fn retry_succeeds_eventually() {
        let mut calls = 0;
        let result: Result<i32, &str> = retry_with_backoff(3, || {
            calls += 1;
            let attempt = calls;
            async move { if attempt < 3 { Err("not yet") } else { Ok(42) } }
        })
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls, 3);
    }
}
