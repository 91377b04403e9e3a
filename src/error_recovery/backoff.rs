// src/error_recovery/backoff.rs
//! Exponential backoff with jitter.

use crate::constants::{JITTER_FRACTION, MAX_BACKOFF_DELAY, MAX_BACKOFF_EXPONENT};
use std::time::Duration;

/// Delay before retry number `attempt` (0-based), capped at
/// [`MAX_BACKOFF_DELAY`].
///
/// `base * 2^attempt` plus uniform jitter in `[0, 0.3 * base * 2^attempt)`.
pub fn compute_delay(attempt: u32, base: Duration) -> Duration {
    compute_delay_with_ceiling(attempt, base, MAX_BACKOFF_DELAY)
}

/// As [`compute_delay`] with an explicit ceiling.
pub fn compute_delay_with_ceiling(attempt: u32, base: Duration, ceiling: Duration) -> Duration {
    let exponent = attempt.min(MAX_BACKOFF_EXPONENT) as i32;
    let computed = base.as_secs_f64() * 2f64.powi(exponent);
    if computed <= 0.0 {
        return Duration::ZERO;
    }

    let ceiling_secs = ceiling.as_secs_f64();
    if computed >= ceiling_secs {
        return ceiling;
    }

    let jitter = rand::random::<f64>() * JITTER_FRACTION * computed;
    Duration::from_secs_f64((computed + jitter).min(ceiling_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Duration = Duration::from_millis(1_000);

    #[test]
    fn never_below_the_exponential_floor_nor_above_the_ceiling() {
        for attempt in 0..64 {
            for _ in 0..20 {
                let delay = compute_delay(attempt, BASE);
                let floor = BASE.as_secs_f64() * 2f64.powi(attempt.min(32) as i32);
                assert!(delay <= MAX_BACKOFF_DELAY, "attempt {}: {:?}", attempt, delay);
                assert!(
                    delay.as_secs_f64() >= floor.min(MAX_BACKOFF_DELAY.as_secs_f64()),
                    "attempt {}: {:?} below floor {}",
                    attempt,
                    delay,
                    floor
                );
            }
        }
    }

    #[test]
    fn jitter_stays_within_thirty_percent() {
        for _ in 0..200 {
            let delay = compute_delay(2, BASE).as_secs_f64();
            assert!((4.0..4.0 * 1.3).contains(&delay), "{}", delay);
        }
    }

    #[test]
    fn huge_attempt_counts_do_not_overflow() {
        assert_eq!(compute_delay(u32::MAX, BASE), MAX_BACKOFF_DELAY);
    }

    #[test]
    fn custom_ceiling_is_respected() {
        let ceiling = Duration::from_millis(50);
        let delay = compute_delay_with_ceiling(10, Duration::from_millis(10), ceiling);
        assert_eq!(delay, ceiling);
    }

    #[test]
    fn zero_base_means_no_wait() {
        assert_eq!(compute_delay(5, Duration::ZERO), Duration::ZERO);
    }
}
