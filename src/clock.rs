//! Elapsed time and instantaneous typing speed.

use crate::util::round_to;
use std::time::{Duration, Instant};

/// Lower bound for the elapsed time used as a speed denominator
pub const MIN_ELAPSED: Duration = Duration::from_millis(1);

pub fn elapsed(start: Instant) -> Duration {
    elapsed_until(start, Instant::now())
}

/// Time between `start` and `now`, clamped to [`MIN_ELAPSED`]
pub fn elapsed_until(start: Instant, now: Instant) -> Duration {
    now.saturating_duration_since(start).max(MIN_ELAPSED)
}

/// Characters per second since `start`, rounded to 3 decimals
pub fn speed(start: Instant, chars_processed: usize) -> f64 {
    speed_over(elapsed(start), chars_processed)
}

pub fn speed_over(elapsed: Duration, chars_processed: usize) -> f64 {
    let secs = elapsed.max(MIN_ELAPSED).as_secs_f64();
    round_to(chars_processed as f64 / secs, 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_is_rounded_to_three_places() {
        assert_eq!(speed_over(Duration::from_secs(3), 2), 0.667);
        assert_eq!(speed_over(Duration::from_secs(2), 10), 5.0);
    }

    #[test]
    fn zero_elapsed_is_clamped() {
        let speed = speed_over(Duration::ZERO, 1);
        assert!(speed.is_finite());
        assert_eq!(speed, 1000.0);
    }

    #[test]
    fn no_chars_means_zero_speed() {
        assert_eq!(speed_over(Duration::from_millis(500), 0), 0.0);
    }

    #[test]
    fn elapsed_until_never_goes_backwards() {
        let now = Instant::now();
        let later = now + Duration::from_secs(2);
        assert_eq!(elapsed_until(later, now), MIN_ELAPSED);
        assert_eq!(elapsed_until(now, later), Duration::from_secs(2));
    }

    #[test]
    fn live_speed_is_finite() {
        let start = Instant::now();
        assert!(speed(start, 5).is_finite());
        assert!(elapsed(start) >= MIN_ELAPSED);
    }
}
