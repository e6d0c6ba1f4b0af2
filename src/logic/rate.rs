//! Transfer rate sampling
//!
//! Rates are recomputed from amount-delta / time-delta, but only once at least
//! `min_interval` has passed since the previous sample so the label does not
//! jitter on every progress callback. The caller supplies the clock.

use std::time::{Duration, Instant};

/// Smoothing factor for server-side upload rates
pub const UPLOAD_SMOOTHING: f64 = 0.25;

/// Minimum spacing between rate samples while the client is sending bytes
pub const SEND_SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

/// Minimum spacing between rate samples derived from polled percentages
pub const POLL_SAMPLE_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct RateSampler {
    min_interval: Duration,
    last_amount: f64,
    last_time: Instant,
    smoothing: Option<f64>,
    smoothed: f64,
}

impl RateSampler {
    /// Plain sampler: every accepted sample is reported as-is
    pub fn new(start: Instant, min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_amount: 0.0,
            last_time: start,
            smoothing: None,
            smoothed: 0.0,
        }
    }

    /// Exponentially smoothed sampler
    ///
    /// The first non-zero sample seeds the average; later samples are blended
    /// in with weight `factor`.
    pub fn smoothed(start: Instant, min_interval: Duration, factor: f64) -> Self {
        Self {
            smoothing: Some(factor.clamp(0.0, 1.0)),
            ..Self::new(start, min_interval)
        }
    }

    /// Feed the running total (bytes, or bytes derived from a percentage).
    ///
    /// Returns the new rate in bytes/second when a sample was taken, `None`
    /// when the call came too soon after the previous sample.
    pub fn sample(&mut self, amount: f64, now: Instant) -> Option<f64> {
        let elapsed = now.saturating_duration_since(self.last_time);
        if elapsed < self.min_interval || elapsed.is_zero() {
            return None;
        }

        let rate = ((amount - self.last_amount) / elapsed.as_secs_f64()).max(0.0);
        self.last_amount = amount;
        self.last_time = now;

        let reported = match self.smoothing {
            Some(factor) if self.smoothed > 0.0 => self.smoothed * (1.0 - factor) + rate * factor,
            _ => rate,
        };
        self.smoothed = reported;
        Some(reported)
    }
}

/// Bytes represented by `percent` of a file of `total` bytes
pub fn bytes_at_percent(percent: f64, total: u64) -> f64 {
    percent / 100.0 * total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_too_soon_returns_none() {
        let start = Instant::now();
        let mut sampler = RateSampler::new(start, SEND_SAMPLE_INTERVAL);
        assert_eq!(sampler.sample(1000.0, start + ms(100)), None);
        assert_eq!(sampler.sample(1000.0, start + ms(199)), None);
    }

    #[test]
    fn test_rate_from_delta() {
        let start = Instant::now();
        let mut sampler = RateSampler::new(start, SEND_SAMPLE_INTERVAL);

        // 2048 bytes in half a second
        let rate = sampler.sample(2048.0, start + ms(500)).unwrap();
        assert!((rate - 4096.0).abs() < 1e-6);

        // next window measures only the new bytes
        let rate = sampler.sample(3072.0, start + ms(1500)).unwrap();
        assert!((rate - 1024.0).abs() < 1e-6);
    }

    #[test]
    fn test_skipped_calls_do_not_move_the_window() {
        let start = Instant::now();
        let mut sampler = RateSampler::new(start, POLL_SAMPLE_INTERVAL);
        assert!(sampler.sample(100.0, start + ms(100)).is_none());
        let rate = sampler.sample(300.0, start + ms(300)).unwrap();
        assert!((rate - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_delta_clamped() {
        let start = Instant::now();
        let mut sampler = RateSampler::new(start, POLL_SAMPLE_INTERVAL);
        sampler.sample(500.0, start + ms(400)).unwrap();
        let rate = sampler.sample(100.0, start + ms(800)).unwrap();
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn test_smoothing_seeds_then_blends() {
        let start = Instant::now();
        let mut sampler = RateSampler::smoothed(start, POLL_SAMPLE_INTERVAL, UPLOAD_SMOOTHING);

        // 1000 B/s seeds the average
        let first = sampler.sample(1000.0, start + ms(1000)).unwrap();
        assert!((first - 1000.0).abs() < 1e-6);

        // 2000 B/s raw → 0.75 * 1000 + 0.25 * 2000
        let second = sampler.sample(3000.0, start + ms(2000)).unwrap();
        assert!((second - 1250.0).abs() < 1e-6);
    }

    #[test]
    fn test_smoothing_reseeds_after_zero() {
        let start = Instant::now();
        let mut sampler = RateSampler::smoothed(start, POLL_SAMPLE_INTERVAL, UPLOAD_SMOOTHING);
        assert_eq!(sampler.sample(0.0, start + ms(1000)), Some(0.0));
        let rate = sampler.sample(800.0, start + ms(2000)).unwrap();
        assert!((rate - 800.0).abs() < 1e-6);
    }

    #[test]
    fn test_bytes_at_percent() {
        assert_eq!(bytes_at_percent(50.0, 2000), 1000.0);
        assert_eq!(bytes_at_percent(0.0, 2000), 0.0);
        assert_eq!(bytes_at_percent(100.0, 0), 0.0);
    }
}
