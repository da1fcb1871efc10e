use core::time::Duration;

/// Score produced by one calculator, with the time it took to produce it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricResult {
    score: f64,
    latency_seconds: f64,
}

impl MetricResult {
    /// What a failed calculator contributes.
    pub const ZERO: Self = Self {
        score: 0.0,
        latency_seconds: 0.0,
    };

    /// Clamps `score` into `[0, 1]` (NaN becomes 0) and rounds the latency to milliseconds.
    #[must_use]
    pub fn new(score: f64, latency: Duration) -> Self {
        Self {
            score: clamp_score(score),
            latency_seconds: round3(latency.as_secs_f64()),
        }
    }

    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub const fn latency_seconds(&self) -> f64 {
        self.latency_seconds
    }
}

/// Clamp into `[0, 1]`, mapping NaN to 0.
#[must_use]
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Round to three decimal places.
#[must_use]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_score() {
        assert!((MetricResult::new(1.5, Duration::ZERO).score() - 1.0).abs() < f64::EPSILON);
        assert!(MetricResult::new(-0.5, Duration::ZERO).score().abs() < f64::EPSILON);
        assert!(MetricResult::new(f64::NAN, Duration::ZERO).score().abs() < f64::EPSILON);
        assert!(MetricResult::new(f64::INFINITY, Duration::ZERO).score() <= 1.0);
    }

    #[test]
    fn test_new_rounds_latency() {
        let result = MetricResult::new(0.5, Duration::from_micros(1_234_567));
        assert!((result.latency_seconds() - 1.235).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero() {
        assert!(MetricResult::ZERO.score().abs() < f64::EPSILON);
        assert!(MetricResult::ZERO.latency_seconds().abs() < f64::EPSILON);
    }

    #[test]
    fn test_round3() {
        assert!((round3(0.833_333) - 0.833).abs() < f64::EPSILON);
        assert!((round3(1.234_56) - 1.235).abs() < 1e-9);
    }
}
