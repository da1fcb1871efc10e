use super::{MetricResult, clamp_score, round3};
use crate::Result;
use ohno::bail;
use serde::{Deserialize, Serialize};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Contribution of each sub-metric to the net score.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    pub license: f64,
    pub ramp_up: f64,
    pub correctness: f64,
    pub responsiveness: f64,
}

impl Weights {
    /// Weighted sum of the sub-scores, clamped to `[0, 1]` and rounded to three decimals.
    #[must_use]
    pub fn net_score(&self, license: f64, ramp_up: f64, correctness: f64, responsiveness: f64) -> f64 {
        let sum = self.ramp_up.mul_add(
            ramp_up,
            self.license
                .mul_add(license, self.correctness.mul_add(correctness, self.responsiveness * responsiveness)),
        );
        round3(clamp_score(sum))
    }

    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("license", self.license),
            ("ramp_up", self.ramp_up),
            ("correctness", self.correctness),
            ("responsiveness", self.responsiveness),
        ];

        for (name, value) in weights {
            if !(0.0..=1.0).contains(&value) {
                bail!("weights.{name} must be between 0 and 1, got {value}");
            }
        }

        let total: f64 = weights.iter().map(|(_, value)| value).sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            bail!("weights must sum to 1, got {total}");
        }

        Ok(())
    }
}

/// Every sub-metric for one repository together with the combined score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetScoreResult {
    pub license: MetricResult,
    pub correctness: MetricResult,
    pub responsiveness: MetricResult,

    /// `None` when ramp-up was not measured
    pub ramp_up: Option<MetricResult>,

    pub net_score: f64,
}

impl NetScoreResult {
    /// Combine sub-metrics under `weights`. An unmeasured ramp-up contributes 0.
    #[must_use]
    pub fn aggregate(
        weights: &Weights,
        license: MetricResult,
        correctness: MetricResult,
        responsiveness: MetricResult,
        ramp_up: Option<MetricResult>,
    ) -> Self {
        let net_score = weights.net_score(
            license.score(),
            ramp_up.map_or(0.0, |r| r.score()),
            correctness.score(),
            responsiveness.score(),
        );

        Self {
            license,
            correctness,
            responsiveness,
            ramp_up,
            net_score,
        }
    }
}
