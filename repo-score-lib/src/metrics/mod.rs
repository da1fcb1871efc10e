//! Turning repository facts into scores
//!
//! Each sub-metric is a [`Calculator`] producing a [`MetricResult`] or a [`Fault`]. The
//! [`Pipeline`] runs the calculators concurrently, treats a fault as a zero score, and
//! combines the results into a [`NetScoreResult`] under the configured [`Weights`].
//!
//! Every scoring rule is driven by a policy value loaded from configuration, so no
//! thresholds or license tables live in code.

mod calculator;
mod correctness;
mod fault;
mod license;
mod license_classifier;
mod metric_kind;
mod metric_result;
mod net_score;
mod pipeline;
mod ramp_up;
mod responsiveness;

pub use calculator::Calculator;
pub use correctness::{CorrectnessCalculator, CorrectnessPolicy};
pub use fault::Fault;
pub use license::{LicenseCalculator, LicensePolicy};
pub use license_classifier::ClassifierPolicy;
pub use metric_kind::MetricKind;
pub use metric_result::{MetricResult, clamp_score, round3};
pub use net_score::{NetScoreResult, Weights};
pub use pipeline::Pipeline;
pub use ramp_up::{RampUpCalculator, RampUpPolicy};
pub use responsiveness::{ResponsivenessCalculator, ResponsivenessPolicy, average_resolution_time};
