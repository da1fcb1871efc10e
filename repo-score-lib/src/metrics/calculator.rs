use super::{Fault, MetricKind, MetricResult};
use crate::facts::RepoSpec;

/// A single sub-metric.
///
/// Implementations measure their own latency and report failures as a [`Fault`] rather
/// than a zero score, leaving the fallback to the caller.
pub trait Calculator {
    fn kind(&self) -> MetricKind;

    fn calculate(&self, repo: &RepoSpec) -> impl Future<Output = Result<MetricResult, Fault>>;
}
