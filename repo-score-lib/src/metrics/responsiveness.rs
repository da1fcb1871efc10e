use super::{Calculator, Fault, MetricKind, MetricResult};
use crate::Result;
use crate::facts::RepoSpec;
use crate::facts::hosting::{ItemTimes, MAX_SAMPLE_SIZE, QueryTransport, Timeline, fetch_timeline};
use chrono::TimeDelta;
use core::time::Duration;
use ohno::bail;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const LOG_TARGET: &str = "responsive";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResponsivenessPolicy {
    /// Most recent pull requests and issues to sample
    pub sample_size: u32,

    /// Largest acceptable average resolution time
    #[serde(with = "humantime_serde")]
    pub max_acceptable: Duration,

    pub both_within_score: f64,
    pub one_within_score: f64,
    pub neither_within_score: f64,
}

impl ResponsivenessPolicy {
    #[must_use]
    pub fn score(&self, timeline: &Timeline) -> f64 {
        let pr_average = average_resolution_time(&timeline.pull_requests);
        let issue_average = average_resolution_time(&timeline.issues);
        self.tier(pr_average, issue_average)
    }

    /// Map the two averages to a score. `None` is an unbounded average and is never within the limit.
    #[must_use]
    pub fn tier(&self, pr_average: Option<TimeDelta>, issue_average: Option<TimeDelta>) -> f64 {
        let limit = TimeDelta::from_std(self.max_acceptable).unwrap_or(TimeDelta::MAX);
        let within = |average: Option<TimeDelta>| average.is_some_and(|a| a < limit);

        match (within(pr_average), within(issue_average)) {
            (true, true) => self.both_within_score,
            (true, false) | (false, true) => self.one_within_score,
            (false, false) => self.neither_within_score,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 || self.sample_size > MAX_SAMPLE_SIZE {
            bail!("responsiveness.sample_size must be between 1 and {MAX_SAMPLE_SIZE}, got {}", self.sample_size);
        }

        for (name, value) in [
            ("both_within_score", self.both_within_score),
            ("one_within_score", self.one_within_score),
            ("neither_within_score", self.neither_within_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("responsiveness.{name} must be between 0 and 1, got {value}");
            }
        }

        Ok(())
    }
}

/// Mean time to resolve the items that have been resolved, or `None` when none have.
#[must_use]
pub fn average_resolution_time(items: &[ItemTimes]) -> Option<TimeDelta> {
    let (total, count) = items
        .iter()
        .filter_map(ItemTimes::resolution_time)
        .fold((TimeDelta::zero(), 0_i32), |(total, count), time| (total + time, count + 1));

    (count > 0).then(|| total / count)
}

/// Scores a repository on how quickly it resolves issues and pull requests.
#[derive(Debug)]
pub struct ResponsivenessCalculator<'a, T> {
    transport: &'a T,
    policy: &'a ResponsivenessPolicy,
}

impl<'a, T: QueryTransport> ResponsivenessCalculator<'a, T> {
    #[must_use]
    pub const fn new(transport: &'a T, policy: &'a ResponsivenessPolicy) -> Self {
        Self { transport, policy }
    }
}

impl<T: QueryTransport> Calculator for ResponsivenessCalculator<'_, T> {
    fn kind(&self) -> MetricKind {
        MetricKind::Responsiveness
    }

    async fn calculate(&self, repo: &RepoSpec) -> Result<MetricResult, Fault> {
        let start = Instant::now();

        let timeline = fetch_timeline(self.transport, repo, self.policy.sample_size).await?;
        let score = self.policy.score(&timeline);

        log::debug!(
            target: LOG_TARGET,
            "'{repo}': average PR resolution {:?}, average issue resolution {:?} => {score}",
            average_resolution_time(&timeline.pull_requests),
            average_resolution_time(&timeline.issues)
        );

        Ok(MetricResult::new(score, start.elapsed()))
    }
}
