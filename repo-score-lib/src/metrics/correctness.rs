use super::{Calculator, Fault, MetricKind, MetricResult, clamp_score, round3};
use crate::Result;
use crate::facts::RepoSpec;
use crate::facts::hosting::{ActivityStats, QueryTransport, fetch_activity_stats};
use chrono::{DateTime, TimeDelta, Utc};
use core::time::Duration;
use ohno::bail;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const LOG_TARGET: &str = "correctness";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorrectnessPolicy {
    /// Trailing window for counting recent commits
    #[serde(with = "humantime_serde")]
    pub recent_commit_window: Duration,

    /// Commits within the window that earn the full commit ratio
    pub recent_commit_target: u64,
}

impl CorrectnessPolicy {
    /// Average of the issue, release, and recent commit ratios, rounded to three decimals.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "commit counts are far below 2^52")]
    pub fn score(&self, stats: &ActivityStats) -> f64 {
        let issue_ratio = ratio(stats.issues.closed, stats.issues.open);
        let pr_ratio = ratio(stats.pull_requests.releases, stats.pull_requests.open);
        let recent_commit_ratio = if self.recent_commit_target == 0 {
            0.0
        } else {
            (stats.recent_commits as f64 / self.recent_commit_target as f64).min(1.0)
        };

        round3(clamp_score((issue_ratio + pr_ratio + recent_commit_ratio) / 3.0))
    }

    pub fn validate(&self) -> Result<()> {
        if self.recent_commit_target == 0 {
            bail!("correctness.recent_commit_target must be greater than zero");
        }

        if self.recent_commit_window.is_zero() {
            bail!("correctness.recent_commit_window must be greater than zero");
        }

        Ok(())
    }
}

/// `part / (part + rest)`, or 0 when both are zero.
#[expect(clippy::cast_precision_loss, reason = "counts are far below 2^52")]
fn ratio(part: u64, rest: u64) -> f64 {
    let total = part.saturating_add(rest);
    if total == 0 { 0.0 } else { part as f64 / total as f64 }
}

/// Scores a repository on how well it keeps up with issues, releases, and commits.
#[derive(Debug)]
pub struct CorrectnessCalculator<'a, T> {
    transport: &'a T,
    policy: &'a CorrectnessPolicy,
    now: DateTime<Utc>,
}

impl<'a, T: QueryTransport> CorrectnessCalculator<'a, T> {
    #[must_use]
    pub const fn new(transport: &'a T, policy: &'a CorrectnessPolicy, now: DateTime<Utc>) -> Self {
        Self { transport, policy, now }
    }

    fn since(&self) -> DateTime<Utc> {
        let window = TimeDelta::from_std(self.policy.recent_commit_window).unwrap_or(TimeDelta::MAX);
        self.now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl<T: QueryTransport> Calculator for CorrectnessCalculator<'_, T> {
    fn kind(&self) -> MetricKind {
        MetricKind::Correctness
    }

    async fn calculate(&self, repo: &RepoSpec) -> Result<MetricResult, Fault> {
        let start = Instant::now();

        let stats = fetch_activity_stats(self.transport, repo, self.since()).await?;
        let score = self.policy.score(&stats);

        log::debug!(target: LOG_TARGET, "Activity for '{repo}': {stats:?} => {score}");

        Ok(MetricResult::new(score, start.elapsed()))
    }
}
