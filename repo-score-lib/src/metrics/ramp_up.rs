use super::{Calculator, Fault, MetricKind, MetricResult};
use crate::Result;
use crate::facts::RepoSpec;
use crate::facts::checkout::{checkout_dir, remove_checkout, shallow_clone};
use ohno::bail;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

const LOG_TARGET: &str = "   ramp-up";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RampUpPolicy {
    /// Whether the pipeline runs this calculator at all
    pub enabled: bool,

    /// Score reported for any successful checkout
    pub neutral_score: f64,

    /// Base URL repositories are cloned from
    pub clone_base_url: String,

    /// Base directory for checkouts, defaults to the system temporary directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_dir: Option<PathBuf>,
}

impl RampUpPolicy {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.neutral_score) {
            bail!("ramp_up.neutral_score must be between 0 and 1, got {}", self.neutral_score);
        }

        if self.clone_base_url.trim().is_empty() {
            bail!("ramp_up.clone_base_url must not be empty");
        }

        Ok(())
    }

    fn base_dir(&self) -> PathBuf {
        self.checkout_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    fn clone_url(&self, repo: &RepoSpec) -> String {
        format!("{}/{}/{}", self.clone_base_url.trim_end_matches('/'), repo.owner(), repo.name())
    }
}

/// Scores how easy a repository is to pick up.
///
/// Requires a working checkout; the score itself is currently the policy's neutral value.
#[derive(Debug)]
pub struct RampUpCalculator<'a> {
    policy: &'a RampUpPolicy,
}

impl<'a> RampUpCalculator<'a> {
    #[must_use]
    pub const fn new(policy: &'a RampUpPolicy) -> Self {
        Self { policy }
    }
}

impl Calculator for RampUpCalculator<'_> {
    fn kind(&self) -> MetricKind {
        MetricKind::RampUp
    }

    async fn calculate(&self, repo: &RepoSpec) -> Result<MetricResult, Fault> {
        let start = Instant::now();
        let dir = checkout_dir(&self.policy.base_dir(), repo);

        cleanup(&dir);
        let outcome = shallow_clone(&self.policy.clone_url(repo), &dir).await;
        cleanup(&dir);

        outcome.map_err(Fault::Checkout)?;

        log::debug!(target: LOG_TARGET, "Checked out '{repo}' => {}", self.policy.neutral_score);
        Ok(MetricResult::new(self.policy.neutral_score, start.elapsed()))
    }
}

fn cleanup(dir: &Path) {
    if let Err(e) = remove_checkout(dir) {
        log::warn!(target: LOG_TARGET, "Could not remove checkout '{}': {e}", dir.display());
    }
}
