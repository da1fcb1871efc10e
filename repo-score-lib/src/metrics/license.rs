use super::{Calculator, ClassifierPolicy, Fault, MetricKind, MetricResult};
use crate::Result;
use crate::facts::RepoSpec;
use crate::facts::hosting::{LicenseInfo, QueryTransport, fetch_license_info};
use ohno::bail;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const LOG_TARGET: &str = "   license";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LicensePolicy {
    /// SPDX identifiers considered compatible
    pub compatible_spdx_ids: Vec<String>,

    /// License name the platform uses when it could not identify the license
    pub other_license_name: String,

    /// Git object expressions probed for a `LICENSE` file
    pub license_paths: Vec<String>,

    pub classifier: ClassifierPolicy,
}

impl LicensePolicy {
    /// Score license metadata: 1 when compatible, otherwise 0.
    #[must_use]
    pub fn score(&self, info: &LicenseInfo) -> f64 {
        if self.is_compatible(info) { 1.0 } else { 0.0 }
    }

    fn is_compatible(&self, info: &LicenseInfo) -> bool {
        // A LICENSE file alone does not count as license metadata
        if !info.has_metadata() {
            return false;
        }

        let unidentified = info.name.as_deref().is_some_and(|name| name.eq_ignore_ascii_case(&self.other_license_name));
        if unidentified && let Some(text) = &info.raw_text {
            return self.classifier.is_compatible(text);
        }

        info.spdx_id
            .as_deref()
            .is_some_and(|id| self.compatible_spdx_ids.iter().any(|allowed| allowed.eq_ignore_ascii_case(id)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.license_paths.is_empty() {
            bail!("license.license_paths must name at least one path");
        }

        self.classifier.validate()
    }
}

/// Scores a repository on whether its license is compatible.
#[derive(Debug)]
pub struct LicenseCalculator<'a, T> {
    transport: &'a T,
    policy: &'a LicensePolicy,
}

impl<'a, T: QueryTransport> LicenseCalculator<'a, T> {
    #[must_use]
    pub const fn new(transport: &'a T, policy: &'a LicensePolicy) -> Self {
        Self { transport, policy }
    }
}

impl<T: QueryTransport> Calculator for LicenseCalculator<'_, T> {
    fn kind(&self) -> MetricKind {
        MetricKind::License
    }

    async fn calculate(&self, repo: &RepoSpec) -> Result<MetricResult, Fault> {
        let start = Instant::now();

        let info = fetch_license_info(self.transport, repo, &self.policy.license_paths).await?;
        let score = self.policy.score(&info);

        log::debug!(
            target: LOG_TARGET,
            "License for '{repo}': spdx={:?} name={:?} text={} => {score}",
            info.spdx_id,
            info.name,
            if info.raw_text.is_some() { "present" } else { "absent" }
        );

        Ok(MetricResult::new(score, start.elapsed()))
    }
}
