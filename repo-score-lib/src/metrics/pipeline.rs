use super::{
    Calculator, CorrectnessCalculator, LicenseCalculator, MetricResult, NetScoreResult, RampUpCalculator, ResponsivenessCalculator,
    Weights,
};
use crate::commands::Config;
use crate::facts::RepoSpec;
use crate::facts::hosting::QueryTransport;
use chrono::{DateTime, Utc};

const LOG_TARGET: &str = "  pipeline";

/// Runs every enabled calculator against a repository and combines the results.
#[derive(Debug)]
pub struct Pipeline<'a, T> {
    license: LicenseCalculator<'a, T>,
    correctness: CorrectnessCalculator<'a, T>,
    responsiveness: ResponsivenessCalculator<'a, T>,
    ramp_up: Option<RampUpCalculator<'a>>,
    weights: &'a Weights,
}

impl<'a, T: QueryTransport> Pipeline<'a, T> {
    /// Build the calculators from `config`. `now` anchors the recent-commit window.
    #[must_use]
    pub fn new(transport: &'a T, config: &'a Config, now: DateTime<Utc>) -> Self {
        Self {
            license: LicenseCalculator::new(transport, &config.license),
            correctness: CorrectnessCalculator::new(transport, &config.correctness, now),
            responsiveness: ResponsivenessCalculator::new(transport, &config.responsiveness),
            ramp_up: config.ramp_up.enabled.then(|| RampUpCalculator::new(&config.ramp_up)),
            weights: &config.weights,
        }
    }

    /// Score `repo`. Calculator faults are logged and count as zero, so this never fails.
    pub async fn run(&self, repo: &RepoSpec) -> NetScoreResult {
        log::info!(target: LOG_TARGET, "Scoring '{repo}'");

        let ramp_up = async {
            match &self.ramp_up {
                Some(calculator) => Some(settle(calculator, repo).await),
                None => None,
            }
        };

        let (license, correctness, responsiveness, ramp_up) = tokio::join!(
            settle(&self.license, repo),
            settle(&self.correctness, repo),
            settle(&self.responsiveness, repo),
            ramp_up,
        );

        let result = NetScoreResult::aggregate(self.weights, license, correctness, responsiveness, ramp_up);
        log::info!(target: LOG_TARGET, "Net score for '{repo}': {}", result.net_score);
        result
    }
}

async fn settle(calculator: &impl Calculator, repo: &RepoSpec) -> MetricResult {
    match calculator.calculate(repo).await {
        Ok(result) => result,
        Err(fault) => {
            log::warn!(target: LOG_TARGET, "Could not compute the {} metric for '{repo}': {fault}", calculator.kind());
            MetricResult::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::hosting::QueryError;
    use serde_json::{Value, json};

    /// Answers each query kind from its own canned response, keyed on the query's variables.
    struct FakeTransport {
        license: Option<Value>,
        activity: Option<Value>,
        timeline: Option<Value>,
    }

    impl QueryTransport for FakeTransport {
        async fn execute(&self, _query: &str, variables: Value) -> Result<Value, QueryError> {
            let response = if variables.get("primaryPath").is_some() {
                &self.license
            } else if variables.get("since").is_some() {
                &self.activity
            } else {
                &self.timeline
            };

            response
                .clone()
                .ok_or_else(|| QueryError::Transport(ohno::app_err!("connection refused")))
        }
    }

    fn mit_license() -> Value {
        json!({
            "repository": {
                "licenseInfo": { "name": "MIT License", "spdxId": "MIT" },
                "primaryLicense": { "text": "MIT License" },
                "fallbackLicense": null
            }
        })
    }

    fn activity() -> Value {
        json!({
            "repository": {
                "openIssues": { "totalCount": 0 },
                "closedIssues": { "totalCount": 10 },
                "openPullRequests": { "totalCount": 0 },
                "releases": { "totalCount": 5 },
                "defaultBranchRef": { "target": { "history": { "totalCount": 15 } } }
            }
        })
    }

    fn unresolved_timeline() -> Value {
        json!({
            "repository": {
                "pullRequests": { "nodes": [{ "createdAt": "2024-01-01T00:00:00Z", "closedAt": null, "mergedAt": null }] },
                "issues": { "nodes": [{ "createdAt": "2024-01-01T00:00:00Z", "closedAt": null }] }
            }
        })
    }

    fn repo() -> RepoSpec {
        RepoSpec::new("owner", "name").unwrap()
    }

    #[tokio::test]
    async fn test_all_calculators_succeed() {
        let transport = FakeTransport {
            license: Some(mit_license()),
            activity: Some(activity()),
            timeline: Some(unresolved_timeline()),
        };
        let config = Config::default();
        let pipeline = Pipeline::new(&transport, &config, Utc::now());

        let result = pipeline.run(&repo()).await;

        assert!((result.license.score() - 1.0).abs() < f64::EPSILON);
        assert!((result.correctness.score() - 0.833).abs() < f64::EPSILON);
        assert!((result.responsiveness.score() - 0.3).abs() < f64::EPSILON);
        assert!(result.ramp_up.is_none());

        // 0.25 * (1 + 0.833 + 0.3)
        assert!((result.net_score - 0.533).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fault_becomes_zero() {
        let transport = FakeTransport {
            license: Some(mit_license()),
            activity: None,
            timeline: None,
        };
        let config = Config::default();
        let pipeline = Pipeline::new(&transport, &config, Utc::now());

        let result = pipeline.run(&repo()).await;

        assert!((result.license.score() - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.correctness, MetricResult::ZERO);
        assert_eq!(result.responsiveness, MetricResult::ZERO);
        assert!((result.net_score - 0.25).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_every_fault_yields_zero_net_score() {
        let transport = FakeTransport {
            license: None,
            activity: None,
            timeline: None,
        };
        let config = Config::default();
        let result = Pipeline::new(&transport, &config, Utc::now()).run(&repo()).await;

        assert!(result.net_score.abs() < f64::EPSILON);
        assert_eq!(result.license, MetricResult::ZERO);
    }

    #[tokio::test]
    async fn test_enabled_ramp_up_failure_is_reported_as_zero() {
        let tmp = tempfile::tempdir().unwrap();
        let transport = FakeTransport {
            license: Some(mit_license()),
            activity: None,
            timeline: None,
        };
        let mut config = Config::default();
        config.ramp_up.enabled = true;
        config.ramp_up.clone_base_url = tmp.path().join("missing").display().to_string();
        config.ramp_up.checkout_dir = Some(tmp.path().join("work"));

        let result = Pipeline::new(&transport, &config, Utc::now()).run(&repo()).await;

        assert_eq!(result.ramp_up, Some(MetricResult::ZERO));
        assert!((result.net_score - 0.25).abs() < f64::EPSILON);
    }
}
