use super::client::{LOG_TARGET, decode_repository};
use super::{QueryError, QueryTransport};
use crate::Result;
use crate::facts::RepoSpec;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use serde_json::json;

const TIMELINE_QUERY: &str = "
query($owner: String!, $name: String!, $count: Int!) {
  repository(owner: $owner, name: $name) {
    pullRequests(first: $count, states: [OPEN, MERGED, CLOSED], orderBy: { field: CREATED_AT, direction: DESC }) {
      nodes { createdAt closedAt mergedAt }
    }
    issues(first: $count, states: [OPEN, CLOSED], orderBy: { field: CREATED_AT, direction: DESC }) {
      nodes { createdAt closedAt }
    }
  }
}";

/// GitHub caps connection page sizes at 100
pub const MAX_SAMPLE_SIZE: u32 = 100;

/// Creation and resolution timestamps of a single issue or pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTimes {
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

impl ItemTimes {
    /// Time from creation to closure, or to merge when no closure was recorded.
    ///
    /// Returns `None` for items that are still unresolved.
    #[must_use]
    pub fn resolution_time(&self) -> Option<TimeDelta> {
        self.closed_at.or(self.merged_at).map(|resolved_at| resolved_at - self.created_at)
    }
}

/// The most recent pull requests and issues of a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    pub pull_requests: Vec<ItemTimes>,
    pub issues: Vec<ItemTimes>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineNode {
    pull_requests: Connection,
    issues: Connection,
}

#[derive(Debug, Deserialize)]
struct Connection {
    #[serde(default)]
    nodes: Vec<Option<ItemTimes>>,
}

impl Connection {
    fn into_items(self) -> Vec<ItemTimes> {
        self.nodes.into_iter().flatten().collect()
    }
}

/// Fetch up to `count` of the most recently created pull requests and issues.
pub async fn fetch_timeline(transport: &impl QueryTransport, repo: &RepoSpec, count: u32) -> Result<Timeline, QueryError> {
    let count = count.clamp(1, MAX_SAMPLE_SIZE);
    log::info!(target: LOG_TARGET, "Querying the {count} most recent issues and pull requests for '{repo}'");

    let data = transport
        .execute(
            TIMELINE_QUERY,
            json!({
                "owner": repo.owner(),
                "name": repo.name(),
                "count": count,
            }),
        )
        .await?;

    let node: TimelineNode = decode_repository(data, repo)?;

    Ok(Timeline {
        pull_requests: node.pull_requests.into_items(),
        issues: node.issues.into_items(),
    })
}
