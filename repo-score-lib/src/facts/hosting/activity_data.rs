use super::client::{LOG_TARGET, decode_repository};
use super::{QueryError, QueryTransport};
use crate::Result;
use crate::facts::RepoSpec;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;

const ACTIVITY_QUERY: &str = "
query($owner: String!, $name: String!, $since: GitTimestamp!) {
  repository(owner: $owner, name: $name) {
    openIssues: issues(states: OPEN) { totalCount }
    closedIssues: issues(states: CLOSED) { totalCount }
    openPullRequests: pullRequests(states: OPEN) { totalCount }
    releases { totalCount }
    defaultBranchRef {
      target {
        ... on Commit { history(since: $since) { totalCount } }
      }
    }
  }
}";

/// Issue counts across the repository's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueStats {
    pub open: u64,
    pub closed: u64,
}

/// Pull request and release counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullRequestStats {
    pub open: u64,
    pub releases: u64,
}

/// Counts used to judge how well a project keeps on top of its work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityStats {
    pub issues: IssueStats,
    pub pull_requests: PullRequestStats,

    /// Commits on the default branch since the requested instant.
    pub recent_commits: u64,
}

#[derive(Debug, Deserialize)]
struct Count {
    #[serde(rename = "totalCount")]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityNode {
    open_issues: Count,
    closed_issues: Count,
    open_pull_requests: Count,
    releases: Count,
    default_branch_ref: Option<BranchRef>,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    target: Option<CommitTarget>,
}

/// `history` is absent when the branch tip is not a commit
#[derive(Debug, Deserialize)]
struct CommitTarget {
    history: Option<Count>,
}

/// Fetch issue, pull request, release, and recent commit counts in a single query.
///
/// An empty repository has no default branch; its recent commit count is zero.
pub async fn fetch_activity_stats(transport: &impl QueryTransport, repo: &RepoSpec, since: DateTime<Utc>) -> Result<ActivityStats, QueryError> {
    log::info!(target: LOG_TARGET, "Querying issue and commit activity for '{repo}'");

    let data = transport
        .execute(
            ACTIVITY_QUERY,
            json!({
                "owner": repo.owner(),
                "name": repo.name(),
                "since": since.to_rfc3339_opts(SecondsFormat::Secs, true),
            }),
        )
        .await?;

    let node: ActivityNode = decode_repository(data, repo)?;

    let recent_commits = node
        .default_branch_ref
        .and_then(|r| r.target)
        .and_then(|t| t.history)
        .map_or(0, |h| h.total_count);

    Ok(ActivityStats {
        issues: IssueStats {
            open: node.open_issues.total_count,
            closed: node.closed_issues.total_count,
        },
        pull_requests: PullRequestStats {
            open: node.open_pull_requests.total_count,
            releases: node.releases.total_count,
        },
        recent_commits,
    })
}
