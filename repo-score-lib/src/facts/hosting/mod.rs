mod activity_data;
mod client;
mod license_data;
mod query_error;
mod timeline_data;

pub use activity_data::{ActivityStats, IssueStats, PullRequestStats, fetch_activity_stats};
pub use client::{Client, QueryTransport};
pub use license_data::{LicenseInfo, fetch_license_info};
pub use query_error::QueryError;
pub use timeline_data::{ItemTimes, MAX_SAMPLE_SIZE, Timeline, fetch_timeline};
