use super::client::{LOG_TARGET, decode_repository};
use super::{QueryError, QueryTransport};
use crate::Result;
use crate::facts::RepoSpec;
use serde::Deserialize;
use serde_json::json;

const LICENSE_QUERY: &str = "
query($owner: String!, $name: String!, $primaryPath: String!, $fallbackPath: String!) {
  repository(owner: $owner, name: $name) {
    licenseInfo { name spdxId }
    primaryLicense: object(expression: $primaryPath) { ... on Blob { text } }
    fallbackLicense: object(expression: $fallbackPath) { ... on Blob { text } }
  }
}";

/// License metadata as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseInfo {
    pub spdx_id: Option<String>,
    pub name: Option<String>,
    pub raw_text: Option<String>,
}

impl LicenseInfo {
    /// Whether the platform resolved a name or an SPDX identifier for the license.
    #[must_use]
    pub const fn has_metadata(&self) -> bool {
        self.spdx_id.is_some() || self.name.is_some()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LicenseNode {
    license_info: Option<LicenseInfoNode>,
    primary_license: Option<BlobNode>,
    fallback_license: Option<BlobNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LicenseInfoNode {
    name: Option<String>,
    spdx_id: Option<String>,
}

/// `text` is absent when the object is not a blob
#[derive(Debug, Deserialize)]
struct BlobNode {
    text: Option<String>,
}

/// Fetch license metadata plus the text of the first `LICENSE` file found at `paths`.
///
/// Only the first two paths are probed.
pub async fn fetch_license_info(transport: &impl QueryTransport, repo: &RepoSpec, paths: &[String]) -> Result<LicenseInfo, QueryError> {
    let primary = paths.first().map_or("HEAD:LICENSE", String::as_str);
    let fallback = paths.get(1).map_or(primary, String::as_str);

    log::info!(target: LOG_TARGET, "Querying license information for '{repo}'");

    let data = transport
        .execute(
            LICENSE_QUERY,
            json!({
                "owner": repo.owner(),
                "name": repo.name(),
                "primaryPath": primary,
                "fallbackPath": fallback,
            }),
        )
        .await?;

    let node: LicenseNode = decode_repository(data, repo)?;
    let (spdx_id, name) = node.license_info.map_or((None, None), |info| (info.spdx_id, info.name));

    let raw_text = [node.primary_license, node.fallback_license]
        .into_iter()
        .flatten()
        .find_map(|blob| blob.text.filter(|text| !text.trim().is_empty()));

    Ok(LicenseInfo { spdx_id, name, raw_text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    struct CannedTransport(Value);

    impl QueryTransport for CannedTransport {
        async fn execute(&self, _query: &str, _variables: Value) -> Result<Value, QueryError> {
            Ok(self.0.clone())
        }
    }

    fn paths() -> Vec<String> {
        vec!["master:LICENSE".to_string(), "main:LICENSE".to_string()]
    }

    #[tokio::test]
    async fn test_fetch_license_with_spdx() {
        let transport = CannedTransport(json!({
            "repository": {
                "licenseInfo": { "name": "MIT License", "spdxId": "MIT" },
                "primaryLicense": null,
                "fallbackLicense": null
            }
        }));
        let repo = RepoSpec::new("a", "b").unwrap();

        let info = fetch_license_info(&transport, &repo, &paths()).await.unwrap();
        assert_eq!(info.spdx_id.as_deref(), Some("MIT"));
        assert_eq!(info.name.as_deref(), Some("MIT License"));
        assert_eq!(info.raw_text, None);
    }

    #[tokio::test]
    async fn test_fetch_license_prefers_primary_text() {
        let transport = CannedTransport(json!({
            "repository": {
                "licenseInfo": null,
                "primaryLicense": { "text": "primary" },
                "fallbackLicense": { "text": "fallback" }
            }
        }));
        let repo = RepoSpec::new("a", "b").unwrap();

        let info = fetch_license_info(&transport, &repo, &paths()).await.unwrap();
        assert_eq!(info.raw_text.as_deref(), Some("primary"));
    }

    #[tokio::test]
    async fn test_fetch_license_falls_back_to_second_path() {
        let transport = CannedTransport(json!({
            "repository": {
                "licenseInfo": null,
                "primaryLicense": {},
                "fallbackLicense": { "text": "fallback" }
            }
        }));
        let repo = RepoSpec::new("a", "b").unwrap();

        let info = fetch_license_info(&transport, &repo, &paths()).await.unwrap();
        assert_eq!(info.raw_text.as_deref(), Some("fallback"));
    }

    #[tokio::test]
    async fn test_fetch_license_nothing_known() {
        let transport = CannedTransport(json!({
            "repository": { "licenseInfo": null, "primaryLicense": null, "fallbackLicense": null }
        }));
        let repo = RepoSpec::new("a", "b").unwrap();

        let info = fetch_license_info(&transport, &repo, &paths()).await.unwrap();
        assert!(!info.has_metadata());
        assert!(info.raw_text.is_none());
    }
}
