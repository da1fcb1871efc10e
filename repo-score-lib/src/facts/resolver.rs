//! Repository identity resolution
//!
//! Turns the URL given on the command line into a [`RepoSpec`]. GitHub URLs are parsed
//! directly. npm package URLs are resolved by asking the npm registry for the package's
//! source repository.

use super::RepoSpec;
use crate::Result;
use ohno::{IntoAppError, bail};
use serde::Deserialize;
use url::Url;

const LOG_TARGET: &str = "  resolver";

const NPM_HOSTS: &[&str] = &["www.npmjs.com", "npmjs.com"];

#[derive(Debug, Deserialize)]
struct NpmPackage {
    repository: Option<NpmRepository>,
}

/// The registry reports `repository` either as a bare string or as `{ type, url }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmRepository {
    Url(String),
    Object { url: String },
}

impl NpmRepository {
    fn url(&self) -> &str {
        match self {
            Self::Url(url) | Self::Object { url } => url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resolver {
    client: reqwest::Client,
    npm_registry_url: String,
}

impl Resolver {
    pub fn new(npm_registry_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().user_agent("repo-score").build()?,
            npm_registry_url: npm_registry_url.into(),
        })
    }

    /// Resolve a GitHub or npm URL to the identity of a GitHub repository.
    pub async fn resolve(&self, input: &str) -> Result<RepoSpec> {
        let url = Url::parse(input.trim()).into_app_err_with(|| format!("parsing repository URL '{input}'"))?;
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

        if !NPM_HOSTS.contains(&host.as_str()) {
            return RepoSpec::parse(&url);
        }

        let package = npm_package_name(&url)?;
        let raw_repo_url = self.fetch_npm_repository(&package).await?;
        let repo_url = normalize_git_url(&raw_repo_url);
        log::debug!(target: LOG_TARGET, "npm package '{package}' is hosted at '{repo_url}'");

        let url = Url::parse(&repo_url).into_app_err_with(|| format!("parsing repository URL '{raw_repo_url}' of npm package '{package}'"))?;
        RepoSpec::parse(&url)
    }

    async fn fetch_npm_repository(&self, package: &str) -> Result<String> {
        let url = format!("{}/{}", self.npm_registry_url.trim_end_matches('/'), package.replace('/', "%2F"));
        log::info!(target: LOG_TARGET, "Querying the npm registry for package '{package}'");

        let resp = self.client.get(&url).send().await.into_app_err_with(|| format!("querying the npm registry for '{package}'"))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            bail!("package '{package}' not found in the npm registry");
        }

        let resp = resp.error_for_status().into_app_err_with(|| format!("querying the npm registry for '{package}'"))?;
        let info: NpmPackage = resp.json().await.into_app_err_with(|| format!("decoding npm registry data for '{package}'"))?;

        match info.repository {
            Some(repository) => Ok(repository.url().to_string()),
            None => bail!("npm package '{package}' does not declare a source repository"),
        }
    }
}

/// Extract the package name from `https://www.npmjs.com/package/<name>` or `.../package/@scope/<name>`.
fn npm_package_name(url: &Url) -> Result<String> {
    let segments: Vec<_> = url.path_segments().map(|s| s.filter(|s| !s.is_empty()).collect()).unwrap_or_default();

    match segments.as_slice() {
        ["package", scope, name, ..] if scope.starts_with('@') => Ok(format!("{scope}/{name}")),
        ["package", name, ..] => Ok((*name).to_string()),
        _ => bail!("invalid npm package URL: {url}"),
    }
}

/// Rewrite the git URL flavors found in package metadata into a plain `https://` URL.
fn normalize_git_url(raw: &str) -> String {
    let raw = raw.trim();

    if let Some(shorthand) = raw.strip_prefix("github:") {
        return format!("https://github.com/{shorthand}");
    }

    // `owner/name` shorthand
    if !raw.contains(':') && raw.split('/').count() == 2 {
        return format!("https://github.com/{raw}");
    }

    let raw = raw.strip_prefix("git+").unwrap_or(raw);

    if let Some(rest) = raw.strip_prefix("git@") {
        return format!("https://{}", rest.replacen(':', "/", 1));
    }

    for prefix in ["ssh://git@", "git://", "ssh://", "http://"] {
        if let Some(rest) = raw.strip_prefix(prefix) {
            return format!("https://{rest}");
        }
    }

    raw.to_string()
}
