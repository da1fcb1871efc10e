use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::{IntoAppError, bail};
use std::sync::Arc;
use url::Url;

/// Host whose repositories can be scored.
pub const GITHUB_HOST: &str = "github.com";

const GITHUB_HOST_ALIASES: &[&str] = &[GITHUB_HOST, "www.github.com"];

/// Identity of the repository being scored.
///
/// Created once per invocation and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    url: Arc<Url>,
    owner: Arc<str>,
    name: Arc<str>,
}

impl RepoSpec {
    /// Extract the owner/name pair from a GitHub repository URL.
    ///
    /// Anything after `/<owner>/<name>` is ignored and a trailing `.git` is dropped, so
    /// links to issues, trees, or clone URLs all identify the same repository.
    pub fn parse(url: &Url) -> Result<Self> {
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        if !GITHUB_HOST_ALIASES.contains(&host.as_str()) {
            bail!("unsupported repository host '{host}' in {url}, only GitHub repositories can be scored");
        }

        let mut segments = url.path_segments().into_iter().flatten();
        match (segments.next(), segments.next().map(|s| s.trim_end_matches(".git"))) {
            (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => Self::new(owner, name),
            _ => bail!("expected a URL of the form https://{GITHUB_HOST}/<owner>/<name>, got {url}"),
        }
    }

    /// Build an identity directly from an owner and repository name.
    pub fn new(owner: &str, name: &str) -> Result<Self> {
        let url = Url::parse(&format!("https://{GITHUB_HOST}/{owner}/{name}"))
            .into_app_err_with(|| format!("'{owner}/{name}' does not form a valid repository URL"))?;

        Ok(Self {
            url: Arc::new(url),
            owner: Arc::from(owner),
            name: Arc::from(name),
        })
    }

    /// Canonical `https://github.com/<owner>/<name>` URL
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
