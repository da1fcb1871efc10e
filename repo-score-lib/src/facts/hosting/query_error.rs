use core::fmt::{Display, Formatter};

/// Why a metadata query produced no usable data.
#[derive(Debug)]
pub enum QueryError {
    /// No authorization token was available, so the query was never sent.
    MissingToken,

    /// The platform answered but rejected the query.
    Rejected(Vec<String>),

    /// The repository does not exist or is not visible with the current token.
    NotFound(String),

    /// Network, HTTP, or authentication failure.
    Transport(ohno::AppError),

    /// The response did not have the expected shape.
    Malformed(ohno::AppError),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingToken => write!(f, "no GitHub token available, set GITHUB_TOKEN or pass --github-token"),
            Self::Rejected(messages) => write!(f, "query rejected: {}", messages.join("; ")),
            Self::NotFound(repo) => write!(f, "repository '{repo}' not found"),
            Self::Transport(e) => write!(f, "transport failure: {e:#}"),
            Self::Malformed(e) => write!(f, "unexpected response: {e:#}"),
        }
    }
}

impl core::error::Error for QueryError {}
