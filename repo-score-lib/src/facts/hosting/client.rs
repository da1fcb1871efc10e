//! GitHub GraphQL client
//!
//! Minimal transport that posts a query with its variables and hands back the `data`
//! member of the response.

use super::QueryError;
use crate::Result;
use crate::facts::RepoSpec;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

pub(super) const LOG_TARGET: &str = "   graphql";

/// Executes parameterized metadata queries against the hosting platform.
pub trait QueryTransport: Send + Sync {
    /// Run `query` with `variables` and return the response's `data` value.
    fn execute(&self, query: &str, variables: Value) -> impl Future<Output = Result<Value, QueryError>> + Send;
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: String,
}

/// Authenticated GitHub GraphQL client
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    endpoint: String,
    authenticated: bool,
}

impl Client {
    /// Create a new client with an optional token and the API base URL
    pub fn new(token: Option<&str>, base_url: &str) -> Result<Self> {
        let mut client_builder = reqwest::Client::builder().user_agent("repo-score");

        let token = token.map(str::trim).filter(|t| !t.is_empty());
        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("bearer {t}"))?;
            auth_val.set_sensitive(true);

            let mut headers = HeaderMap::new();
            let _ = headers.insert(AUTHORIZATION, auth_val);

            client_builder = client_builder.default_headers(headers);
        }

        Ok(Self {
            client: client_builder.build()?,
            endpoint: format!("{}/graphql", base_url.trim_end_matches('/')),
            authenticated: token.is_some(),
        })
    }

    /// Get the GraphQL endpoint for this client
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl QueryTransport for Client {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, QueryError> {
        // GitHub's GraphQL API refuses anonymous queries
        if !self.authenticated {
            return Err(QueryError::MissingToken);
        }

        let body = json!({ "query": query, "variables": variables });

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.into()))?;

        let status = resp.status();
        if !status.is_success() {
            log::debug!(target: LOG_TARGET, "GraphQL request to '{}' failed with HTTP {status}", self.endpoint);
            return Err(QueryError::Transport(ohno::app_err!("GitHub GraphQL API returned HTTP {status}")));
        }

        let envelope: Envelope = resp.json().await.map_err(|e| QueryError::Malformed(e.into()))?;
        into_data(envelope)
    }
}

fn into_data(envelope: Envelope) -> Result<Value, QueryError> {
    if !envelope.errors.is_empty() {
        return Err(QueryError::Rejected(envelope.errors.into_iter().map(|e| e.message).collect()));
    }

    envelope
        .data
        .ok_or_else(|| QueryError::Rejected(vec!["response contained no data".to_string()]))
}

/// Every query in this crate selects a single top-level `repository` field
#[derive(Debug, Deserialize)]
struct RepositoryData<T> {
    repository: Option<T>,
}

/// Decode the `repository` member of a response, treating `null` as a missing repository.
pub(super) fn decode_repository<T: DeserializeOwned>(data: Value, repo: &RepoSpec) -> Result<T, QueryError> {
    let wrapper: RepositoryData<T> = serde_json::from_value(data).map_err(|e| QueryError::Malformed(e.into()))?;
    wrapper.repository.ok_or_else(|| QueryError::NotFound(repo.to_string()))
}
