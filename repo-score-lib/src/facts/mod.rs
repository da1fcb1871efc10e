//! Everything the metric calculators learn about a repository.
//!
//! - [`RepoSpec`]: the identity of the repository being scored
//! - [`Resolver`]: turns GitHub and npm URLs into a [`RepoSpec`]
//! - [`hosting`]: the GraphQL transport and the typed queries built on it
//! - [`checkout`]: shallow scratch clones

pub mod checkout;
pub mod hosting;
mod repo_spec;
mod resolver;

pub use repo_spec::{GITHUB_HOST, RepoSpec};
pub use resolver::Resolver;
