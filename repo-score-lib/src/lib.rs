#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for repo-score
//!
//! This library contains all functionality for the repo-score tool, which computes a
//! composite quality score for an open-source repository hosted on GitHub.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface, configuration and orchestration
//! - [`facts`]: Repository identity resolution, the GraphQL transport, and checkouts
//! - [`metrics`]: The metric calculators, the license classifier, and the aggregator
//! - [`reports`]: NDJSON output of the final record

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod commands;
pub mod facts;
pub mod metrics;
pub mod reports;

pub use crate::commands::{Host, run};
