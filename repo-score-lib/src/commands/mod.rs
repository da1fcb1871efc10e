//! Command-line interface and orchestration for repo-score
//!
//! This module ties the other modules together: it parses arguments, loads the
//! configuration, resolves the URL to a repository, runs the metric pipeline, and
//! writes the resulting record.
//!
//! # Execution Flow
//!
//! 1. Parse arguments with clap and initialize logging
//! 2. Load `repo-score.toml` (or the file given with `--config`) and validate it
//! 3. Resolve the URL, following npm packages to their GitHub repository
//! 4. Run the calculators concurrently through [`crate::metrics::Pipeline`]
//! 5. Emit one NDJSON line through the [`Host`]
//!
//! Output goes through the [`Host`] trait rather than straight to stdout so that the
//! whole command can be exercised in-process by tests.

mod config;
mod host;
mod run;

pub use config::{CONFIG_FILE_NAME, Config, DEFAULT_CONFIG_TOML, HostingConfig};
pub use host::Host;
pub use run::{LogLevel, run};
