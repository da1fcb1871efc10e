use crate::Result;
use crate::metrics::{CorrectnessPolicy, LicensePolicy, RampUpPolicy, ResponsivenessPolicy, Weights};
use camino::Utf8Path;
use ohno::{EnrichableExt, IntoAppError, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File looked for in the working directory when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "repo-score.toml";

/// Everything that shapes a run. Sections left out of a configuration file keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_hosting")]
    pub hosting: HostingConfig,

    #[serde(default = "default_license")]
    pub license: LicensePolicy,

    #[serde(default = "default_correctness")]
    pub correctness: CorrectnessPolicy,

    #[serde(default = "default_responsiveness")]
    pub responsiveness: ResponsivenessPolicy,

    #[serde(default = "default_ramp_up")]
    pub ramp_up: RampUpPolicy,

    #[serde(default = "default_weights")]
    pub weights: Weights,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostingConfig {
    /// Base URL of the GitHub API; GraphQL requests go to `<api_base_url>/graphql`
    pub api_base_url: String,

    /// Base URL of the npm registry
    pub npm_registry_url: String,
}

fn default_hosting() -> HostingConfig {
    Config::default().hosting
}

fn default_license() -> LicensePolicy {
    Config::default().license
}

fn default_correctness() -> CorrectnessPolicy {
    Config::default().correctness
}

fn default_responsiveness() -> ResponsivenessPolicy {
    Config::default().responsiveness
}

fn default_ramp_up() -> RampUpPolicy {
    Config::default().ramp_up
}

fn default_weights() -> Weights {
    Config::default().weights
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// An explicit `config_path` must exist. Otherwise `repo-score.toml` is looked for in
    /// `base_dir`, and its absence means the defaults apply.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.to_owned(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config
            .validate()
            .map_err(|e| e.enrich_with(|| format!("validating configuration file '{final_path}'")))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("hosting.api_base_url", &self.hosting.api_base_url),
            ("hosting.npm_registry_url", &self.hosting.npm_registry_url),
        ] {
            let url = Url::parse(value).into_app_err_with(|| format!("{name} is not a valid URL: '{value}'"))?;
            if !matches!(url.scheme(), "http" | "https") {
                bail!("{name} must be an http or https URL, got '{value}'");
            }
        }

        self.license.validate()?;
        self.correctness.validate()?;
        self.responsiveness.validate()?;
        self.ramp_up.validate()?;
        self.weights.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
