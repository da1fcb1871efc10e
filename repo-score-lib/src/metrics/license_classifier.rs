//! Heuristic license text classification
//!
//! Used when the platform cannot name a repository's license. This is a best-effort
//! phrase match, not a legal determination.

use crate::Result;
use ohno::bail;
use serde::{Deserialize, Serialize};

/// Phrase tables driving [`ClassifierPolicy::is_compatible`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierPolicy {
    /// Names of compatible licenses
    pub license_names: Vec<String>,

    /// Grant language typical of permissive licenses
    pub permissive_grants: Vec<String>,

    /// Any of these disqualifies the text
    pub restrictive: Vec<String>,
}

impl ClassifierPolicy {
    /// Decide whether raw license text describes a compatible license.
    ///
    /// The text must mention a compatible license name or a permissive grant, and must not
    /// contain any restrictive phrase. Matching is case-insensitive.
    #[must_use]
    pub fn is_compatible(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        let mentions_any = |phrases: &[String]| phrases.iter().any(|phrase| text.contains(&phrase.to_lowercase()));

        (mentions_any(&self.license_names) || mentions_any(&self.permissive_grants)) && !mentions_any(&self.restrictive)
    }

    /// An empty phrase would match every text.
    pub fn validate(&self) -> Result<()> {
        for (table, phrases) in [
            ("license_names", &self.license_names),
            ("permissive_grants", &self.permissive_grants),
            ("restrictive", &self.restrictive),
        ] {
            if phrases.iter().any(|p| p.trim().is_empty()) {
                bail!("license classifier table '{table}' contains an empty phrase");
            }
        }

        Ok(())
    }
}
