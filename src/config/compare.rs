use dbcompare_core::MatchStrategy;
use serde::{Deserialize, Serialize};

/// Comparison behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    /// `name_and_type` (default) or `name_only`.
    /// TOML: `compare.match_strategy`.
    #[serde(default)]
    pub match_strategy: MatchStrategy,

    /// Emit the raw `Oracle Objects` / `PostgreSQL Objects` listing sheets.
    /// TOML: `compare.include_listings`. Default: `true`.
    #[serde(default = "default_include_listings")]
    pub include_listings: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            match_strategy: MatchStrategy::default(),
            include_listings: default_include_listings(),
        }
    }
}

fn default_include_listings() -> bool {
    true
}
