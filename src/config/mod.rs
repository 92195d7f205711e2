mod basic;
mod compare;
mod databases;

pub use basic::BasicConfig;
pub use compare::CompareConfig;
pub use databases::{AuditConfig, AuditResolvedConfig, OracleConfig, PostgresConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Oracle side of the comparison (see `oracle` table).
    #[serde(default)]
    pub oracle: OracleConfig,

    /// PostgreSQL side of the comparison (see `postgres` table).
    #[serde(default)]
    pub postgres: PostgresConfig,

    /// Audit store for persisted differences (see `audit` table).
    #[serde(default)]
    pub audit: AuditConfig,

    /// Matching and report options (see `compare` table).
    #[serde(default)]
    pub compare: CompareConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "DBCOMPARE_";

impl Config {
    /// Builds a Figment that merges defaults, `config.toml` if present, and `DBCOMPARE_*`
    /// environment variables (`__` separates nested keys, e.g. `DBCOMPARE_ORACLE__PASSWORD`).
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads and validates configuration. Binaries should fail fast on a broken config.
    pub fn load() -> Self {
        let cfg: Self = Self::figment()
            .extract()
            .unwrap_or_else(|err| panic!("failed to extract configuration: {err}"));
        if let Err(reason) = cfg.validate() {
            panic!("invalid configuration: {reason}");
        }
        cfg
    }

    /// Checks the fields without which no comparison can run.
    pub fn validate(&self) -> Result<(), String> {
        if self.oracle.connect_string.trim().is_empty() {
            return Err("oracle.connect_string must be set and non-empty".to_string());
        }
        if self.postgres.url.trim().is_empty() {
            return Err("postgres.url must be set and non-empty".to_string());
        }
        if self.audit().database_url.trim().is_empty() {
            return Err("audit.database_url (or postgres.url) must be set".to_string());
        }
        Ok(())
    }

    pub fn audit(&self) -> AuditResolvedConfig {
        self.audit.resolve(&self.postgres)
    }
}

/// Global, lazily-initialized configuration instance.
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::load);
