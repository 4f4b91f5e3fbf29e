//! Run configuration.
//!
//! Defaults come from `config/default.toml`, embedded at compile time. A user
//! file only needs the keys it wants to change.

use crate::data_structs::DepartmentSelection;
use crate::error::*;
use crate::recorder::HeaderPolicy;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use toml::{Table, Value};

const DEFAULT_CONFIG_STR: &'static str = include_str!("../config/default.toml");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// The departmental results page.
    pub url: String,
    /// The department selected on the page before extracting.
    pub department: DepartmentSelection,
    /// CSV file the record is appended to.
    pub output: PathBuf,
    pub user_agent: String,
    pub navigation_timeout_secs: u64,
    pub container_timeout_secs: u64,
    /// How long to let the page redraw after selecting the department.
    pub settle_millis: u64,
    pub header_policy: HeaderPolicy
}

impl Default for Config {
    fn default() -> Self {
        // The embedded defaults are covered by tests.
        Config::from_toml_str("").expect("embedded default config is invalid")
    }
}

impl Config {
    /// Builds a config from `overrides` layered on top of the defaults.
    pub fn from_toml_str(overrides: &str) -> Result<Config> {
        let mut table: Table = toml::from_str(DEFAULT_CONFIG_STR)?;
        merge(&mut table, toml::from_str(overrides)?);

        let config: Config = Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML override file from `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .chain_err(|| ErrorKind::InvalidConfig(format!("cannot read {}", path.display())))?;

        Config::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            bail!(ErrorKind::InvalidConfig("`url` is empty".into()));
        }
        if self.department.code.trim().is_empty() {
            bail!(ErrorKind::InvalidConfig("`department.code` is empty".into()));
        }
        if self.output.as_os_str().is_empty() {
            bail!(ErrorKind::InvalidConfig("`output` is empty".into()));
        }

        Ok(())
    }

    #[inline]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    #[inline]
    pub fn container_timeout(&self) -> Duration {
        Duration::from_secs(self.container_timeout_secs)
    }

    #[inline]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }
}

/// Recursively overlays `over` onto `base`; nested tables merge key by key.
fn merge(base: &mut Table, over: Table) {
    for (key, value) in over {
        if let (Some(Value::Table(base_table)), Value::Table(over_table)) = (base.get_mut(&key), &value) {
            merge(base_table, over_table.clone());
            continue;
        }

        base.insert(key, value);
    }
}
