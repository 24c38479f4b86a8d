use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use snafu::ResultExt as _;
use url::Url;

use crate::error::{ApplicationError, ConfigLoadSnafu};

pub fn load() -> Result<Config, ApplicationError> {
    envy::from_env::<Config>().context(ConfigLoadSnafu)
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "host_address")]
    pub host: SocketAddr,

    #[serde(rename = "log_dir", default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// The endpoint that increments the counter. When unset, page loads are
    /// not reported anywhere.
    #[serde(rename = "hit_endpoint")]
    pub hit_endpoint: Option<Url>,

    #[serde(flatten)]
    pub surreal: SurrealConfig,

    #[serde(flatten)]
    pub counter: CounterConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SurrealConfig {
    #[serde(rename = "surreal_endpoint")]
    pub endpoint: Url,
    #[serde(rename = "surreal_namespace")]
    pub namespace: String,
    #[serde(rename = "surreal_database")]
    pub database: String,

    // embedded engines such as `mem://` take no credentials
    #[serde(rename = "surreal_username", default)]
    pub username: Option<String>,
    #[serde(rename = "surreal_password", default)]
    pub password: Option<String>,
}

/// Where the view count lives. The table, record key, and attribute name have
/// all been renamed between deployments, so none of them are constants.
#[derive(Debug, Deserialize, Clone)]
pub struct CounterConfig {
    #[serde(rename = "counter_table", default = "default_table")]
    pub table: String,
    #[serde(rename = "counter_record", default = "default_record")]
    pub record: String,
    #[serde(rename = "counter_field", default = "default_field")]
    pub field: String,
    #[serde(rename = "counter_lookup", default)]
    pub lookup: LookupMode,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// Read the record directly by its key.
    #[default]
    Key,
    /// Scan the whole table and take the first record. Older tables were not
    /// keyed by a fixed identifier, so the key cannot be trusted there.
    Scan,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_table() -> String {
    "view_count".to_string()
}

fn default_record() -> String {
    "viewcount".to_string()
}

fn default_field() -> String {
    "count".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(vars: &[(&str, &str)]) -> Vec<(String, String)> {
        vars.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn minimal_environment_applies_defaults() {
        let config = envy::from_iter::<_, Config>(environment(&[
            ("HOST_ADDRESS", "127.0.0.1:3000"),
            ("SURREAL_ENDPOINT", "mem://"),
            ("SURREAL_NAMESPACE", "test"),
            ("SURREAL_DATABASE", "test"),
        ]))
        .unwrap();

        assert_eq!(config.counter.table, "view_count");
        assert_eq!(config.counter.record, "viewcount");
        assert_eq!(config.counter.field, "count");
        assert_eq!(config.counter.lookup, LookupMode::Key);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert!(config.hit_endpoint.is_none());
        assert!(config.surreal.username.is_none());
    }

    #[test]
    fn full_environment_overrides_defaults() {
        let config = envy::from_iter::<_, Config>(environment(&[
            ("HOST_ADDRESS", "0.0.0.0:8080"),
            ("LOG_DIR", "/var/log/soroban"),
            ("HIT_ENDPOINT", "https://counter.example.com/hit"),
            ("SURREAL_ENDPOINT", "http://localhost:8000"),
            ("SURREAL_NAMESPACE", "site"),
            ("SURREAL_DATABASE", "resume"),
            ("SURREAL_USERNAME", "root"),
            ("SURREAL_PASSWORD", "root"),
            ("COUNTER_TABLE", "CVViewCount"),
            ("COUNTER_RECORD", "viewcount"),
            ("COUNTER_FIELD", "views"),
            ("COUNTER_LOOKUP", "scan"),
        ]))
        .unwrap();

        assert_eq!(config.counter.table, "CVViewCount");
        assert_eq!(config.counter.field, "views");
        assert_eq!(config.counter.lookup, LookupMode::Scan);
        assert_eq!(config.surreal.username.as_deref(), Some("root"));
        assert_eq!(
            config.hit_endpoint.unwrap().as_str(),
            "https://counter.example.com/hit"
        );
    }

    #[test]
    fn missing_host_address_is_rejected() {
        let result = envy::from_iter::<_, Config>(environment(&[
            ("SURREAL_ENDPOINT", "mem://"),
            ("SURREAL_NAMESPACE", "test"),
            ("SURREAL_DATABASE", "test"),
        ]));

        assert!(result.is_err(), "host_address has no default");
    }
}
