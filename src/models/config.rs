//! Configuration model loaded from external sources.

use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::api::query::DEFAULT_PAGE_SIZE;
use crate::forms::validation::{PhonePolicy, PhonePolicyKind};

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_export_dir() -> String {
    ".".to_string()
}

#[derive(Clone, Debug, Deserialize)]
/// Settings for talking to the client service.
pub struct ClientConfig {
    /// Base url of the remote record service, e.g. `http://localhost:8080`.
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub phone_policy: PhonePolicyKind,
    /// Directory CSV exports are written to.
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
}

impl ClientConfig {
    /// Loads `config/default`, the optional `config/{APP_ENV}` profile and
    /// `APP_*` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }

    pub fn phone_policy(&self) -> PhonePolicy {
        self.phone_policy.into()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    #[test]
    fn applies_defaults_for_optional_keys() {
        let config: ClientConfig = Config::builder()
            .add_source(File::from_str(
                "api_base_url: http://localhost:8080\nphone_policy: lenient\n",
                FileFormat::Yaml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.phone_policy(), PhonePolicy::lenient());
        assert_eq!(config.export_dir, ".");
    }
}
