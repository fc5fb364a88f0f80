use std::path::PathBuf;

use common_utils::consts;
use domain_types::{
    connector_types::{GatewayCredentials, GatewayMode},
    types::ConnectorSettings,
};
use hyperswitch_masking::{PeekInterface, Secret};

use crate::logger::config::Log;

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Config {
    pub common: Common,
    pub log: Log,
    pub gestpay: Gestpay,
    #[serde(default)]
    pub connector: ConnectorSettings,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Common {
    pub environment: String,
}

impl Common {
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        match self.environment.as_str() {
            "development" | "production" => Ok(()),
            _ => Err(config::ConfigError::Message(format!(
                "Invalid environment '{}'. Must be 'development' or 'production'",
                self.environment
            ))),
        }
    }
}

/// Merchant account the CLI talks to the gateway as.
#[derive(Clone, serde::Deserialize, Debug)]
pub struct Gestpay {
    pub shop_login: String,
    /// Gestpay "uicCode", e.g. `242` for EUR.
    pub currency_code: String,
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
    #[serde(default = "default_test_mode")]
    pub test_mode: bool,
}

fn default_test_mode() -> bool {
    true
}

impl Gestpay {
    pub fn mode(&self) -> GatewayMode {
        GatewayMode::from_test_flag(self.test_mode)
    }

    pub fn credentials(&self) -> GatewayCredentials {
        let credentials =
            GatewayCredentials::new(self.shop_login.as_str(), self.currency_code.as_str());
        match &self.api_key {
            Some(api_key) => credentials.with_api_key(api_key.peek().as_str()),
            None => credentials,
        }
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.shop_login.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "gestpay.shop_login must not be empty".to_string(),
            ));
        }
        if self.currency_code.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "gestpay.currency_code must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Builds the configuration from `explicit_config_path` when given, else
    /// from the file matching the build environment, then applies
    /// `GESTPAY__*` environment overrides.
    pub fn new_with_config_path(
        explicit_config_path: Option<PathBuf>,
    ) -> Result<Self, config::ConfigError> {
        let env = consts::Env::current_env();
        let config_path = Self::config_path(&env, explicit_config_path);

        let config = Self::builder(&env)?
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(consts::NAME)
                    .try_parsing(true)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("connector.proxy.bypass_proxy_urls"),
            )
            .build()?;

        #[allow(clippy::print_stderr)]
        let config: Self = serde_path_to_error::deserialize(config).map_err(|error| {
            eprintln!("Unable to deserialize application configuration: {error}");
            error.into_inner()
        })?;

        config.common.validate()?;
        config.gestpay.validate()?;

        Ok(config)
    }

    pub fn builder(
        environment: &consts::Env,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            // "env" is an override, not a default: the build decides it.
            .set_override("env", environment.to_string())
    }

    /// Config path.
    pub fn config_path(
        environment: &consts::Env,
        explicit_config_path: Option<PathBuf>,
    ) -> PathBuf {
        let mut config_path = PathBuf::new();
        if let Some(explicit_config_path_val) = explicit_config_path {
            config_path.push(explicit_config_path_val);
        } else {
            let config_directory: String = "config".into();
            let config_file_name = environment.config_path();

            config_path.push(workspace_path());
            config_path.push(config_directory);
            config_path.push(config_file_name);
        }
        config_path
    }
}

pub fn workspace_path() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let mut path = PathBuf::from(manifest_dir);
        path.pop();
        path.pop();
        path
    } else {
        PathBuf::from(".")
    }
}
