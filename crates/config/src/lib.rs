//! Configuration management for loupe
//!
//! This crate provides functionality for managing the loupe configuration,
//! including loading, saving, updating, and deleting configuration settings.

/// Error types for the configuration module
pub mod error;

use crate::error::Error;
use clap::Parser;
use loupe_common::utils::io::file::{delete_path, read_file, write_file};
use serde::{Deserialize, Serialize};
#[allow(deprecated)]
use std::env::home_dir;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Command line arguments for the configuration command
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "Display and edit the current configuration",
    override_usage = "loupe config [OPTIONS]"
)]
pub struct ConfigArgs {
    /// The target key to update.
    #[clap(required = false, default_value = "")]
    key: String,

    /// The value to set the key to.
    #[clap(required = false, default_value = "")]
    value: String,
}

/// The [`Configuration`] struct represents the configuration of the CLI. Every loupe tool
/// falls back to these values when the corresponding flag is not given.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// The URL for the Ethereum RPC endpoint
    pub rpc_url: String,

    /// The URL for a local Ethereum RPC endpoint, e.g. a forked devnet
    pub local_rpc_url: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            rpc_url: "".to_string(),
            local_rpc_url: "http://localhost:8545".to_string(),
        }
    }
}

/// Returns `$HOME/.loupe/config.toml`.
#[allow(deprecated)]
fn config_path() -> Result<String, Error> {
    let mut home: PathBuf = home_dir().ok_or_else(|| {
        Error::Generic(
            "failed to get home directory. does your os support `std::env::home_dir()`?"
                .to_string(),
        )
    })?;
    home.push(".loupe");
    home.push("config.toml");

    home.to_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Generic("failed to convert path to string".to_string()))
}

impl Configuration {
    /// Returns the current configuration, creating a default one on first use.
    pub fn load() -> Result<Self, Error> {
        let path = config_path()?;

        // if the config file doesn't exist, create it
        if !std::path::Path::new(&path).exists() {
            let config = Configuration::default();
            config.save()?;
        }

        let contents = read_file(&path)
            .map_err(|e| Error::Generic(format!("failed to read config file: {e}")))?;
        let mut config: Configuration = toml::from_str(&contents)
            .map_err(|e| Error::ParseError(format!("failed to parse config file: {e}")))?;

        // load mesc config if enabled
        if !mesc::is_mesc_enabled() {
            return Ok(config);
        }

        if let Some(endpoint) = mesc::get_default_endpoint(Some("loupe"))
            .map_err(|e| Error::Generic(format!("MESC error: {e}")))?
        {
            debug!("overriding rpc_url with mesc endpoint");
            config.rpc_url = endpoint.url;
        }

        Ok(config)
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> Result<(), Error> {
        write_file(
            &config_path()?,
            &toml::to_string(&self)
                .map_err(|e| Error::ParseError(format!("failed to serialize config: {e}")))?,
        )
        .map_err(|e| Error::Generic(format!("failed to write config file: {e}")))?;

        Ok(())
    }

    /// Deletes the configuration file at `$HOME/.loupe/config.toml`.
    pub fn delete() -> Result<(), Error> {
        if !delete_path(&config_path()?) {
            return Err(Error::Generic("failed to delete config file".to_string()));
        }

        Ok(())
    }

    /// Resolves the RPC URL a command should use. An empty `given` falls back to `rpc_url`,
    /// and the name `local` selects `local_rpc_url`.
    pub fn resolve_rpc_url(&self, given: &str) -> String {
        match given {
            "" => self.rpc_url.clone(),
            "local" => self.local_rpc_url.clone(),
            url => url.to_string(),
        }
    }

    /// Update a single key/value pair in the configuration.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), Error> {
        match key {
            "rpc_url" => {
                self.rpc_url = value.to_string();
            }
            "local_rpc_url" => {
                self.local_rpc_url = value.to_string();
            }
            _ => {
                return Err(Error::Generic(format!(
                    "invalid key: \'{key}\' is not a valid configuration key."
                )))
            }
        }

        // write the updated config to disk
        self.save()?;

        Ok(())
    }
}

/// The `config` command is used to display and edit the current configuration.
pub fn config(args: ConfigArgs) -> Result<(), Error> {
    if !args.key.is_empty() {
        if !args.value.is_empty() {
            let mut config = Configuration::load()?;
            config.update(&args.key, &args.value)?;
            info!("updated configuration! Set \'{}\' = \'{}\' .", &args.key, &args.value);
        } else {
            error!("found key but no value to set. Please specify a value to set, use `loupe config --help` for more information.");
        }
    } else {
        println!("{:#?}", Configuration::load()?);
        info!("use `loupe config <KEY> <VALUE>` to set a key/value pair.");
    }

    Ok(())
}

/// Parse user input --rpc-url into a full url. MESC endpoint names and aliases are
/// resolved when MESC is enabled; anything else passes through untouched.
pub fn parse_url_arg(url: &str) -> Result<String, String> {
    if mesc::is_mesc_enabled() {
        if let Ok(Some(endpoint)) = mesc::get_endpoint_by_query(url, Some("loupe")) {
            return Ok(endpoint.url);
        }
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.rpc_url, "");
        assert_eq!(config.local_rpc_url, "http://localhost:8545");
    }

    #[test]
    #[serial]
    fn test_load_configuration() {
        Configuration::delete().expect("failed to delete config file");
        let config = Configuration::load().expect("failed to load config file");

        assert_eq!(config.rpc_url, "");
        assert_eq!(config.local_rpc_url, "http://localhost:8545");
    }

    #[test]
    #[serial]
    fn test_save_configuration() {
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::default();

        config.update("rpc_url", "http://localhost:8545").expect("failed to update rpc_url");
        config.save().expect("failed to save config file");

        let loaded_config = Configuration::load().expect("failed to load config file");
        assert_eq!(loaded_config.rpc_url, "http://localhost:8545");
        assert_eq!(loaded_config.local_rpc_url, "http://localhost:8545");

        Configuration::delete().expect("failed to delete config file");
    }

    #[test]
    #[serial]
    fn test_update_rejects_unknown_key() {
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::load().expect("failed to load config file");

        let result = config.update("etherscan_api_key", "1234567890");
        assert!(matches!(result, Err(Error::Generic(_))));

        Configuration::delete().expect("failed to delete config file");
    }

    #[test]
    #[serial]
    fn test_delete_configuration() {
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::load().expect("failed to load config file");
        config.update("rpc_url", "http://localhost:8545").expect("failed to update rpc_url");

        Configuration::delete().expect("failed to delete config file");
        let config = Configuration::load().expect("failed to load config file");

        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_resolve_rpc_url() {
        let config = Configuration {
            rpc_url: "https://eth.llamarpc.com".to_string(),
            ..Default::default()
        };

        assert_eq!(config.resolve_rpc_url(""), "https://eth.llamarpc.com");
        assert_eq!(config.resolve_rpc_url("local"), "http://localhost:8545");
        assert_eq!(config.resolve_rpc_url("ws://node:8546"), "ws://node:8546");
    }

    #[test]
    fn test_parse_url_arg_passes_through_plain_urls() {
        if mesc::is_mesc_enabled() {
            return;
        }
        assert_eq!(
            parse_url_arg("https://eth.llamarpc.com").expect("failed to parse url"),
            "https://eth.llamarpc.com"
        );
    }
}
