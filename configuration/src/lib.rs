use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "./dns_client.toml";

/// Environment overrides look like `DNS_CLIENT_RESOLVER__TIMEOUT_SECONDS=2`.
const ENV_PREFIX: &str = "DNS_CLIENT";

pub fn get_config<T: DeserializeOwned>(config_path: Option<&Path>) -> Result<T, config::ConfigError> {
    get_config_with_prefix(config_path, ENV_PREFIX)
}

fn get_config_with_prefix<T: DeserializeOwned>(
    config_path: Option<&Path>,
    env_prefix: &str,
) -> Result<T, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = config_path {
        builder = builder.add_source(config::File::from(path));
    }

    let config = builder
        .add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    config.try_deserialize::<T>()
}

/// Loads the client configuration.
///
/// An explicit path has to exist. Without one, `./dns_client.toml` is read
/// when present and built-in defaults are used otherwise.
pub fn load(config_path: Option<PathBuf>) -> Result<ClientConfiguration, config::ConfigError> {
    let path = match config_path {
        Some(path) => Some(path),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.is_file() {
                Some(default_path)
            } else {
                None
            }
        }
    };

    let configuration: ClientConfiguration = get_config(path.as_deref())?;
    configuration.validate()?;

    Ok(configuration)
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct ClientConfiguration {
    #[serde(default)]
    pub resolver: ResolverDefaults,
}

impl ClientConfiguration {
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.resolver.timeout_seconds == 0 {
            return Err(config::ConfigError::Message(
                "resolver.timeout_seconds must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolverDefaults {
    /// Seconds to wait for a reply before retransmitting.
    pub timeout_seconds: u64,
    /// Retransmissions of an unanswered query before giving up.
    pub max_retries: u32,
    pub port: u16,
}

impl Default for ResolverDefaults {
    fn default() -> Self {
        Self {
            timeout_seconds: 5,
            max_retries: 3,
            port: 53,
        }
    }
}
