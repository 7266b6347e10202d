//! Layered loading of the client configuration

use std::path::Path;

use integration_ojp::OjpConfig;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "ojp";

/// Environment variable prefix, e.g. `OJP_ENDPOINT_URL`
pub const ENV_PREFIX: &str = "OJP";

/// Load the configuration
///
/// Sources, later ones winning: built-in defaults, the configuration file
/// (`ojp.toml` unless `path` is given), then `OJP_*` environment variables.
/// Nested keys use `__`, so `OJP_HEADERS__AUTHORIZATION` sets a header.
///
/// # Errors
///
/// Returns an error if an explicitly named file is missing, a source cannot
/// be parsed or the result does not describe a valid configuration.
pub fn load(path: Option<&Path>) -> Result<OjpConfig, config::ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let config: OjpConfig = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    config.validate().map_err(config::ConfigError::Message)?;
    Ok(config)
}
