use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{ServerSettings, Settings};

/// Loads the application settings.
///
/// Defaults are applied first, then an optional `config.toml` in the working
/// directory, then `RASOI_*` environment variables (e.g., `RASOI_SERVER__PORT`),
/// so a container deployment can override everything without a file.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("RASOI").separator("__"))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;

    if settings.server.host.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "server.host must not be empty".to_string(),
        ));
    }

    Ok(settings)
}
