use serde::Deserialize;

/// The root configuration structure for the application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
}

/// Where the HTTP server binds.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// The interface to listen on (e.g., "0.0.0.0").
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}
