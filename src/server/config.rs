use super::RequestsLoggingLevel;
use crate::config::DEFAULT_CLIENT_ORIGIN;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub frontend_dir_path: Option<String>,
    /// The only origin allowed to make cross-origin calls.
    pub client_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            frontend_dir_path: None,
            client_origin: DEFAULT_CLIENT_ORIGIN.to_string(),
        }
    }
}
