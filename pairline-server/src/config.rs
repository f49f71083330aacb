use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Process-wide settings. Every field has a default so an empty environment
/// yields a runnable server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Single origin allowed by CORS. Any origin when unset.
    #[serde(default)]
    pub allowed_origin: Option<String>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Label used when the identity provider supplied no name.
    #[serde(default = "default_fallback_display_name")]
    pub fallback_display_name: String,
    #[serde(default = "default_max_room_key_len")]
    pub max_room_key_len: usize,
    #[serde(default = "default_max_display_name_len")]
    pub max_display_name_len: usize,
    #[serde(default = "default_max_pending_candidates")]
    pub max_pending_candidates: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            allowed_origin: None,
            log_filter: default_log_filter(),
            fallback_display_name: default_fallback_display_name(),
            max_room_key_len: default_max_room_key_len(),
            max_display_name_len: default_max_display_name_len(),
            max_pending_candidates: default_max_pending_candidates(),
        }
    }
}

impl ServerConfig {
    /// Optional TOML file first, then `PAIRLINE_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder
            .add_source(Environment::with_prefix("PAIRLINE").try_parsing(true))
            .build()?
            .try_deserialize()
            .map(Self::normalize)
    }

    /// Trims and sanitizes values, whichever source they came from.
    pub fn normalize(mut self) -> Self {
        self.allowed_origin = self
            .allowed_origin
            .take()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty() && o != "*");
        if self.fallback_display_name.trim().is_empty() {
            self.fallback_display_name = default_fallback_display_name();
        }
        self.max_room_key_len = self.max_room_key_len.max(1);
        self.max_display_name_len = self.max_display_name_len.max(1);
        self
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_fallback_display_name() -> String {
    "Anonymous".to_string()
}

fn default_max_room_key_len() -> usize {
    64
}

fn default_max_display_name_len() -> usize {
    64
}

fn default_max_pending_candidates() -> usize {
    256
}
