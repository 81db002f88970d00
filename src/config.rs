use serde::{Deserialize, Serialize};

use crate::services::fallback::FallbackPolicy;
use crate::utils::constants::{
    DEFAULT_API_PREFIX, DEFAULT_BACKEND_URL, DEFAULT_STORAGE_PREFIX, DEFAULT_TIMEOUT_SECONDS,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url_development: String,
    pub backend_url_production: String,
    pub environment: String,
    pub enable_logging: bool,
    pub network_timeout_seconds: u32,
    pub api_prefix: String,
    pub storage_prefix: String,
    pub fallback: FallbackPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url_development: DEFAULT_BACKEND_URL.to_string(),
            backend_url_production: DEFAULT_BACKEND_URL.to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            network_timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            fallback: FallbackPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let mut fallback = FallbackPolicy::default();
        if let Some(types) = option_env!("STRUCTURED_CONTENT_TYPES") {
            fallback.structured_content_types = parse_list(types);
        }
        fallback.fallback_on_error_status = option_env!("FALLBACK_ON_ERROR_STATUS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(fallback.fallback_on_error_status);

        Self {
            backend_url_development: option_env!("BACKEND_URL_DEVELOPMENT")
                .unwrap_or(DEFAULT_BACKEND_URL).to_string(),
            backend_url_production: option_env!("BACKEND_URL_PRODUCTION")
                .or(option_env!("BACKEND_URL"))
                .unwrap_or(DEFAULT_BACKEND_URL).to_string(),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            network_timeout_seconds: option_env!("NETWORK_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            api_prefix: option_env!("API_PREFIX")
                .unwrap_or(DEFAULT_API_PREFIX).to_string(),
            storage_prefix: option_env!("STORAGE_PREFIX")
                .unwrap_or(DEFAULT_STORAGE_PREFIX).to_string(),
            fallback,
        }
    }

    /// Obtiene la URL del backend según el entorno actual
    pub fn backend_url(&self) -> &str {
        match self.environment.as_str() {
            "production" => &self.backend_url_production,
            _ => &self.backend_url_development,
        }
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
