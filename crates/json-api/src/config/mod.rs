//! Server configuration module

use clap::Parser;
use larder_app::{
    auth::AuthConfig as AuthClientConfig, context::ExternalServices,
    domain::recommendations::ModelConfig, geocoding::GeocoderConfig,
};

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
    services::ServicesConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;
pub(crate) mod services;

/// Larder JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "larder-json", about = "Larder JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Tracing export settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Hosted auth provider settings.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// Geocoder and language model settings.
    #[command(flatten)]
    pub services: ServicesConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings for the hosted services the app talks to.
    #[must_use]
    pub fn external_services(&self) -> ExternalServices {
        ExternalServices {
            auth: AuthClientConfig {
                url: self.auth.auth_url.clone(),
                anon_key: self.auth.auth_anon_key.clone(),
            },
            geocoder: GeocoderConfig {
                base_url: self.services.geocoder_url.clone(),
                user_agent: self.services.geocoder_user_agent.clone(),
            },
            model: ModelConfig {
                api_url: self.services.llm_api_url.clone(),
                api_key: self.services.llm_api_key.clone(),
                model: self.services.llm_model.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const REQUIRED: [&str; 11] = [
        "larder-json",
        "--database-url",
        "postgres://localhost/larder",
        "--auth-url",
        "https://auth.example.com",
        "--auth-anon-key",
        "anon",
        "--llm-api-url",
        "https://llm.example.com/v1",
        "--llm-api-key",
        "secret",
    ];

    #[test]
    fn defaults_fill_optional_settings() -> TestResult {
        let config = ServerConfig::try_parse_from(REQUIRED)?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert!(!config.observability.otel_enabled);
        assert_eq!(config.observability.slow_request_threshold_ms, 1_000);

        Ok(())
    }

    #[test]
    fn external_services_carry_their_settings() -> TestResult {
        let config = ServerConfig::try_parse_from(REQUIRED)?;
        let external = config.external_services();

        assert_eq!(external.auth.url, "https://auth.example.com");
        assert_eq!(external.model.api_key, "secret");
        assert_eq!(external.geocoder.base_url, "https://nominatim.openstreetmap.org");

        Ok(())
    }

    #[test]
    fn missing_auth_settings_are_rejected() {
        let result = ServerConfig::try_parse_from(["larder-json", "--database-url", "postgres://x"]);

        assert!(result.is_err(), "auth settings are required");
    }
}
