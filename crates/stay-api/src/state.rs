//! # Application State
//!
//! Shared state for the Axum application: the document store handle, the
//! payment client, and configuration. Constructed once at startup and
//! dependency-injected into handlers; nothing here is ambient or global.

use stay_store::DocumentStore;
use stay_stripe::StripePaymentClient;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Path to the SQLite database file
    pub database_path: String,
    /// HS256 secret for bearer tokens
    pub jwt_secret: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables.
    ///
    /// Required env vars:
    /// - `ACCESS_TOKEN_SECRET`
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = std::env::var("ACCESS_TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("ACCESS_TOKEN_SECRET not set"))?;

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "stay.db".to_string()),
            jwt_secret,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Document store handle, one per process
    pub store: Arc<DocumentStore>,
    /// Payment gateway client
    pub payments: Arc<StripePaymentClient>,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let store = DocumentStore::open(&config.database_path)
            .map_err(|e| anyhow::anyhow!("Failed to open document store: {e}"))?;

        let payments = StripePaymentClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {e}"))?;

        Ok(Self::with_parts(store, payments, config))
    }

    /// Assemble state from explicit parts (used by tests)
    pub fn with_parts(
        store: DocumentStore,
        payments: StripePaymentClient,
        config: AppConfig,
    ) -> Self {
        Self {
            store: Arc::new(store),
            payments: Arc::new(payments),
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_path: "stay.db".to_string(),
            jwt_secret: "secret".to_string(),
            environment: "test".to_string(),
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
        assert!(!config.is_production());
    }
}
