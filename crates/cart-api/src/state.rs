//! # Application State
//!
//! Shared state for the Axum application.
//! Owns the one cart instance and hands it to every handler.

use cart_core::{
    BoxedOrderRepository, BoxedProductCatalog, CartError, CartStore, CheckoutCoordinator,
    Currency, InMemoryCatalog, InMemoryOrders,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_CATALOG_PATH: &str = "config/products.toml";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Seed catalog location
    pub catalog_path: String,
    /// Currency every cart price must be in
    pub currency: Currency,
    /// Artificial delay on the storefront item listing; zero disables it
    pub simulated_latency: Duration,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, CartError> {
        dotenvy::dotenv().ok();

        let currency = store_currency(std::env::var("STORE_CURRENCY").ok().as_deref())?;

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            catalog_path: std::env::var("CATALOG_PATH")
                .unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string()),
            currency,
            simulated_latency: Duration::from_millis(
                std::env::var("SIMULATED_LATENCY_MS")
                    .ok()
                    .and_then(|ms| ms.parse().ok())
                    .unwrap_or(0),
            ),
        })
    }

    /// Local defaults without reading the environment
    pub fn local() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
            currency: Currency::Usd,
            simulated_latency: Duration::ZERO,
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, CartError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                CartError::Configuration(format!(
                    "invalid bind address {}:{}: {}",
                    self.host, self.port, e
                ))
            })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Store currency from its configured code; unset means USD. Codes without a
/// two-decimal minor unit are rejected.
fn store_currency(code: Option<&str>) -> Result<Currency, CartError> {
    match code {
        Some(code) if !code.trim().is_empty() => code.parse(),
        _ => Ok(Currency::default()),
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: BoxedProductCatalog,
    pub orders: BoxedOrderRepository,
    pub cart: Arc<CartStore>,
    pub checkout: CheckoutCoordinator,
    pub config: AppConfig,
}

impl AppState {
    /// Build state from the environment with in-memory storage
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let catalog = load_product_catalog(&config.catalog_path)?;

        Ok(Self::with_collaborators(
            config,
            Arc::new(catalog),
            Arc::new(InMemoryOrders::new()),
        ))
    }

    /// Wire the cart and checkout around the given collaborators
    pub fn with_collaborators(
        config: AppConfig,
        catalog: BoxedProductCatalog,
        orders: BoxedOrderRepository,
    ) -> Self {
        let cart = Arc::new(CartStore::new(Arc::clone(&catalog), config.currency));
        let checkout = CheckoutCoordinator::new(Arc::clone(&cart), Arc::clone(&orders));

        Self {
            catalog,
            orders,
            cart,
            checkout,
            config,
        }
    }
}

/// Load the seed catalog, trying parent directories for workspace runs
fn load_product_catalog(path: &str) -> anyhow::Result<InMemoryCatalog> {
    let candidates = [
        path.to_string(),
        format!("../{path}"),
        format!("../../{path}"),
    ];

    for candidate in &candidates {
        if let Ok(content) = std::fs::read_to_string(candidate) {
            let catalog = InMemoryCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", candidate, e))?;
            tracing::info!("Loaded product catalog from {}", candidate);
            return Ok(catalog);
        }
    }

    tracing::warn!("No product catalog found at {}, using empty catalog", path);
    Ok(InMemoryCatalog::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_core::ProductCatalog;

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..AppConfig::local()
        };

        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_bad_host_is_configuration_error() {
        let config = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::local()
        };

        assert!(matches!(
            config.socket_addr(),
            Err(CartError::Configuration(_))
        ));
    }

    #[test]
    fn test_local_defaults() {
        let config = AppConfig::local();
        assert_eq!(config.port, 8080);
        assert_eq!(config.currency, Currency::Usd);
        assert!(config.simulated_latency.is_zero());
        assert!(!config.is_production());
    }

    #[test]
    fn test_store_currency() {
        assert_eq!(store_currency(None).unwrap(), Currency::Usd);
        assert_eq!(store_currency(Some("")).unwrap(), Currency::Usd);
        assert_eq!(store_currency(Some("gbp")).unwrap(), Currency::Gbp);

        for code in ["jpy", "JPY", "kwd"] {
            assert!(matches!(
                store_currency(Some(code)),
                Err(CartError::Configuration(_))
            ));
        }
    }

    #[test]
    fn test_missing_catalog_is_empty() {
        let catalog = load_product_catalog("does/not/exist.toml").unwrap();
        let count = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(catalog.count())
            .unwrap();
        assert_eq!(count, 0);
    }
}
