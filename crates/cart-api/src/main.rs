//! # Storefront
//!
//! Cart and admin API server.
//!
//! ## Usage
//!
//! ```bash
//! # Optional configuration
//! export CATALOG_PATH=config/products.toml
//! export STORE_CURRENCY=usd
//! export SIMULATED_LATENCY_MS=0
//!
//! # Run the server
//! storefront
//! ```

use cart_api::{routes, state::AppState};
use cart_core::ProductCatalog;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Store currency: {}", state.config.currency);
    info!("Products loaded: {}", state.catalog.count().await?);
    if !state.config.simulated_latency.is_zero() {
        info!(
            "Simulated latency: {}ms",
            state.config.simulated_latency.as_millis()
        );
    }

    let app = routes::create_router(state);

    info!("Storefront starting on http://{}", addr);

    if !is_prod {
        info!("Cart: GET http://{}/api/v1/cart", addr);
        info!("Products: GET http://{}/api/v1/admin/products?page=1&limit=10", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Storefront
  ━━━━━━━━━━━━━━━━━━━━━━━
  Cart and admin API
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
