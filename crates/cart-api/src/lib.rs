//! # cart-api
//!
//! HTTP API layer for the storefront.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Cart endpoints (add, change quantity, checkout) returning cart view models
//! - Paginated admin listings for products and orders
//! - Admin product create / edit / delete and demo seeding
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/shop/items` | Storefront products |
//! | GET | `/api/v1/cart` | Current cart |
//! | POST | `/api/v1/cart/items/{product_id}` | Add to cart |
//! | PATCH | `/api/v1/cart/items/{product_id}?action=` | Change quantity |
//! | POST | `/api/v1/cart/checkout` | Place order |
//! | GET | `/api/v1/admin/products` | Product table |
//! | POST | `/api/v1/admin/products` | Create product |
//! | PUT / DELETE | `/api/v1/admin/products/{id}` | Edit / delete product |
//! | POST | `/api/v1/admin/products/seed` | Demo products |
//! | GET | `/api/v1/admin/orders` | Order table |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
