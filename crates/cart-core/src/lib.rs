//! # cart-core
//!
//! Core types and services for the storefront cart.
//!
//! This crate provides:
//! - `CartStore`, the shared cart with add / update / total / clear
//! - `CheckoutCoordinator` for turning the cart into a persisted order
//! - `paginate` and `PageRequest` for the admin listings
//! - `ProductCatalog` and `OrderRepository` collaborator traits, with
//!   in-memory implementations
//! - Admin product forms (`ProductInput`) and demo seeding
//! - `CartError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{CartStore, CheckoutCoordinator, Currency, InMemoryCatalog, InMemoryOrders};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(InMemoryCatalog::from_toml(&seed)?);
//! let cart = Arc::new(CartStore::new(catalog, Currency::Usd));
//! let checkout = CheckoutCoordinator::new(cart.clone(), Arc::new(InMemoryOrders::new()));
//!
//! cart.add_item(product_id).await?;
//! let confirmation = checkout.place_order().await?;
//! ```

pub mod cart;
pub mod checkout;
pub mod collaborator;
pub mod error;
pub mod listing;
pub mod memory;
pub mod money;
pub mod order;
pub mod pagination;
pub mod product;
pub mod seed;

// Re-exports for convenience
pub use cart::{CartAction, CartSession, CartSnapshot, CartStore, LineUpdate};
pub use checkout::{CheckoutCoordinator, OrderConfirmation};
pub use collaborator::{
    BoxedOrderRepository, BoxedProductCatalog, OrderRepository, ProductCatalog,
};
pub use error::{CartError, CartResult};
pub use listing::{list_orders, list_products, Listing};
pub use memory::{InMemoryCatalog, InMemoryOrders};
pub use money::{Currency, Price, CENTS_PER_UNIT};
pub use order::{CartLineItem, Order, OrderId, OrderItem, OrderStatus};
pub use pagination::{paginate, PageRequest, PageWindow, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use product::{PriceField, Product, ProductDraft, ProductFilter, ProductId, ProductInput};
pub use seed::{sample_products, seed_catalog, SEED_COUNT};
