//! # Storage Collaborators
//!
//! The cart never talks to a database directly. Product lookups and order
//! persistence go through these two traits, so the backing store can be a
//! relational database, an HTTP service or the in-memory implementations in
//! [`crate::memory`].
//!
//! ```text
//! ┌──────────────┐  get_by_id   ┌──────────────────────┐  insert / update
//! │  CartStore   │─────────────▶│ ProductCatalog       │◀──────────────── admin
//! └──────┬───────┘              └──────────────────────┘  delete
//!        │ snapshot / clear
//! ┌──────┴───────────────┐  persist_order  ┌──────────────────────┐
//! │ CheckoutCoordinator  │────────────────▶│ OrderRepository      │
//! └──────────────────────┘                 └──────────────────────┘
//! ```

use crate::error::CartResult;
use crate::order::{Order, OrderId, OrderItem};
use crate::product::{Product, ProductFilter, ProductId};
use async_trait::async_trait;
use std::sync::Arc;

/// The product catalog: lookups for the cart and storefront, writes for the
/// admin console.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch one product.
    ///
    /// # Errors
    /// `CartError::NotFound` for an unknown id, `CartError::Persistence` when
    /// the store is unreachable.
    async fn get_by_id(&self, id: ProductId) -> CartResult<Product>;

    /// One page of products, newest first.
    async fn list(&self, limit: u64, offset: u64) -> CartResult<Vec<Product>>;

    /// Total number of products.
    async fn count(&self) -> CartResult<u64>;

    /// All products matching `filter`, newest first.
    async fn find(&self, filter: &ProductFilter) -> CartResult<Vec<Product>>;

    /// Store a new product and return it as stored.
    async fn insert(&self, product: Product) -> CartResult<Product>;

    /// Replace an existing product.
    ///
    /// # Errors
    /// `CartError::NotFound` if no product has `product.id`.
    async fn update(&self, product: Product) -> CartResult<Product>;

    /// Remove a product and return what was removed. Carts keep their own
    /// snapshots, so lines already added are unaffected.
    async fn delete(&self, id: ProductId) -> CartResult<Product>;
}

/// Order persistence.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order with its frozen items and return its id.
    ///
    /// Must be all-or-nothing: on error nothing has been stored.
    async fn persist_order(&self, order_id: OrderId, items: &[OrderItem]) -> CartResult<OrderId>;

    /// One page of orders, newest first.
    async fn list(&self, limit: u64, offset: u64) -> CartResult<Vec<Order>>;

    /// Total number of orders.
    async fn count(&self) -> CartResult<u64>;

    /// Fetch one order with its items.
    async fn get_order(&self, id: OrderId) -> CartResult<Order>;
}

/// Shared catalog handle (dynamic dispatch)
pub type BoxedProductCatalog = Arc<dyn ProductCatalog>;

/// Shared order repository handle (dynamic dispatch)
pub type BoxedOrderRepository = Arc<dyn OrderRepository>;
