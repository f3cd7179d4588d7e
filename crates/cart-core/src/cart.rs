//! # Cart Store
//!
//! The shared shopping cart: one pending order id plus the line items added
//! so far, in insertion order.
//!
//! ## Locking
//!
//! Two locks, always taken in this order:
//!
//! 1. `gate` (async `RwLock<()>`): mutators hold it shared, checkout holds it
//!    exclusively for snapshot → persist → clear. No mutation can land between
//!    persisting an order and clearing the cart.
//! 2. `session` (sync `Mutex`): guards the in-memory session. Held only for
//!    the pure in-memory check-then-act, never across an `.await`.
//!
//! Readers (`items`, `total_cost`, `snapshot`) only take `session`, so they
//! never wait on catalog lookups or order persistence.

use crate::collaborator::BoxedProductCatalog;
use crate::error::{CartError, CartResult};
use crate::order::{CartLineItem, OrderId};
use crate::money::{Currency, Price};
use crate::product::ProductId;
use serde::Serialize;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// The cart's mutable state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartSession {
    /// Assigned by the first add into a cart with no order id and dropped by
    /// checkout or `clear`. Emptying the cart line by line keeps it, so a
    /// session may briefly hold an order id with no items.
    pub order_id: Option<OrderId>,
    /// Unique by product id, insertion ordered
    pub items: Vec<CartLineItem>,
}

impl CartSession {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }

    /// Σ quantity × price. Prices are in the smallest unit, so the sum is
    /// already exact to two decimal places.
    pub fn total_cost(&self, currency: Currency) -> Price {
        self.items
            .iter()
            .map(CartLineItem::cost)
            .fold(Price::zero(currency), |acc, p| acc + p)
    }
}

/// Quantity change requested for a cart line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    Increment,
    /// Removes the line when quantity reaches 0
    Decrement,
    Remove,
}

impl FromStr for CartAction {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "increment" | "add" => Ok(CartAction::Increment),
            "decrement" | "subtract" => Ok(CartAction::Decrement),
            "remove" => Ok(CartAction::Remove),
            other => Err(CartError::Validation(format!("Invalid action: {other:?}"))),
        }
    }
}

/// Result of `CartStore::update_quantity`
#[derive(Debug, Clone, PartialEq)]
pub enum LineUpdate {
    /// The line is still in the cart with its new quantity
    Changed(CartLineItem),
    /// The line left the cart; callers should re-render the full list
    Removed(CartLineItem),
}

impl LineUpdate {
    pub fn is_removed(&self) -> bool {
        matches!(self, LineUpdate::Removed(_))
    }

    pub fn line(&self) -> &CartLineItem {
        match self {
            LineUpdate::Changed(line) | LineUpdate::Removed(line) => line,
        }
    }
}

/// Point-in-time copy of the cart, taken under one lock
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSnapshot {
    pub order_id: Option<OrderId>,
    pub items: Vec<CartLineItem>,
    pub total: Price,
}

/// Shared, process-wide cart
pub struct CartStore {
    catalog: BoxedProductCatalog,
    currency: Currency,
    session: Mutex<CartSession>,
    gate: RwLock<()>,
}

impl CartStore {
    /// Create an empty cart priced in `currency`
    pub fn new(catalog: BoxedProductCatalog, currency: Currency) -> Self {
        Self {
            catalog,
            currency,
            session: Mutex::new(CartSession::default()),
            gate: RwLock::new(()),
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    fn session(&self) -> MutexGuard<'_, CartSession> {
        // Every critical section leaves the session consistent before it can
        // panic, so a poisoned lock still holds valid state.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn duplicate(line: &CartLineItem) -> CartError {
        CartError::Conflict {
            product_id: line.product_id.to_string(),
            name: line.product.name.clone(),
        }
    }

    /// Add a product with quantity 1.
    ///
    /// # Errors
    /// - `Conflict` if the product is already in the cart (cart unchanged)
    /// - `NotFound` / `Persistence` from the catalog lookup
    /// - `Validation` if the product is priced in another currency
    #[instrument(skip(self))]
    pub async fn add_item(&self, product_id: ProductId) -> CartResult<CartLineItem> {
        // Cheap early exit; re-checked below under the lock.
        {
            let session = self.session();
            if let Some(line) = session.find(product_id) {
                debug!("Product already in cart");
                return Err(Self::duplicate(line));
            }
        }

        let product = self.catalog.get_by_id(product_id).await?;

        if product.price.currency != self.currency {
            return Err(CartError::Validation(format!(
                "{} is priced in {}, cart uses {}",
                product.name, product.price.currency, self.currency
            )));
        }
        if product.price.amount < 0 {
            return Err(CartError::Validation(format!(
                "{} has a negative price",
                product.name
            )));
        }

        let _gate = self.gate.read().await;
        let mut session = self.session();

        if let Some(line) = session.find(product_id) {
            debug!("Product added concurrently");
            return Err(Self::duplicate(line));
        }

        if session.order_id.is_none() {
            let order_id = Uuid::new_v4();
            info!(%order_id, "Opened cart order");
            session.order_id = Some(order_id);
        }

        let line = CartLineItem::new(product);
        session.items.push(line.clone());

        info!(
            "Added {} to cart ({} lines, total={})",
            line.product.name,
            session.items.len(),
            session.total_cost(self.currency)
        );

        Ok(line)
    }

    /// Apply `action` to the line for `product_id`.
    ///
    /// # Errors
    /// `NotFound` if the product is not in the cart.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        product_id: ProductId,
        action: CartAction,
    ) -> CartResult<LineUpdate> {
        let _gate = self.gate.read().await;
        let mut session = self.session();

        let index = session
            .position(product_id)
            .ok_or_else(|| CartError::not_found("Cart item", product_id))?;

        let update = match action {
            CartAction::Increment => {
                let line = &mut session.items[index];
                line.quantity = line.quantity.checked_add(1).ok_or_else(|| {
                    CartError::Validation(format!(
                        "{} quantity cannot go higher",
                        line.product.name
                    ))
                })?;
                LineUpdate::Changed(line.clone())
            }
            CartAction::Decrement if session.items[index].quantity <= 1 => {
                LineUpdate::Removed(session.items.remove(index))
            }
            CartAction::Decrement => {
                let line = &mut session.items[index];
                line.quantity -= 1;
                LineUpdate::Changed(line.clone())
            }
            CartAction::Remove => LineUpdate::Removed(session.items.remove(index)),
        };

        debug!(
            ?action,
            removed = update.is_removed(),
            quantity = update.line().quantity,
            "Updated cart line"
        );

        Ok(update)
    }

    /// Current line items, insertion ordered
    pub fn items(&self) -> Vec<CartLineItem> {
        self.session().items.clone()
    }

    /// Current total, recomputed from the items on every call
    pub fn total_cost(&self) -> Price {
        self.session().total_cost(self.currency)
    }

    pub fn order_id(&self) -> Option<OrderId> {
        self.session().order_id
    }

    pub fn is_empty(&self) -> bool {
        self.session().is_empty()
    }

    /// Items, order id and total read consistently
    pub fn snapshot(&self) -> CartSnapshot {
        let session = self.session();
        CartSnapshot {
            order_id: session.order_id,
            items: session.items.clone(),
            total: session.total_cost(self.currency),
        }
    }

    /// Empty the cart and drop its order id.
    ///
    /// Waits for in-flight mutations to finish. Checkout clears through
    /// [`CartStore::lock_for_checkout`] instead.
    pub async fn clear(&self) {
        let _gate = self.gate.write().await;
        self.reset();
    }

    /// Exclusive access for the duration of a checkout
    pub(crate) async fn lock_for_checkout(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().await
    }

    /// Caller must hold the checkout gate
    pub(crate) fn reset(&self) {
        *self.session() = CartSession::default();
    }
}
