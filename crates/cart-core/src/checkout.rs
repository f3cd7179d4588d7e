//! # Checkout
//!
//! Turns the cart into a persisted order. The cart is cleared only after the
//! order repository accepted the order; a failed persist leaves it untouched
//! so the customer can simply retry.

use crate::cart::CartStore;
use crate::collaborator::BoxedOrderRepository;
use crate::error::{CartError, CartResult};
use crate::money::Price;
use crate::order::{OrderId, OrderItem};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// What the customer sees after placing an order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderConfirmation {
    /// `None` when the cart was empty and nothing was placed
    pub order_id: Option<OrderId>,
    pub items: Vec<OrderItem>,
    pub total: Price,
}

impl OrderConfirmation {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Places orders from the shared cart
#[derive(Clone)]
pub struct CheckoutCoordinator {
    cart: Arc<CartStore>,
    orders: BoxedOrderRepository,
}

impl CheckoutCoordinator {
    pub fn new(cart: Arc<CartStore>, orders: BoxedOrderRepository) -> Self {
        Self { cart, orders }
    }

    /// Persist the cart as an order and clear it.
    ///
    /// Holds the cart's checkout gate from snapshot to clear, so no add or
    /// quantity change can slip in and be dropped by the clear. Readers are
    /// not blocked.
    ///
    /// # Errors
    /// `Persistence` (or whatever the repository returns) if the order could
    /// not be stored; the cart is unchanged in that case.
    #[instrument(skip(self))]
    pub async fn place_order(&self) -> CartResult<OrderConfirmation> {
        let _gate = self.cart.lock_for_checkout().await;
        let snapshot = self.cart.snapshot();

        if snapshot.items.is_empty() {
            info!("Checkout on empty cart, nothing to place");
            return Ok(OrderConfirmation {
                order_id: None,
                items: Vec::new(),
                total: snapshot.total,
            });
        }

        // Lines are only ever added together with an order id.
        let order_id = snapshot.order_id.unwrap_or_else(Uuid::new_v4);
        let items: Vec<OrderItem> = snapshot
            .items
            .iter()
            .map(|line| line.freeze(order_id))
            .collect();

        let placed_id = self
            .orders
            .persist_order(order_id, &items)
            .await
            .map_err(|e| {
                error!(%order_id, "Failed to place order: {}", e);
                if matches!(e, CartError::Persistence(_)) {
                    e
                } else {
                    CartError::Persistence(e.to_string())
                }
            })?;

        self.cart.reset();

        info!(
            order_id = %placed_id,
            "Placed order: {} lines, total={}",
            items.len(),
            snapshot.total
        );

        Ok(OrderConfirmation {
            order_id: Some(placed_id),
            items,
            total: snapshot.total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartAction;
    use crate::collaborator::OrderRepository;
    use crate::memory::{InMemoryCatalog, InMemoryOrders};
    use crate::money::Currency;
    use crate::order::Order;
    use crate::product::Product;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Repository that always fails and counts attempts
    #[derive(Default)]
    struct FailingOrders {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl OrderRepository for FailingOrders {
        async fn persist_order(&self, _: OrderId, _: &[OrderItem]) -> CartResult<OrderId> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(CartError::Persistence("database is unavailable".into()))
        }

        async fn list(&self, _: u64, _: u64) -> CartResult<Vec<Order>> {
            Ok(Vec::new())
        }

        async fn count(&self) -> CartResult<u64> {
            Ok(0)
        }

        async fn get_order(&self, id: OrderId) -> CartResult<Order> {
            Err(CartError::not_found("Order", id))
        }
    }

    /// Repository that takes a while to persist
    struct SlowOrders {
        inner: InMemoryOrders,
        delay: Duration,
        started: Notify,
    }

    #[async_trait]
    impl OrderRepository for SlowOrders {
        async fn persist_order(&self, id: OrderId, items: &[OrderItem]) -> CartResult<OrderId> {
            self.started.notify_one();
            tokio::time::sleep(self.delay).await;
            self.inner.persist_order(id, items).await
        }

        async fn list(&self, limit: u64, offset: u64) -> CartResult<Vec<Order>> {
            self.inner.list(limit, offset).await
        }

        async fn count(&self) -> CartResult<u64> {
            self.inner.count().await
        }

        async fn get_order(&self, id: OrderId) -> CartResult<Order> {
            self.inner.get_order(id).await
        }
    }

    fn products() -> Vec<Product> {
        vec![
            Product::new("Laptop", Price::new(1200.0, Currency::Usd)),
            Product::new("Headphones", Price::new(79.99, Currency::Usd)),
            Product::new("Camera", Price::new(450.5, Currency::Usd)),
        ]
    }

    async fn filled_cart(products: &[Product]) -> Arc<CartStore> {
        let catalog = InMemoryCatalog::from_products(products.to_vec());
        let cart = Arc::new(CartStore::new(Arc::new(catalog), Currency::Usd));
        for p in products {
            cart.add_item(p.id).await.unwrap();
        }
        cart
    }

    #[tokio::test]
    async fn test_successful_checkout_clears_cart() {
        let products = products();
        let cart = filled_cart(&products).await;
        cart.update_quantity(products[1].id, CartAction::Increment)
            .await
            .unwrap();
        let cart_order_id = cart.order_id();

        let orders = Arc::new(InMemoryOrders::new());
        let checkout = CheckoutCoordinator::new(Arc::clone(&cart), orders.clone());

        let confirmation = checkout.place_order().await.unwrap();

        assert_eq!(confirmation.order_id, cart_order_id);
        assert_eq!(confirmation.items.len(), 3);
        assert_eq!(confirmation.items[1].cost.amount, 15998);
        // 1200.00 + 2 × 79.99 + 450.50
        assert_eq!(confirmation.total.amount, 181048);

        assert!(cart.is_empty());
        assert!(cart.order_id().is_none());
        assert_eq!(orders.count().await.unwrap(), 1);

        let stored = orders.get_order(confirmation.order_id.unwrap()).await.unwrap();
        assert_eq!(stored.items, confirmation.items);
    }

    #[tokio::test]
    async fn test_next_add_after_checkout_gets_new_order_id() {
        let products = products();
        let cart = filled_cart(&products).await;
        let checkout = CheckoutCoordinator::new(Arc::clone(&cart), Arc::new(InMemoryOrders::new()));

        let first = checkout.place_order().await.unwrap().order_id.unwrap();
        cart.add_item(products[0].id).await.unwrap();

        let second = cart.order_id().unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_cart_intact() {
        let products = products();
        let cart = filled_cart(&products).await;
        let before = cart.snapshot();

        let orders = Arc::new(FailingOrders::default());
        let checkout = CheckoutCoordinator::new(Arc::clone(&cart), orders.clone());

        let err = checkout.place_order().await.unwrap_err();

        assert!(matches!(err, CartError::Persistence(_)));
        assert!(err.is_retryable());
        assert_eq!(cart.snapshot(), before);
        assert_eq!(cart.items().len(), 3);
        assert_eq!(cart.order_id(), before.order_id);

        // Retrying hits the repository again with the same cart.
        assert!(checkout.place_order().await.is_err());
        assert_eq!(orders.attempts.load(Ordering::SeqCst), 2);
        assert_eq!(cart.snapshot(), before);
    }

    #[tokio::test]
    async fn test_empty_cart_is_noop() {
        let catalog = InMemoryCatalog::from_products(Vec::new());
        let cart = Arc::new(CartStore::new(Arc::new(catalog), Currency::Usd));
        let orders = Arc::new(FailingOrders::default());
        let checkout = CheckoutCoordinator::new(cart, orders.clone());

        let confirmation = checkout.place_order().await.unwrap();

        assert!(confirmation.is_empty());
        assert!(confirmation.order_id.is_none());
        assert_eq!(confirmation.total.amount, 0);
        assert_eq!(orders.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_add_during_checkout_is_not_dropped() {
        let products = products();
        let extra = Product::new("Tablet", Price::new(300.0, Currency::Usd));
        let mut all = products.clone();
        all.push(extra.clone());

        let catalog = InMemoryCatalog::from_products(all);
        let cart = Arc::new(CartStore::new(Arc::new(catalog), Currency::Usd));
        for p in &products {
            cart.add_item(p.id).await.unwrap();
        }

        let orders = Arc::new(SlowOrders {
            inner: InMemoryOrders::new(),
            delay: Duration::from_millis(100),
            started: Notify::new(),
        });
        let checkout = CheckoutCoordinator::new(Arc::clone(&cart), orders.clone());

        let placing = tokio::spawn({
            let checkout = checkout.clone();
            async move { checkout.place_order().await }
        });

        // Wait until checkout holds the gate and is persisting.
        orders.started.notified().await;
        let extra_id = extra.id;
        let adding = tokio::spawn({
            let cart = Arc::clone(&cart);
            async move { cart.add_item(extra_id).await }
        });

        // Readers are not blocked while the order is being persisted.
        assert_eq!(cart.items().len(), 3);

        let confirmation = placing.await.unwrap().unwrap();
        adding.await.unwrap().unwrap();

        assert_eq!(confirmation.items.len(), 3);
        assert!(confirmation.items.iter().all(|i| i.product_id != extra_id));

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, extra_id);
        assert_ne!(cart.order_id(), confirmation.order_id);
    }
}
