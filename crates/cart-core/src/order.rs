//! # Order Types
//!
//! Cart line items and persisted orders.

use crate::money::{Currency, Price};
use crate::product::{Product, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order identifier (also used as the cart's pending order id)
pub type OrderId = Uuid;

/// One product entry in the session cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: ProductId,

    /// Always >= 1 while the line is in the cart
    pub quantity: u32,

    /// Snapshot taken when the product was added
    pub product: Product,
}

impl CartLineItem {
    pub fn new(product: Product) -> Self {
        Self {
            product_id: product.id,
            quantity: 1,
            product,
        }
    }

    /// quantity × unit price
    pub fn cost(&self) -> Price {
        self.product.price.times(self.quantity)
    }

    /// Freeze this line into an order item for the given order
    pub fn freeze(&self, order_id: OrderId) -> OrderItem {
        OrderItem {
            order_id,
            product_id: self.product_id,
            quantity: self.quantity,
            product: self.product.clone(),
            cost: self.cost(),
        }
    }
}

/// A product line persisted with an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub product: Product,

    /// Cost frozen at checkout time
    pub cost: Price,
}

/// Order status. Checkout is the only writer, so every stored order is
/// pending; fulfilment states belong to whatever system ships the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
        }
    }

    /// Upper-case label for the order detail page
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

/// A placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub status: OrderStatus,
    pub date: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Create a pending order dated now
    pub fn new(id: OrderId, items: Vec<OrderItem>) -> Self {
        Self {
            id,
            status: OrderStatus::Pending,
            date: Utc::now(),
            items,
        }
    }

    /// Σ quantity × price over the order's items
    pub fn total(&self, currency: Currency) -> Price {
        self.items
            .iter()
            .map(|item| item.product.price.times(item.quantity))
            .fold(Price::zero(currency), |acc, p| acc + p)
    }

    /// Units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
