//! # In-Memory Collaborators
//!
//! Process-local implementations of [`ProductCatalog`] and [`OrderRepository`].
//! The catalog is seeded from `config/products.toml`; orders live until the
//! process exits.

use crate::collaborator::{OrderRepository, ProductCatalog};
use crate::error::{CartError, CartResult};
use crate::order::{Order, OrderId, OrderItem};
use crate::product::{Product, ProductFilter, ProductId};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// TOML layout of the seed catalog
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    products: Vec<Product>,
}

/// Newest first, the order every listing uses
fn newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Product catalog held in memory
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<Vec<Product>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> CartResult<Self> {
        let file: CatalogFile = toml::from_str(toml_str)
            .map_err(|e| CartError::Configuration(format!("invalid catalog: {e}")))?;
        Ok(Self::from_products(file.products))
    }

}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn get_by_id(&self, id: ProductId) -> CartResult<Product> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CartError::not_found("Product", id))
    }

    async fn list(&self, limit: u64, offset: u64) -> CartResult<Vec<Product>> {
        let mut products = self.products.read().await.clone();
        newest_first(&mut products);
        Ok(page(products, limit, offset))
    }

    async fn count(&self) -> CartResult<u64> {
        Ok(self.products.read().await.len() as u64)
    }

    async fn find(&self, filter: &ProductFilter) -> CartResult<Vec<Product>> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .await
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        newest_first(&mut products);
        Ok(products)
    }

    async fn insert(&self, product: Product) -> CartResult<Product> {
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.id == product.id) {
            return Err(CartError::Persistence(format!(
                "Product {} already exists",
                product.id
            )));
        }
        products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, product: Product) -> CartResult<Product> {
        let mut products = self.products.write().await;
        let existing = products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| CartError::not_found("Product", product.id))?;
        *existing = product.clone();
        Ok(product)
    }

    async fn delete(&self, id: ProductId) -> CartResult<Product> {
        let mut products = self.products.write().await;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CartError::not_found("Product", id))?;
        Ok(products.remove(index))
    }
}

/// Order store held in memory
#[derive(Debug, Default)]
pub struct InMemoryOrders {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrders {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn persist_order(&self, order_id: OrderId, items: &[OrderItem]) -> CartResult<OrderId> {
        if items.is_empty() {
            return Err(CartError::Validation("Order has no items".to_string()));
        }
        if items.iter().any(|i| i.order_id != order_id) {
            return Err(CartError::Validation(format!(
                "Order items do not belong to order {order_id}"
            )));
        }

        let mut orders = self.orders.write().await;
        if orders.contains_key(&order_id) {
            return Err(CartError::Persistence(format!(
                "Order {order_id} already exists"
            )));
        }
        orders.insert(order_id, Order::new(order_id, items.to_vec()));
        Ok(order_id)
    }

    async fn list(&self, limit: u64, offset: u64) -> CartResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.orders.read().await.values().cloned().collect();
        orders.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(page(orders, limit, offset))
    }

    async fn count(&self) -> CartResult<u64> {
        Ok(self.orders.read().await.len() as u64)
    }

    async fn get_order(&self, id: OrderId) -> CartResult<Order> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| CartError::not_found("Order", id))
    }
}

fn page<T>(rows: Vec<T>, limit: u64, offset: u64) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    rows.into_iter().skip(offset).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::CartLineItem;
    use crate::money::{Currency, Price};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    const SEED: &str = r#"
[[products]]
id = "6f1c2a9e-4d0b-4f7e-9a43-0c1d5e2b7a10"
name = "Aurora Laptop"
description = "14 inch ultrabook"
image = "aurora.jpg"
price = { amount = 129999, currency = "usd" }

[[products]]
name = "Pulse Headphones"
price = { amount = 7999, currency = "usd" }
"#;

    fn dated(name: &str, minutes_ago: i64) -> Product {
        Product::new(name, Price::new(5.0, Currency::Usd))
            .created(Utc::now() - Duration::minutes(minutes_ago))
    }

    #[tokio::test]
    async fn test_catalog_from_toml() {
        let catalog = InMemoryCatalog::from_toml(SEED).unwrap();
        assert_eq!(catalog.count().await.unwrap(), 2);

        let id: Uuid = "6f1c2a9e-4d0b-4f7e-9a43-0c1d5e2b7a10".parse().unwrap();
        let laptop = catalog.get_by_id(id).await.unwrap();
        assert_eq!(laptop.name, "Aurora Laptop");
        assert_eq!(laptop.price.to_string(), "1299.99 USD");
        assert!(laptop.has_image());
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let err = InMemoryCatalog::from_toml("[[products]]\nname = 3").unwrap_err();
        assert!(matches!(err, CartError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_paged() {
        let catalog = InMemoryCatalog::from_products(vec![
            dated("old", 30),
            dated("newest", 1),
            dated("middle", 10),
        ]);

        let first = catalog.list(2, 0).await.unwrap();
        let names: Vec<_> = first.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["newest", "middle"]);

        let second = catalog.list(2, 2).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "old");

        assert!(catalog.list(2, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_with_image() {
        let catalog = InMemoryCatalog::from_products(vec![
            dated("TV", 3).with_image("tv.jpg"),
            dated("Printer", 2),
        ]);

        let shown = catalog.find(&ProductFilter::with_image()).await.unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].name, "TV");
        assert_eq!(catalog.find(&ProductFilter::all()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_insert_update_delete() {
        let catalog = InMemoryCatalog::new();
        let mut product = dated("Watch", 1);

        catalog.insert(product.clone()).await.unwrap();
        assert!(matches!(
            catalog.insert(product.clone()).await,
            Err(CartError::Persistence(_))
        ));

        product.name = "Smart Watch".into();
        catalog.update(product.clone()).await.unwrap();
        assert_eq!(catalog.count().await.unwrap(), 1);
        assert_eq!(catalog.get_by_id(product.id).await.unwrap().name, "Smart Watch");

        let removed = catalog.delete(product.id).await.unwrap();
        assert_eq!(removed.name, "Smart Watch");
        assert_eq!(catalog.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_product() {
        let catalog = InMemoryCatalog::new();
        let ghost = dated("Ghost", 1);

        let err = catalog.update(ghost.clone()).await.unwrap_err();
        assert!(matches!(err, CartError::NotFound { kind: "Product", .. }));
        let err = catalog.delete(ghost.id).await.unwrap_err();
        assert!(matches!(err, CartError::NotFound { kind: "Product", .. }));
    }

    #[tokio::test]
    async fn test_orders_persist_and_fetch() {
        let orders = InMemoryOrders::new();
        let order_id = Uuid::new_v4();
        let mut line = CartLineItem::new(dated("Camera", 1));
        line.quantity = 2;

        let id = orders
            .persist_order(order_id, &[line.freeze(order_id)])
            .await
            .unwrap();

        assert_eq!(id, order_id);
        assert_eq!(orders.count().await.unwrap(), 1);
        let order = orders.get_order(id).await.unwrap();
        assert_eq!(order.items[0].cost.amount, 1000);
        assert_eq!(orders.list(10, 0).await.unwrap().len(), 1);

        let again = orders.persist_order(order_id, &[line.freeze(order_id)]).await;
        assert!(matches!(again, Err(CartError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let orders = InMemoryOrders::new();
        let err = orders.get_order(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CartError::NotFound { kind: "Order", .. }));
    }
}
