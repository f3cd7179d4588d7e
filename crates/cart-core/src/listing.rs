//! # Admin Listings
//!
//! Paginated product and order tables.

use crate::collaborator::{OrderRepository, ProductCatalog};
use crate::error::CartResult;
use crate::order::Order;
use crate::pagination::{paginate, PageRequest};
use crate::product::Product;
use serde::Serialize;
use tracing::debug;

/// One page of rows plus its navigation metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing<T> {
    pub rows: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub limit: u64,
    pub previous_page: u64,
    pub next_page: u64,
    pub button_range: Vec<u64>,
}

impl<T> Listing<T> {
    fn new(rows: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        let window = paginate(total_count, request);
        Self {
            rows,
            current_page: window.current_page,
            total_pages: window.total_pages,
            limit: window.limit,
            previous_page: window.previous_page,
            next_page: window.next_page,
            button_range: window.button_range,
        }
    }
}

pub async fn list_products(
    catalog: &dyn ProductCatalog,
    request: PageRequest,
) -> CartResult<Listing<Product>> {
    let rows = catalog.list(request.limit(), request.offset()).await?;
    let total = catalog.count().await?;
    debug!(page = request.page(), total, "Listed products");
    Ok(Listing::new(rows, total, request))
}

pub async fn list_orders(
    orders: &dyn OrderRepository,
    request: PageRequest,
) -> CartResult<Listing<Order>> {
    let rows = orders.list(request.limit(), request.offset()).await?;
    let total = orders.count().await?;
    debug!(page = request.page(), total, "Listed orders");
    Ok(Listing::new(rows, total, request))
}
