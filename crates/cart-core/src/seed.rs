//! # Demo Seeding
//!
//! Fills a catalog with plausible demo products for the admin console.

use crate::collaborator::ProductCatalog;
use crate::error::CartResult;
use crate::money::{Currency, Price};
use crate::product::Product;
use tracing::info;

/// Products created by one seed request
pub const SEED_COUNT: usize = 20;

const PRODUCT_TYPES: [&str; 10] = [
    "Laptop",
    "Smartphone",
    "Tablet",
    "Headphones",
    "Speaker",
    "Camera",
    "TV",
    "Watch",
    "Printer",
    "Monitor",
];

const BRANDS: [&str; 7] = ["Aurora", "Nimbus", "Orbit", "Quill", "Lumen", "Atlas", "Pulse"];

/// Generate `count` demo products. Prices stay within 0.00..=999.99 and every
/// product has an image, so all of them show up on the storefront.
pub fn sample_products(count: usize, currency: Currency) -> Vec<Product> {
    (0..count)
        .map(|i| {
            let kind = PRODUCT_TYPES[i % PRODUCT_TYPES.len()];
            let brand = BRANDS[(i / PRODUCT_TYPES.len() + i) % BRANDS.len()];
            let cents = (i as i64 * 48_611 + 1_999) % 100_000;

            Product::new(format!("{brand} {kind}"), Price {
                amount: cents,
                currency,
            })
            .with_description(format!("{brand} {} for everyday use", kind.to_lowercase()))
            .with_image(format!("{}-{}.jpg", brand.to_lowercase(), kind.to_lowercase()))
        })
        .collect()
}

/// Insert [`SEED_COUNT`] demo products and return how many were stored.
pub async fn seed_catalog(catalog: &dyn ProductCatalog, currency: Currency) -> CartResult<usize> {
    let products = sample_products(SEED_COUNT, currency);
    let count = products.len();

    for product in products {
        catalog.insert(product).await?;
    }

    info!("Seeded {} demo products", count);
    Ok(count)
}
